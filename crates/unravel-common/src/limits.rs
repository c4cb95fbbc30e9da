//! Centralized limits for the rewrite engine.
//!
//! The driver never recurses over the tree (it runs off an explicit work-list),
//! so the only limit that matters is how long a chain of rewrite-then-revisit
//! steps may grow before the engine gives up.

/// Maximum length of a replace-then-redescend chain.
///
/// Every time a rewritten node's replacements are pushed back onto the
/// work-list they carry the depth of the node they came from plus one. Only
/// nested patterns extend the chain, so the depth is bounded by pattern
/// nesting:
///
/// ```javascript
/// // Depth 3: the outer pattern, then [b, [c]], then [c].
/// var [a, [b, [c]]] = value;
/// ```
///
/// A chain longer than this means a rule produced output it can rewrite
/// again forever, and the transform fails instead of hanging.
pub const MAX_RENORMALIZE_DEPTH: u32 = 100;

/// Initial capacity for the driver work-list.
pub const INITIAL_WORKLIST_CAPACITY: usize = 64;
