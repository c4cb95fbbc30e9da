//! Scope analysis.
//!
//! `analyze_scopes` records, for every program, function, block and catch
//! scope, which names are declared there and which are referenced. The
//! temporary-name allocator asks `ScopeInfo::is_used_name` before handing
//! out a name so generated temporaries never capture or shadow user code.

mod scopes;
pub use scopes::{Scope, ScopeId, ScopeInfo, ScopeKind, analyze_scopes};
