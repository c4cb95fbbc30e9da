//! Index types shared by every arena user.

/// Index of a node in a `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Absent child: elided array slot, missing initializer, missing `else`.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Ordered child list (statements, elements, arguments, declarators).
pub type NodeList = Vec<NodeIndex>;
