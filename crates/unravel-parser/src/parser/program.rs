//! `ProgramTree` and the source-parsing boundary.

use super::base::NodeIndex;
use super::node::{Node, NodeArena};
use thiserror::Error;

/// A whole program: the arena plus the index of its `Program` node.
#[derive(Debug, Clone)]
pub struct ProgramTree {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl ProgramTree {
    pub fn new(arena: NodeArena, root: NodeIndex) -> Self {
        ProgramTree { arena, root }
    }

    /// An empty program.
    pub fn empty() -> Self {
        let mut arena = NodeArena::new();
        let root = arena.add_program(Vec::new());
        ProgramTree { arena, root }
    }

    /// Top-level statements.
    pub fn body(&self) -> &[NodeIndex] {
        match self.arena.get(self.root) {
            Some(Node::Program { body }) => body,
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid ESTree document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },
    #[error("expected a Program node at the root, found {0}")]
    NotAProgram(&'static str),
}

/// Turns source text into a `ProgramTree`.
///
/// The transform itself never parses; whoever calls `transform_source`
/// chooses how text becomes a tree.
pub trait SourceParser {
    fn parse(&self, source_text: &str) -> Result<ProgramTree, ParseError>;
}
