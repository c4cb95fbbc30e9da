//! Arena-allocated program tree.

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod node;
pub use node::{FunctionData, LiteralValue, Node, NodeArena, PropertyKind, VarKind};

mod node_access;
mod node_arena;

pub mod program;
pub use program::{ParseError, ProgramTree, SourceParser};

pub mod estree;
pub use estree::EstreeJsonParser;

#[cfg(test)]
#[path = "../../tests/parser_tests.rs"]
mod tests;
