//! Program tree for the unravel destructuring transform.
//!
//! - `parser`: the arena (`NodeArena`, `NodeIndex`, `Node`), node builders,
//!   child enumeration, `ProgramTree`, the `SourceParser` boundary and the
//!   ESTree JSON ingestion parser
//! - `syntax`: read-only analysis helpers over the arena (pattern detection,
//!   bound names, inert expressions)

pub mod parser;
pub mod syntax;

pub use parser::{
    EstreeJsonParser, Node, NodeArena, NodeIndex, NodeList, ParseError, ProgramTree, SourceParser,
};
