//! Test tooling shared by the unravel crates.
//!
//! - `SourceTextParser`: parses the JavaScript subset the transform handles
//!   (ES5 plus destructuring, arrows and generators) straight from source
//!   text, so tests read like the programs they describe
//! - `eval`: a small tree-walking evaluator used to check that rewritten
//!   programs compute the same bindings as the original

mod lexer;
mod source_parser;
pub mod eval;

pub use eval::{EvalError, Globals, Value, run_program};
pub use source_parser::SourceTextParser;

use unravel_parser::{ProgramTree, SourceParser};

/// Parse `source`, panicking with the syntax error on failure.
pub fn parse(source: &str) -> ProgramTree {
    SourceTextParser
        .parse(source)
        .unwrap_or_else(|err| panic!("failed to parse test source {source:?}: {err}"))
}
