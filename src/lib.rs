//! unravel: rewrites ES2015 destructuring into plain ES5 assignments.
//!
//! ```javascript
//! var [a, {b}] = f();   // var $0 = f(), a = $0[0], $1 = $0[1], b = $1.b;
//! [a, b] = [b, a];      // var $0; $0 = a, a = b, b = $0;
//! ```
//!
//! The crate is a facade over the workspace:
//!
//! - `unravel-parser`: the program tree and the ESTree JSON ingestion parser
//! - `unravel-binder`: name usage for collision-free temporaries
//! - `unravel-emitter`: the rewrite engine and the code generator
//!
//! `transform` works on trees; `transform_source` and `transform_source_with`
//! compose parse, transform and generate.

use thiserror::Error;
use tracing::{debug, info_span};

pub use unravel_common::{GenerateOptions, NamingStrategy, NewLineKind, TempPlacement, TransformOptions};
pub use unravel_emitter::{LoweringStats, TransformError, generate};
pub use unravel_parser::{EstreeJsonParser, NodeArena, NodeIndex, ParseError, ProgramTree, SourceParser};

// Subscriber setup driven by UNRAVEL_LOG / UNRAVEL_LOG_FORMAT
pub mod tracing_config;
#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;

/// Failure of a whole transform. There is never partial output.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rewrite every destructuring construct in `tree` and return it.
pub fn transform(mut tree: ProgramTree, options: &TransformOptions) -> Result<ProgramTree> {
    transform_with_stats(&mut tree, options)?;
    Ok(tree)
}

/// Rewrite `tree` in place, reporting what was rewritten.
pub fn transform_with_stats(tree: &mut ProgramTree, options: &TransformOptions) -> Result<LoweringStats> {
    let span = info_span!("transform", nodes = tree.arena.len(), prefix = %options.name_prefix);
    let _enter = span.enter();
    Ok(unravel_emitter::lower_destructuring(tree, options)?)
}

/// Parse ESTree JSON, transform it and generate source text.
pub fn transform_source(
    source_text: &str,
    transform_options: &TransformOptions,
    generate_options: &GenerateOptions,
) -> Result<String> {
    transform_source_with(&EstreeJsonParser, source_text, transform_options, generate_options)
}

/// `transform_source` with a caller-supplied parser.
pub fn transform_source_with<P: SourceParser + ?Sized>(
    parser: &P,
    source_text: &str,
    transform_options: &TransformOptions,
    generate_options: &GenerateOptions,
) -> Result<String> {
    let span = info_span!("transform_source", bytes = source_text.len());
    let _enter = span.enter();

    let tree = parser.parse(source_text)?;
    let tree = transform(tree, transform_options)?;
    let output = generate(&tree, generate_options);
    debug!(bytes = output.len(), "generated output");
    Ok(output)
}
