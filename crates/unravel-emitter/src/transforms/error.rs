//! Errors raised by the rewrite engine.
//!
//! Malformed or unsupported input never produces an error: the engine leaves
//! such nodes alone or takes the caching path. Every variant here aborts the
//! whole transform.

use thiserror::Error;
use unravel_parser::parser::NodeIndex;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A rewrite rule produced output of an unexpected shape.
    #[error("internal invariant violated in {context}: {message}")]
    InvariantViolation { context: &'static str, message: String },

    #[error("no unused temporary name left for prefix `{prefix}`")]
    AllocatorExhausted { prefix: String },

    #[error("rewrite chain exceeded depth {depth}")]
    RenormalizationLimit { depth: u32 },

    #[error("node {0:?} is missing from the arena")]
    MissingNode(NodeIndex),
}

impl TransformError {
    pub(crate) fn invariant(context: &'static str, message: impl Into<String>) -> Self {
        TransformError::InvariantViolation {
            context,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
