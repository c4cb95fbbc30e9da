//! Subscriber setup for watching rewrites happen.
//!
//! `UNRAVEL_LOG` takes a `RUST_LOG` style filter or one of the presets below.
//! `UNRAVEL_LOG_FORMAT` picks `text` (default), `tree` or `json`.
//!
//! | preset     | shows                                                  |
//! |------------|--------------------------------------------------------|
//! | `rewrites` | one `rewrite` span per declarator or assignment        |
//! | `temps`    | the same, plus every temporary allocated and hoisted   |
//!
//! ```bash
//! UNRAVEL_LOG=rewrites UNRAVEL_LOG_FORMAT=tree cargo test --test transform_tests
//! UNRAVEL_LOG="unravel::temps=trace" UNRAVEL_LOG_FORMAT=json cargo bench
//! ```
//!
//! Nested patterns show up as nested `rewrite` spans in the tree format,
//! because a chained right side is rewritten inside its parent's span.

use std::borrow::Cow;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};
use unravel_emitter::trace_targets;

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names mean `Text`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("UNRAVEL_LOG_FORMAT").unwrap_or_default())
    }
}

/// Expand a preset name into filter directives. Anything else is already a
/// directive list and passes through.
pub fn filter_directives(value: &str) -> Cow<'_, str> {
    match value.trim() {
        "rewrites" => Cow::Owned(format!("{}=debug", trace_targets::REWRITE)),
        "temps" => Cow::Owned(format!("{}=debug,{}=trace", trace_targets::REWRITE, trace_targets::TEMPS)),
        _ => Cow::Borrowed(value),
    }
}

/// `UNRAVEL_LOG` wins over `RUST_LOG`. `None` when neither is set.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(value) = std::env::var("UNRAVEL_LOG") {
        return Some(EnvFilter::builder().parse_lossy(filter_directives(&value)));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install the global subscriber, writing to stderr.
///
/// Does nothing when no filter is configured or a subscriber is already
/// installed.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };

    // try_init: an earlier call may have installed one already.
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_bracketed_fields(true)
                .with_targets(true)
                .with_writer(std::io::stderr);
            let _ = Registry::default().with(filter).with(tree_layer).try_init();
        }
        LogFormat::Json => {
            // The enclosing `rewrite` span carries node and form for each event.
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr);
            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
