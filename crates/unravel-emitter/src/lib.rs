//! Destructuring rewrite engine and JavaScript printer.
//!
//! This crate is organized into:
//! - `lowering_pass` - the work-list driver that finds and rewrites every
//!   destructuring construct
//! - `transforms` - the rewrite rules, the Declaration Target, the
//!   temporary-name allocator and `var` placement
//! - `printer` - turns the rewritten tree back into source text

pub mod lowering_pass;
pub mod printer;
pub mod transforms;

/// `tracing` targets that single out rewrite activity from the rest of the
/// crate's events.
pub mod trace_targets {
    /// One span per rewritten declarator or assignment.
    pub const REWRITE: &str = "unravel::rewrite";
    /// Temporary allocation and `var` hoisting.
    pub const TEMPS: &str = "unravel::temps";
}

pub use lowering_pass::{LoweringPass, LoweringStats, lower_destructuring};
pub use printer::{Printer, generate};
pub use transforms::error::TransformError;
