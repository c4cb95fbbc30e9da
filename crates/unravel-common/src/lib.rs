//! Common types shared by every unravel crate.
//!
//! This crate provides:
//! - Transform and code generation options (`TransformOptions`, `GenerateOptions`)
//! - Option enums (`NamingStrategy`, `TempPlacement`, `NewLineKind`)
//! - Centralized limits

// Options for the rewrite engine and the printer
pub mod options;
pub use options::{GenerateOptions, NamingStrategy, NewLineKind, TempPlacement, TransformOptions};

// Centralized limits and thresholds
pub mod limits;
