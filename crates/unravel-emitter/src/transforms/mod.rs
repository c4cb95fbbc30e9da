//! Destructuring rewrite rules and their supporting pieces.
//!
//! - `temp_names`: Identifier Allocator for temporaries
//! - `declaration_target`: collects elementary bindings and finalizes them
//!   into declarators or assignment expressions
//! - `destructuring`: array and object pattern rules
//! - `params`: pattern parameters
//! - `hoisting`: `var` placement for temporaries

pub mod declaration_target;
pub mod destructuring;
pub mod error;
pub mod hoisting;
pub mod params;
pub mod temp_names;
