//! Read-only syntax analysis over the arena.

pub mod transform_utils;

#[cfg(test)]
#[path = "../../tests/transform_utils_tests.rs"]
mod tests;
