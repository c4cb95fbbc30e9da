//! Identifier Allocator.
//!
//! Temporaries are named `prefix + base36(counter)`: `$0`, `$1`, ... `$z`,
//! `$10`. The counter only moves forward, so one allocator never hands out
//! the same name twice, and a fresh allocator over the same program always
//! produces the same sequence.

use super::error::{Result, TransformError};
use crate::trace_targets;
use tracing::trace;
use unravel_binder::ScopeInfo;
use unravel_common::NamingStrategy;

/// Allocator for one transform run.
pub struct TempNameAllocator {
    prefix: String,
    counter: u32,
    allocated: usize,
    /// Names already present in the program, checked by `GlobalUnique`.
    reserved: Option<ScopeInfo>,
}

impl TempNameAllocator {
    /// Skip every candidate declared or referenced anywhere in the program.
    pub fn global_unique(prefix: impl Into<String>, scopes: ScopeInfo) -> Self {
        TempNameAllocator {
            prefix: prefix.into(),
            counter: 0,
            allocated: 0,
            reserved: Some(scopes),
        }
    }

    /// Trust the prefix to be reserved for generated code.
    pub fn simple_prefix(prefix: impl Into<String>) -> Self {
        TempNameAllocator {
            prefix: prefix.into(),
            counter: 0,
            allocated: 0,
            reserved: None,
        }
    }

    pub fn strategy(&self) -> NamingStrategy {
        if self.reserved.is_some() {
            NamingStrategy::GlobalUnique
        } else {
            NamingStrategy::SimplePrefix
        }
    }

    /// Number of names handed out so far.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Next unused name.
    pub fn next_name(&mut self) -> Result<String> {
        loop {
            let candidate = format!("{}{}", self.prefix, to_base36(self.counter));
            self.counter = self
                .counter
                .checked_add(1)
                .ok_or_else(|| TransformError::AllocatorExhausted {
                    prefix: self.prefix.clone(),
                })?;
            let taken = self
                .reserved
                .as_ref()
                .is_some_and(|scopes| scopes.is_used_name(&candidate));
            if taken {
                trace!(target: trace_targets::TEMPS, name = %candidate, "temporary name already used, skipping");
                continue;
            }
            self.allocated += 1;
            trace!(target: trace_targets::TEMPS, name = %candidate, "allocated temporary");
            return Ok(candidate);
        }
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
#[path = "../../tests/temp_names_tests.rs"]
mod tests;
