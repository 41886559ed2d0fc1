//! Id types and per-instance monotonic id generation.
//!
//! Counters are owned by the engine/bot/book instance that hands out the
//! ids, never process-wide, so independent simulations in one process
//! (parallel test cases, the sweep) cannot interfere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a manual order, unique and monotonic within one order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter for ids. `next()` never repeats a value; `reset()`
/// starts the sequence over (used when a bot is reset to initial state).
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
