//! VRAM queue unit tests
//!
//! This module contains tests for the deferred write queue, organized by
//! functionality: request construction, queue bookkeeping, flush behavior,
//! and scheduling policy.

use super::*;
use crate::memory::{VideoMemory, Vram};

// ========================================
// Test Constants (default cost arithmetic)
// ========================================

/// Cost of a single attribute or palette write with address setup
pub(crate) const SINGLE_WRITE_COST: u32 = 12 + 8;

/// Cost of an n-byte nametable run with address setup
pub(crate) const fn run_cost(bytes: u32) -> u32 {
    12 + 13 * bytes
}

// ========================================
// Test Helper Functions
// ========================================

/// Video memory stand-in that records every write in arrival order
pub(crate) struct RecordingMemory {
    pub(crate) writes: Vec<(u16, u8)>,
}

impl RecordingMemory {
    pub(crate) fn new() -> Self {
        RecordingMemory { writes: Vec::new() }
    }

    /// The most recent value written to an address, if any
    pub(crate) fn last_at(&self, addr: u16) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(a, _)| *a == addr)
            .map(|(_, d)| *d)
    }
}

impl VideoMemory for RecordingMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.last_at(addr).unwrap_or(0)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.writes.push((addr, data));
    }
}

// ========================================
// Test Modules
// ========================================

mod queue;
