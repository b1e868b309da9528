// Flush scheduling policy
//
// The scheduler owns the two policy decisions a flush makes: what a request
// costs in CPU cycles, and what happens to requests still queued when the
// vertical blank ends. Both are values, not constants, so a driver with
// different copy loops or latency rules can recalibrate without touching the
// queue itself.

use super::constants::{
    ADDR_SETUP_CYCLES, ATTRIBUTE_BYTE_CYCLES, NAMETABLE_BYTE_CYCLES, PALETTE_BYTE_CYCLES,
};
use super::request::{WriteKind, WriteRequest};

/// What happens to a request still queued when the vertical blank ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryoverPolicy {
    /// Keep the request queued; it flushes ahead of the next frame's writes
    Carry,
    /// Discard the request; the frame that wanted it has already passed
    Drop,
}

/// Per-unit CPU cycle costs of applying write requests
///
/// The defaults model a plain 6502 copy loop: two PPUADDR stores to aim at a
/// destination, then one PPUDATA store per payload byte with the loop
/// overhead folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostTable {
    /// Cycles to aim PPUADDR at a non-contiguous destination
    pub addr_setup: u32,
    /// Cycles per nametable run byte
    pub nametable_byte: u32,
    /// Cycles per attribute byte
    pub attribute_byte: u32,
    /// Cycles per palette byte
    pub palette_byte: u32,
}

impl Default for CostTable {
    fn default() -> Self {
        CostTable {
            addr_setup: ADDR_SETUP_CYCLES,
            nametable_byte: NAMETABLE_BYTE_CYCLES,
            attribute_byte: ATTRIBUTE_BYTE_CYCLES,
            palette_byte: PALETTE_BYTE_CYCLES,
        }
    }
}

/// Flush policy: cycle costs plus per-kind carryover behavior
///
/// The default carryover split keeps nametable and attribute writes queued
/// across frames (their content is cumulative screen state) and drops
/// palette writes (a palette change applied a frame late reads as a stray
/// flash rather than the intended effect).
#[derive(Debug, Clone)]
pub struct FlushScheduler {
    /// Cycle cost model
    costs: CostTable,
    /// Carryover behavior for nametable runs
    nametable_policy: CarryoverPolicy,
    /// Carryover behavior for attribute bytes
    attribute_policy: CarryoverPolicy,
    /// Carryover behavior for palette entries
    palette_policy: CarryoverPolicy,
}

impl FlushScheduler {
    /// Create a scheduler with the default costs and carryover split
    pub fn new() -> Self {
        Self::with_costs(CostTable::default())
    }

    /// Create a scheduler with custom costs and the default carryover split
    pub fn with_costs(costs: CostTable) -> Self {
        FlushScheduler {
            costs,
            nametable_policy: CarryoverPolicy::Carry,
            attribute_policy: CarryoverPolicy::Carry,
            palette_policy: CarryoverPolicy::Drop,
        }
    }

    /// The cost model in use
    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// Carryover behavior for one destination kind
    pub fn policy(&self, kind: WriteKind) -> CarryoverPolicy {
        match kind {
            WriteKind::Nametable => self.nametable_policy,
            WriteKind::Attribute => self.attribute_policy,
            WriteKind::Palette => self.palette_policy,
        }
    }

    /// Override the carryover behavior for one destination kind
    pub fn set_policy(&mut self, kind: WriteKind, policy: CarryoverPolicy) {
        match kind {
            WriteKind::Nametable => self.nametable_policy = policy,
            WriteKind::Attribute => self.attribute_policy = policy,
            WriteKind::Palette => self.palette_policy = policy,
        }
    }

    /// True if unflushed requests of this kind survive into the next frame
    pub fn carries_over(&self, kind: WriteKind) -> bool {
        self.policy(kind) == CarryoverPolicy::Carry
    }

    /// Estimated CPU cycles to apply one whole request
    ///
    /// `last_end` is the address one past the previously applied request's
    /// payload, if any. A request starting exactly there skips the address
    /// setup: the hardware address register auto-increments onto it. The
    /// discount never reorders anything; it only prices adjacency that the
    /// enqueue order already provides.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to price
    /// * `last_end` - End address of the previously applied request, if any
    ///
    /// # Returns
    ///
    /// The whole-request cost in CPU cycles
    pub fn cost(&self, request: &WriteRequest, last_end: Option<u16>) -> u32 {
        let setup = match last_end {
            Some(end) if end == request.addr() => 0,
            _ => self.costs.addr_setup,
        };

        let per_byte = match request.kind() {
            WriteKind::Nametable => self.costs.nametable_byte,
            WriteKind::Attribute => self.costs.attribute_byte,
            WriteKind::Palette => self.costs.palette_byte,
        };

        setup + per_byte * request.payload_len() as u32
    }
}

impl Default for FlushScheduler {
    fn default() -> Self {
        Self::new()
    }
}
