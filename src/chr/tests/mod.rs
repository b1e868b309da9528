//! CHR unit tests
//!
//! This module contains tests for the tile encoder, organized by
//! functionality: pixel table construction, plane encoding, and bank
//! bookkeeping.

use super::*;

// ========================================
// Test Helper Functions
// ========================================

/// Build an 8x8 block where every pixel has the same color index
pub(crate) fn solid_block(value: u8) -> PixelTable {
    let pixels = [value; 64];
    PixelTable::from_pixels(8, 8, &pixels).expect("solid block must be valid")
}

/// Build an 8x8 block cycling through all four color indices
pub(crate) fn gradient_block() -> PixelTable {
    let mut block = PixelTable::new(8, 8).expect("8x8 must be valid");
    for y in 0..8 {
        for x in 0..8 {
            block.set(x, y, ((x + y) % 4) as u8).expect("value in range");
        }
    }
    block
}

/// Build an 8x8 block whose content is derived from a seed value
pub(crate) fn seeded_block(seed: u8) -> PixelTable {
    let mut block = PixelTable::new(8, 8).expect("8x8 must be valid");
    for y in 0..8 {
        for x in 0..8 {
            let value = (seed as usize + x * 3 + y) % 4;
            block.set(x, y, value as u8).expect("value in range");
        }
    }
    block
}

// ========================================
// Test Modules
// ========================================
