// VRAM queue constants
//
// Cycle figures are calibrated to a plain 6502 PPUDATA copy loop and to NTSC
// frame geometry. They feed the default cost table and flush budget; drivers
// targeting other code or regions can override both.

/// CPU cycles to aim PPUADDR at a new destination (two register stores plus
/// the immediate loads feeding them)
pub const ADDR_SETUP_CYCLES: u32 = 12;

/// CPU cycles to push one nametable byte through PPUDATA
///
/// Indexed load, store, increment, branch: the body of an unrolled-enough
/// copy loop.
pub const NAMETABLE_BYTE_CYCLES: u32 = 13;

/// CPU cycles to push one attribute byte through PPUDATA (load plus store)
pub const ATTRIBUTE_BYTE_CYCLES: u32 = 8;

/// CPU cycles to push one palette byte through PPUDATA (load plus store)
pub const PALETTE_BYTE_CYCLES: u32 = 8;

// ========================================
// NTSC Timing Constants
// ========================================

/// Number of vertical blank scanlines per frame (scanlines 241-260)
pub const VBLANK_SCANLINES: u32 = 20;

/// Number of PPU cycles per scanline
pub const CYCLES_PER_SCANLINE: u32 = 341;

/// PPU cycles per CPU cycle
pub const PPU_CYCLES_PER_CPU_CYCLE: u32 = 3;

/// CPU cycles available inside one NTSC vertical blank
///
/// 20 scanlines x 341 PPU cycles / 3 = 2273 CPU cycles. A flush must never
/// spend more than this when the driver has no better number; overrunning
/// the blank corrupts the visible frame.
pub const NTSC_VBLANK_CPU_CYCLES: u32 =
    VBLANK_SCANLINES * CYCLES_PER_SCANLINE / PPU_CYCLES_PER_CPU_CYCLE;

// ========================================
// Queue Sizing Constants
// ========================================

/// Default bounded capacity of the deferred write queue
pub const DEFAULT_CAPACITY: usize = 64;

/// Longest nametable run payload a write request accepts (two rows)
///
/// Caps the worst head-of-queue cost at 12 + 64 x 13 = 844 cycles, so any
/// budget at or above that always drains at least one request per frame.
pub const MAX_RUN_BYTES: usize = 64;

/// PPU address space mask (14-bit)
pub const PPU_ADDR_MASK: u16 = 0x3FFF;
