// Memory module - video memory sink and address space model
//
// This module defines the write target the flush path drives, plus a
// concrete in-memory model of the PPU's address space for tests, previews,
// and anything else that wants to observe what a flushed frame looks like.
//
// # PPU Memory Map
//
// ```text
// $0000-$0FFF: Pattern table 0 (4KB, CHR)
// $1000-$1FFF: Pattern table 1 (4KB, CHR)
// $2000-$2FFF: Nametables (4 logical tables over 2KB physical VRAM)
// $3000-$3EFF: Mirror of $2000-$2EFF
// $3F00-$3F1F: Palette RAM (32 bytes)
// $3F20-$3FFF: Mirrors of palette RAM
// ```
//
// All addresses are 14-bit; anything above $3FFF wraps back into the map.

use crate::chr::constants::PATTERN_TABLE_SIZE;
use crate::chr::TileBank;

/// Size of the CHR region in bytes (two pattern tables)
const CHR_SIZE: usize = 2 * PATTERN_TABLE_SIZE;

/// Size of one nametable in bytes (1KB)
const NAMETABLE_SIZE: usize = 1024;

/// Size of the physical nametable VRAM in bytes (2KB)
const NAMETABLE_RAM_SIZE: usize = 2048;

/// Size of palette RAM in bytes
const PALETTE_SIZE: usize = 32;

/// Trait for video memory write targets
///
/// The flush path drives this interface one byte at a time, exactly as the
/// hardware data port would be driven. Implementations route each address to
/// the right internal region and apply whatever mirroring that region has.
pub trait VideoMemory {
    /// Read a byte from video memory
    ///
    /// Takes `&mut self` because real hardware ports have side effects on
    /// read (buffered data, status flag clears); a pure model can simply
    /// ignore the mutability.
    ///
    /// # Arguments
    /// * `addr` - The address to read from (masked to 14 bits)
    ///
    /// # Returns
    /// The byte value at the specified address
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to video memory
    ///
    /// # Arguments
    /// * `addr` - The address to write to (masked to 14 bits)
    /// * `data` - The byte value to write
    fn write(&mut self, addr: u16, data: u8);
}

/// Nametable mirroring arrangement
///
/// The address space has room for four nametables but only 2KB of physical
/// VRAM backs them, so two logical tables always share each physical one.
/// Which pairs share is the mirroring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000=$2400 and $2800=$2C00 (vertical scrolling layouts)
    Horizontal,
    /// $2000=$2800 and $2400=$2C00 (horizontal scrolling layouts)
    Vertical,
    /// All four logical tables map to the same physical table
    SingleScreen,
}

/// In-memory model of the PPU address space
///
/// Holds 8KB of CHR, 2KB of nametable VRAM, and 32 bytes of palette RAM
/// with the hardware's mirroring rules. Used as the flush sink in tests and
/// as the data source for preview rendering.
///
/// # Examples
///
/// ```
/// use nes_gfx::memory::{Mirroring, VideoMemory, Vram};
///
/// let mut vram = Vram::with_mirroring(Mirroring::Horizontal);
/// vram.write(0x2000, 0x42);
///
/// // Horizontal mirroring: $2400 shares physical memory with $2000
/// assert_eq!(vram.read(0x2400), 0x42);
/// ```
#[derive(Clone)]
pub struct Vram {
    /// Pattern table storage (CHR RAM)
    chr: [u8; CHR_SIZE],
    /// Physical nametable VRAM
    nametables: [u8; NAMETABLE_RAM_SIZE],
    /// Palette RAM
    palette: [u8; PALETTE_SIZE],
    /// Active nametable mirroring mode
    mirroring: Mirroring,
}

impl Vram {
    /// Create zeroed video memory with horizontal mirroring
    pub fn new() -> Self {
        Self::with_mirroring(Mirroring::Horizontal)
    }

    /// Create zeroed video memory with the given mirroring mode
    pub fn with_mirroring(mirroring: Mirroring) -> Self {
        Vram {
            chr: [0; CHR_SIZE],
            nametables: [0; NAMETABLE_RAM_SIZE],
            palette: [0; PALETTE_SIZE],
            mirroring,
        }
    }

    /// The active mirroring mode
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Change the mirroring mode
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Zero all memory regions
    pub fn reset(&mut self) {
        self.chr.fill(0);
        self.nametables.fill(0);
        self.palette.fill(0);
    }

    /// Copy a bank's exported pattern table bytes into CHR
    ///
    /// The export lands at the start of the chosen pattern table; a bank
    /// with fewer than 256 tiles leaves the tail of the table untouched.
    ///
    /// # Arguments
    ///
    /// * `bank` - The tile bank to load
    /// * `table_index` - Destination pattern table, 0 or 1
    ///
    /// # Panics
    ///
    /// Panics if `table_index` is not 0 or 1.
    pub fn load_bank(&mut self, bank: &TileBank, table_index: usize) {
        assert!(table_index < 2, "Pattern table index must be 0 or 1");

        let base = table_index * PATTERN_TABLE_SIZE;
        let bytes = bank.export();
        self.chr[base..base + bytes.len()].copy_from_slice(&bytes);
    }

    /// Read a byte without the trait's `&mut` requirement
    ///
    /// This model has no read side effects, so a plain borrow is enough.
    pub fn peek(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF; // Mirror to 14-bit address space

        match addr {
            // Pattern tables: $0000-$1FFF
            0x0000..=0x1FFF => self.chr[addr as usize],

            // Nametables: $2000-$2FFF
            0x2000..=0x2FFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr);
                self.nametables[mirrored_addr]
            }

            // Nametable mirrors: $3000-$3EFF -> $2000-$2EFF
            0x3000..=0x3EFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[mirrored_addr]
            }

            // Palette RAM: $3F00-$3FFF
            0x3F00..=0x3FFF => {
                let mirrored_addr = self.mirror_palette_addr(addr);
                self.palette[mirrored_addr]
            }

            _ => unreachable!(),
        }
    }

    /// Decode one pixel of a stored tile
    ///
    /// Reads the tile's two bitplane bytes for the requested row straight
    /// out of CHR and recombines them, exactly as the rendering fetch does.
    /// This closes the loop on the encoder: a registered block, exported and
    /// loaded here, reads back pixel for pixel.
    ///
    /// # Arguments
    ///
    /// * `pattern_table_base` - $0000 or $1000
    /// * `tile_index` - The tile's bank index (0-255)
    /// * `pixel_x` - Column within the tile (0-7)
    /// * `pixel_y` - Row within the tile (0-7)
    ///
    /// # Returns
    ///
    /// The pixel's color index (0-3)
    ///
    /// # Panics
    ///
    /// Panics if `pixel_x` or `pixel_y` is 8 or more.
    pub fn tile_pixel(
        &self,
        pattern_table_base: u16,
        tile_index: u8,
        pixel_x: usize,
        pixel_y: usize,
    ) -> u8 {
        assert!(pixel_x < 8, "pixel_x {} out of range for tile", pixel_x);
        assert!(pixel_y < 8, "pixel_y {} out of range for tile", pixel_y);

        // Each tile is 16 bytes (8 bytes per bitplane)
        let tile_addr = pattern_table_base + (tile_index as u16) * 16;

        // Read the two bitplanes for this row
        let bitplane_0 = self.peek(tile_addr + pixel_y as u16);
        let bitplane_1 = self.peek(tile_addr + pixel_y as u16 + 8);

        // Extract the bit for this pixel (MSB is leftmost pixel)
        let bit_pos = 7 - pixel_x;
        let bit_0 = (bitplane_0 >> bit_pos) & 0x01;
        let bit_1 = (bitplane_1 >> bit_pos) & 0x01;

        // Combine bits to form 2-bit color index
        (bit_1 << 1) | bit_0
    }

    /// Mirror a nametable address to a physical VRAM offset
    ///
    /// # Arguments
    ///
    /// * `addr` - Nametable address ($2000-$2FFF)
    ///
    /// # Returns
    ///
    /// Physical VRAM offset (0-2047)
    fn mirror_nametable_addr(&self, addr: u16) -> usize {
        // Normalize address to 0-0xFFF range (remove $2000 base)
        let addr = (addr & 0x0FFF) as usize;

        // Determine which nametable (0-3)
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let mirrored_table = match self.mirroring {
            Mirroring::Horizontal => {
                // Horizontal: 0->0, 1->0, 2->1, 3->1
                // $2000=$2400, $2800=$2C00
                match table {
                    0 | 1 => 0,
                    2 | 3 => 1,
                    _ => unreachable!(),
                }
            }
            Mirroring::Vertical => {
                // Vertical: 0->0, 1->1, 2->0, 3->1
                // $2000=$2800, $2400=$2C00
                match table {
                    0 | 2 => 0,
                    1 | 3 => 1,
                    _ => unreachable!(),
                }
            }
            Mirroring::SingleScreen => {
                // All nametables point to the same physical table
                0
            }
        };

        mirrored_table * NAMETABLE_SIZE + offset
    }

    /// Mirror a palette address to a palette RAM offset
    ///
    /// Palette RAM has special mirroring: $3F10, $3F14, $3F18, $3F1C mirror
    /// $3F00, $3F04, $3F08, $3F0C, because sprite palette entry 0 is shared
    /// with the background color.
    ///
    /// # Arguments
    ///
    /// * `addr` - Palette address ($3F00-$3FFF)
    ///
    /// # Returns
    ///
    /// Palette RAM offset (0-31)
    fn mirror_palette_addr(&self, addr: u16) -> usize {
        // Palette RAM is 32 bytes, mirrored throughout $3F00-$3FFF
        let addr = (addr & 0x001F) as usize;

        // Special mirroring: $3F10, $3F14, $3F18, $3F1C -> $3F00, $3F04, $3F08, $3F0C
        if addr >= 16 && addr.is_multiple_of(4) {
            addr - 16
        } else {
            addr
        }
    }
}

impl VideoMemory for Vram {
    fn read(&mut self, addr: u16) -> u8 {
        self.peek(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF; // Mirror to 14-bit address space

        match addr {
            // Pattern tables: $0000-$1FFF
            0x0000..=0x1FFF => self.chr[addr as usize] = data,

            // Nametables: $2000-$2FFF
            0x2000..=0x2FFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr);
                self.nametables[mirrored_addr] = data;
            }

            // Nametable mirrors: $3000-$3EFF -> $2000-$2EFF
            0x3000..=0x3EFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[mirrored_addr] = data;
            }

            // Palette RAM: $3F00-$3FFF
            0x3F00..=0x3FFF => {
                let mirrored_addr = self.mirror_palette_addr(addr);
                self.palette[mirrored_addr] = data;
            }

            _ => unreachable!(),
        }
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}
