// CHR module - 2bpp planar tile encoding and pattern bank management
//
// This module converts author-specified pixel tables into the PPU's native
// CHR format and keeps the index bookkeeping for a pattern table. The encoded
// bytes are what the PPU fetches during rendering, so the layout here is a
// bit-exact hardware contract.
//
// # Tile Format
//
// ```text
// One tile = 8x8 pixels = 16 bytes:
//
// Byte  0-7:  low bitplane  (bit 0 of each pixel, one byte per row)
// Byte  8-15: high bitplane (bit 1 of each pixel, one byte per row)
//
// Within a row byte, bit 7 is the leftmost pixel and bit 0 the rightmost.
// ```
//
// # Pattern Table Layout
//
// A pattern table is the plain concatenation of tiles: tile N starts at byte
// offset N * 16. There is no header and no padding, which is why bank export
// must stay headerless.

pub mod constants;

#[cfg(test)]
mod tests;

use constants::{BANK_CAPACITY, MAX_PIXEL_VALUE, PLANE_BYTES, TILE_BYTES, TILE_SIZE};

/// Error type for tile encoding and bank registration
#[derive(Debug)]
pub enum ChrError {
    /// A pixel value outside the 2bpp range {0, 1, 2, 3} was stored
    InvalidPixelValue { value: u8 },
    /// A pixel table's dimensions do not fit the operation
    InvalidDimensions { width: usize, height: usize },
    /// The bank already holds 256 tiles
    BankFull,
}

impl std::fmt::Display for ChrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChrError::InvalidPixelValue { value } => {
                write!(f, "Pixel value {} exceeds 2bpp range (0-3)", value)
            }
            ChrError::InvalidDimensions { width, height } => {
                write!(f, "Invalid pixel table dimensions: {}x{}", width, height)
            }
            ChrError::BankFull => {
                write!(f, "Pattern bank is full ({} tiles)", BANK_CAPACITY)
            }
        }
    }
}

impl std::error::Error for ChrError {}

/// Rectangular grid of 2-bit color indices
///
/// A pixel table is the author-facing input of the encoder. Both dimensions
/// must be non-zero multiples of 8 so the table divides exactly into 8x8 tile
/// blocks. Every stored value is in the range 0-3; out-of-range values are
/// rejected when they are stored, so a constructed table is always encodable.
///
/// # Examples
///
/// ```
/// use nes_gfx::chr::PixelTable;
///
/// let mut table = PixelTable::new(8, 8).unwrap();
/// table.set(0, 0, 3).unwrap();
/// assert_eq!(table.get(0, 0), 3);
///
/// // Values beyond the 2bpp range never enter the table
/// assert!(table.set(1, 0, 4).is_err());
/// assert_eq!(table.get(1, 0), 0);
/// ```
#[derive(Clone)]
pub struct PixelTable {
    /// Width in pixels (multiple of 8)
    width: usize,
    /// Height in pixels (multiple of 8)
    height: usize,
    /// Row-major pixel storage, one color index per byte
    pixels: Vec<u8>,
}

impl PixelTable {
    /// Create a pixel table filled with color index 0
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels, non-zero multiple of 8
    /// * `height` - Height in pixels, non-zero multiple of 8
    ///
    /// # Errors
    ///
    /// Returns `ChrError::InvalidDimensions` if either dimension is zero or
    /// not a multiple of 8.
    pub fn new(width: usize, height: usize) -> Result<Self, ChrError> {
        if width == 0
            || height == 0
            || !width.is_multiple_of(TILE_SIZE)
            || !height.is_multiple_of(TILE_SIZE)
        {
            return Err(ChrError::InvalidDimensions { width, height });
        }

        Ok(PixelTable {
            width,
            height,
            pixels: vec![0; width * height],
        })
    }

    /// Create a pixel table from existing row-major pixel data
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels, non-zero multiple of 8
    /// * `height` - Height in pixels, non-zero multiple of 8
    /// * `pixels` - Row-major color indices, exactly `width * height` values
    ///
    /// # Errors
    ///
    /// Returns `ChrError::InvalidDimensions` for bad dimensions and
    /// `ChrError::InvalidPixelValue` for the first value outside 0-3.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` is not exactly `width * height` bytes long.
    pub fn from_pixels(width: usize, height: usize, pixels: &[u8]) -> Result<Self, ChrError> {
        let mut table = Self::new(width, height)?;
        assert_eq!(
            pixels.len(),
            width * height,
            "Pixel data must be exactly width * height bytes"
        );

        for &value in pixels {
            if value > MAX_PIXEL_VALUE {
                return Err(ChrError::InvalidPixelValue { value });
            }
        }
        table.pixels.copy_from_slice(pixels);

        Ok(table)
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of 8x8 tile columns
    pub const fn tiles_wide(&self) -> usize {
        self.width / TILE_SIZE
    }

    /// Number of 8x8 tile rows
    pub const fn tiles_high(&self) -> usize {
        self.height / TILE_SIZE
    }

    /// Number of 8x8 tile blocks the table divides into
    pub const fn tile_count(&self) -> usize {
        self.tiles_wide() * self.tiles_high()
    }

    /// Store a color index at the given pixel position
    ///
    /// # Arguments
    ///
    /// * `x` - Column, 0 is leftmost
    /// * `y` - Row, 0 is topmost
    /// * `value` - Color index 0-3
    ///
    /// # Errors
    ///
    /// Returns `ChrError::InvalidPixelValue` if `value` is greater than 3.
    /// The table is unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the table.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Result<(), ChrError> {
        assert!(x < self.width, "x {} out of range for width {}", x, self.width);
        assert!(y < self.height, "y {} out of range for height {}", y, self.height);

        if value > MAX_PIXEL_VALUE {
            return Err(ChrError::InvalidPixelValue { value });
        }

        self.pixels[y * self.width + x] = value;
        Ok(())
    }

    /// Read the color index at the given pixel position
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the table.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width, "x {} out of range for width {}", x, self.width);
        assert!(y < self.height, "y {} out of range for height {}", y, self.height);

        self.pixels[y * self.width + x]
    }

    /// Extract one 8x8 tile block as a standalone pixel table
    ///
    /// # Arguments
    ///
    /// * `tile_x` - Tile column, 0-based
    /// * `tile_y` - Tile row, 0-based
    ///
    /// # Panics
    ///
    /// Panics if the tile coordinates are outside the table.
    pub fn block(&self, tile_x: usize, tile_y: usize) -> PixelTable {
        assert!(
            tile_x < self.tiles_wide(),
            "tile_x {} out of range for {} tile columns",
            tile_x,
            self.tiles_wide()
        );
        assert!(
            tile_y < self.tiles_high(),
            "tile_y {} out of range for {} tile rows",
            tile_y,
            self.tiles_high()
        );

        let mut pixels = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
        for y in 0..TILE_SIZE {
            let row = tile_y * TILE_SIZE + y;
            let start = row * self.width + tile_x * TILE_SIZE;
            pixels.extend_from_slice(&self.pixels[start..start + TILE_SIZE]);
        }

        PixelTable {
            width: TILE_SIZE,
            height: TILE_SIZE,
            pixels,
        }
    }
}

/// One encoded 8x8 tile (16 bytes, two bitplanes)
///
/// A tile is a pure function of its source pixel block: encoding the same
/// block always produces the same bytes. The stored layout is exactly what
/// the PPU fetches, low plane first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    bytes: [u8; TILE_BYTES],
}

impl Tile {
    /// Wrap 16 raw CHR bytes as a tile
    pub const fn from_bytes(bytes: [u8; TILE_BYTES]) -> Self {
        Tile { bytes }
    }

    /// The encoded bytes, low plane then high plane
    pub const fn bytes(&self) -> &[u8; TILE_BYTES] {
        &self.bytes
    }

    /// Decode one pixel back out of the encoded planes
    ///
    /// This is the reference unpacker: it mirrors the PPU's fetch exactly,
    /// reading bit `7 - x` of the row's low and high plane bytes and
    /// recombining them into a 2-bit color index.
    ///
    /// # Arguments
    ///
    /// * `x` - Column within the tile (0-7, 0 is leftmost)
    /// * `y` - Row within the tile (0-7, 0 is topmost)
    ///
    /// # Returns
    ///
    /// The color index (0-3) of the pixel
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is 8 or more.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        assert!(x < TILE_SIZE, "x {} out of range for tile", x);
        assert!(y < TILE_SIZE, "y {} out of range for tile", y);

        let bit_pos = 7 - x;
        let bit_0 = (self.bytes[y] >> bit_pos) & 0x01;
        let bit_1 = (self.bytes[y + PLANE_BYTES] >> bit_pos) & 0x01;

        (bit_1 << 1) | bit_0
    }
}

/// Encode one 8x8 pixel block into the 2bpp planar tile format
///
/// Row `y` of the tile becomes two bytes: byte `y` holds bit 0 of each pixel
/// and byte `y + 8` holds bit 1, with bit 7 of each byte carrying the
/// leftmost pixel.
///
/// # Arguments
///
/// * `block` - An exactly 8x8 pixel table
///
/// # Errors
///
/// Returns `ChrError::InvalidDimensions` if `block` is not 8x8. Pixel values
/// cannot be out of range here because `PixelTable` rejects them at insertion.
///
/// # Example
///
/// ```
/// use nes_gfx::chr::{encode_tile, PixelTable};
///
/// let mut block = PixelTable::new(8, 8).unwrap();
/// block.set(0, 0, 3).unwrap();
///
/// let tile = encode_tile(&block).unwrap();
/// assert_eq!(tile.bytes()[0], 0x80); // low plane, row 0, leftmost pixel
/// assert_eq!(tile.bytes()[8], 0x80); // high plane, row 0, leftmost pixel
/// ```
pub fn encode_tile(block: &PixelTable) -> Result<Tile, ChrError> {
    if block.width() != TILE_SIZE || block.height() != TILE_SIZE {
        return Err(ChrError::InvalidDimensions {
            width: block.width(),
            height: block.height(),
        });
    }

    let mut bytes = [0u8; TILE_BYTES];
    for y in 0..TILE_SIZE {
        let mut low = 0u8;
        let mut high = 0u8;
        for x in 0..TILE_SIZE {
            let pixel = block.get(x, y);
            let bit_pos = 7 - x;
            low |= (pixel & 0x01) << bit_pos;
            high |= ((pixel >> 1) & 0x01) << bit_pos;
        }
        bytes[y] = low;
        bytes[y + PLANE_BYTES] = high;
    }

    Ok(Tile::from_bytes(bytes))
}

/// Ordered bank of encoded tiles backing one pattern table
///
/// Tiles are identified by their position in the bank. Once registered, an
/// index is never reused or shifted within a build, so any index handed out
/// stays valid for the bank's whole lifetime. The bank holds at most 256
/// tiles, the hardware limit of a pattern table.
///
/// # Examples
///
/// ```
/// use nes_gfx::chr::{PixelTable, TileBank};
///
/// let mut bank = TileBank::new();
/// let block = PixelTable::new(8, 8).unwrap();
///
/// let index = bank.register(&block).unwrap();
/// assert_eq!(index, 0);
/// assert_eq!(bank.export().len(), 16);
/// ```
#[derive(Clone)]
pub struct TileBank {
    tiles: Vec<Tile>,
}

impl TileBank {
    /// Create an empty bank
    pub fn new() -> Self {
        TileBank { tiles: Vec::new() }
    }

    /// Encode a pixel block and append it to the bank
    ///
    /// # Arguments
    ///
    /// * `block` - An exactly 8x8 pixel table
    ///
    /// # Returns
    ///
    /// The index assigned to the new tile (0-255, in registration order)
    ///
    /// # Errors
    ///
    /// Returns `ChrError::BankFull` if the bank already holds 256 tiles, or
    /// `ChrError::InvalidDimensions` if `block` is not 8x8. The bank is
    /// unchanged on error.
    pub fn register(&mut self, block: &PixelTable) -> Result<u8, ChrError> {
        let tile = encode_tile(block)?;
        self.register_tile(tile)
    }

    /// Append an already-encoded tile to the bank
    ///
    /// # Errors
    ///
    /// Returns `ChrError::BankFull` if the bank already holds 256 tiles.
    pub fn register_tile(&mut self, tile: Tile) -> Result<u8, ChrError> {
        if self.tiles.len() >= BANK_CAPACITY {
            return Err(ChrError::BankFull);
        }

        let index = self.tiles.len() as u8;
        self.tiles.push(tile);
        Ok(index)
    }

    /// Register every 8x8 block of a multi-tile table, row-major
    ///
    /// Blocks are registered left to right, top to bottom, so the returned
    /// index map lines up with the table's tile grid in reading order.
    ///
    /// The call is atomic with respect to capacity: if the table does not
    /// fit in the remaining space, nothing is registered.
    ///
    /// # Arguments
    ///
    /// * `table` - A pixel table of any valid size
    ///
    /// # Returns
    ///
    /// The bank indices assigned to the table's blocks, in reading order
    ///
    /// # Errors
    ///
    /// Returns `ChrError::BankFull` if the table's blocks would exceed the
    /// 256-tile ceiling. The bank is unchanged on error.
    pub fn register_table(&mut self, table: &PixelTable) -> Result<Vec<u8>, ChrError> {
        if table.tile_count() > self.remaining() {
            return Err(ChrError::BankFull);
        }

        let mut indices = Vec::with_capacity(table.tile_count());
        for tile_y in 0..table.tiles_high() {
            for tile_x in 0..table.tiles_wide() {
                let block = table.block(tile_x, tile_y);
                indices.push(self.register(&block)?);
            }
        }

        Ok(indices)
    }

    /// Export the bank as raw pattern table bytes
    ///
    /// The output is the concatenation of all registered tiles in index
    /// order: tile N occupies bytes `N * 16 .. N * 16 + 16`. No header, no
    /// padding. Exporting does not change the bank, so calling this between
    /// registrations always reflects exactly the tiles registered so far.
    pub fn export(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.tiles.len() * TILE_BYTES);
        for tile in &self.tiles {
            bytes.extend_from_slice(tile.bytes());
        }
        bytes
    }

    /// Look up a registered tile by index
    pub fn tile(&self, index: u8) -> Option<&Tile> {
        self.tiles.get(index as usize)
    }

    /// All registered tiles in index order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of registered tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if no tiles have been registered
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of tiles that can still be registered
    pub fn remaining(&self) -> usize {
        BANK_CAPACITY - self.tiles.len()
    }
}

impl Default for TileBank {
    fn default() -> Self {
        Self::new()
    }
}
