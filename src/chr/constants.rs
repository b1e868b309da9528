// CHR constants

/// Tile width and height in pixels (8x8)
pub const TILE_SIZE: usize = 8;

/// Size of one bitplane within an encoded tile (8 bytes, one per row)
pub const PLANE_BYTES: usize = 8;

/// Encoded size of one tile in bytes (low plane + high plane)
pub const TILE_BYTES: usize = 16;

/// Hardware ceiling on tiles per pattern table
///
/// Nametable cells and sprite entries address tiles with a single byte,
/// so one pattern table can never hold more than 256 tiles.
pub const BANK_CAPACITY: usize = 256;

/// Size of a full pattern table in bytes (256 tiles x 16 bytes)
pub const PATTERN_TABLE_SIZE: usize = BANK_CAPACITY * TILE_BYTES;

/// Largest color index a 2bpp pixel can hold
pub const MAX_PIXEL_VALUE: u8 = 3;
