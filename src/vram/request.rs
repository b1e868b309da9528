// Deferred write request types
//
// A write request captures one video-memory update produced during the main
// update phase: where it goes, what kind of destination it is, and the
// payload bytes. Requests are immutable once built; the queue stamps them
// with a sequence number but never rewrites them.

use super::constants::{MAX_RUN_BYTES, PPU_ADDR_MASK};

/// Destination kind of a deferred write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteKind {
    /// Tile index cells in a nametable
    Nametable,
    /// One attribute table byte (palette selection for a 4x4 tile area)
    Attribute,
    /// One palette RAM entry
    Palette,
}

impl std::fmt::Display for WriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteKind::Nametable => write!(f, "nametable"),
            WriteKind::Attribute => write!(f, "attribute"),
            WriteKind::Palette => write!(f, "palette"),
        }
    }
}

/// One deferred video-memory write
///
/// The payload shape is fixed per kind: attribute and palette writes carry a
/// single byte, nametable writes carry a run of bytes stored at contiguous
/// addresses. Destination addresses are masked into the PPU's 14-bit space
/// at construction.
///
/// # Examples
///
/// ```
/// use nes_gfx::vram::WriteRequest;
///
/// let run = WriteRequest::nametable(0x2000, vec![0x01, 0x02, 0x03]);
/// assert_eq!(run.addr(), 0x2000);
/// assert_eq!(run.payload_len(), 3);
/// assert_eq!(run.end_addr(), 0x2003);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRequest {
    /// Run of tile indices at contiguous nametable addresses
    Nametable { addr: u16, data: Vec<u8> },
    /// One attribute byte
    Attribute { addr: u16, data: u8 },
    /// One palette entry
    Palette { addr: u16, data: u8 },
}

impl WriteRequest {
    /// Build a nametable run write
    ///
    /// # Arguments
    ///
    /// * `addr` - First destination address (masked to 14 bits)
    /// * `data` - Tile indices for contiguous cells, 1 to 64 bytes
    ///
    /// # Panics
    ///
    /// Panics if `data` is empty or longer than 64 bytes. The cap keeps any
    /// single request affordable within a vertical blank budget.
    pub fn nametable(addr: u16, data: Vec<u8>) -> Self {
        assert!(!data.is_empty(), "Nametable run must carry at least one byte");
        assert!(
            data.len() <= MAX_RUN_BYTES,
            "Nametable run of {} bytes exceeds the {}-byte cap",
            data.len(),
            MAX_RUN_BYTES
        );

        WriteRequest::Nametable {
            addr: addr & PPU_ADDR_MASK,
            data,
        }
    }

    /// Build an attribute byte write
    ///
    /// # Arguments
    ///
    /// * `addr` - Attribute byte address (masked to 14 bits)
    /// * `data` - Packed palette selections for the covered tile area
    pub fn attribute(addr: u16, data: u8) -> Self {
        WriteRequest::Attribute {
            addr: addr & PPU_ADDR_MASK,
            data,
        }
    }

    /// Build a palette entry write
    ///
    /// # Arguments
    ///
    /// * `addr` - Palette RAM address (masked to 14 bits)
    /// * `data` - Color value for the entry
    pub fn palette(addr: u16, data: u8) -> Self {
        WriteRequest::Palette {
            addr: addr & PPU_ADDR_MASK,
            data,
        }
    }

    /// Destination kind of this request
    pub fn kind(&self) -> WriteKind {
        match self {
            WriteRequest::Nametable { .. } => WriteKind::Nametable,
            WriteRequest::Attribute { .. } => WriteKind::Attribute,
            WriteRequest::Palette { .. } => WriteKind::Palette,
        }
    }

    /// First destination address
    pub fn addr(&self) -> u16 {
        match self {
            WriteRequest::Nametable { addr, .. } => *addr,
            WriteRequest::Attribute { addr, .. } => *addr,
            WriteRequest::Palette { addr, .. } => *addr,
        }
    }

    /// Payload length in bytes
    pub fn payload_len(&self) -> usize {
        match self {
            WriteRequest::Nametable { data, .. } => data.len(),
            WriteRequest::Attribute { .. } | WriteRequest::Palette { .. } => 1,
        }
    }

    /// First address past the payload, wrapped to the 14-bit space
    ///
    /// A follow-up request starting exactly here is contiguous with this one:
    /// the hardware address register already points at it after the last
    /// payload byte lands.
    pub fn end_addr(&self) -> u16 {
        (self.addr().wrapping_add(self.payload_len() as u16)) & PPU_ADDR_MASK
    }
}
