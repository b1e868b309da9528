// NES Graphics Pipeline Library
// Core library for CHR tile encoding and vblank-budgeted VRAM write scheduling

// Public modules
pub mod chr;
pub mod memory;
pub mod project;
pub mod vram;

// Re-export main types for convenience
pub use chr::{encode_tile, ChrError, PixelTable, Tile, TileBank};
pub use memory::{Mirroring, VideoMemory, Vram};
pub use project::{
    import_image, save_preview, BuildArtifacts, BuildManifest, ImportError, ManifestError,
    PreviewError, Project, ProjectConfig,
};
pub use vram::{
    CarryoverPolicy, CostTable, FlushScheduler, QueueOverflow, QueueStats, WriteKind, WriteQueue,
    WriteRequest,
};
