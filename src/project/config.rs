// Project configuration
//
// Handles graphics project settings and their persistence as TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::vram::constants::{DEFAULT_CAPACITY, NTSC_VBLANK_CPU_CYCLES};
use crate::vram::{CarryoverPolicy, WriteKind, WriteQueue};

/// Graphics project configuration
///
/// Stores all user-configurable settings for a conversion project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Build settings
    pub build: BuildConfig,

    /// Write queue settings
    pub queue: QueueConfig,

    /// Source palette settings
    pub palette: PaletteConfig,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory scanned for source images
    pub source_directory: PathBuf,

    /// Directory the pattern table and manifest are written to
    pub output_directory: PathBuf,

    /// Write a build manifest next to the pattern table
    pub write_manifest: bool,

    /// Render a preview sheet of the encoded bank
    pub write_preview: bool,
}

/// Write queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Number of pending writes the queue can hold
    pub capacity: usize,

    /// Cycle budget per flush (usually one NTSC vblank)
    pub budget_cycles: u32,

    /// Keep unflushed palette writes for the next blank
    ///
    /// Off by default: a stale palette write is worse than a missing one.
    pub carry_palette_writes: bool,
}

/// Source palette configuration
///
/// Maps the four RGB colors a source image may use onto 2bpp pixel
/// values 0-3, in index order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// RGB triplets for pixel values 0, 1, 2 and 3
    pub colors: [[u8; 3]; 4],
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            build: BuildConfig {
                source_directory: PathBuf::from("assets"),
                output_directory: PathBuf::from("build"),
                write_manifest: true,
                write_preview: true,
            },
            queue: QueueConfig {
                capacity: DEFAULT_CAPACITY,
                budget_cycles: NTSC_VBLANK_CPU_CYCLES,
                carry_palette_writes: false,
            },
            palette: PaletteConfig {
                colors: [
                    [0x00, 0x00, 0x00],
                    [0x55, 0x55, 0x55],
                    [0xAA, 0xAA, 0xAA],
                    [0xFF, 0xFF, 0xFF],
                ],
            },
        }
    }
}

impl ProjectConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default
    /// configuration and saves it to the file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nes_gfx::project::ProjectConfig;
    ///
    /// let config = ProjectConfig::load_or_default("project.toml");
    /// ```
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(&path).unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            let _ = config.save(&path);
            config
        })
    }

    /// Load configuration from file
    ///
    /// # Returns
    ///
    /// Result containing the configuration or an error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    ///
    /// # Returns
    ///
    /// Result indicating success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}

impl QueueConfig {
    /// Build a write queue matching this configuration
    ///
    /// # Returns
    ///
    /// A queue with the configured capacity and carryover policy
    pub fn build_queue(&self) -> WriteQueue {
        let mut queue = WriteQueue::new(self.capacity);
        if self.carry_palette_writes {
            queue
                .scheduler_mut()
                .set_policy(WriteKind::Palette, CarryoverPolicy::Carry);
        }
        queue
    }
}

impl PaletteConfig {
    /// Look up the 2bpp pixel value for an RGB color
    ///
    /// # Arguments
    ///
    /// * `rgb` - The color to look up
    ///
    /// # Returns
    ///
    /// The pixel value (0-3), or None if the color is not in the palette
    pub fn value_for(&self, rgb: [u8; 3]) -> Option<u8> {
        self.colors
            .iter()
            .position(|&color| color == rgb)
            .map(|index| index as u8)
    }

    /// Get the RGB color for a 2bpp pixel value
    ///
    /// # Arguments
    ///
    /// * `value` - Pixel value (0-3)
    pub fn color(&self, value: u8) -> [u8; 3] {
        assert!(value <= 3, "Pixel value {} exceeds 2bpp range", value);
        self.colors[value as usize]
    }
}
