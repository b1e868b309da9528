// Build manifest
//
// Records what a build produced: which source images were encoded and
// where their tiles landed in the pattern bank.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::chr::constants::TILE_BYTES;

/// Errors that can occur during manifest operations
#[derive(Debug)]
pub enum ManifestError {
    /// I/O error
    Io(io::Error),

    /// Serialization/deserialization error
    Serialization(serde_json::Error),

    /// Manifest version mismatch
    VersionMismatch { expected: u32, found: u32 },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Io(e) => write!(f, "I/O error: {}", e),
            ManifestError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ManifestError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<io::Error> for ManifestError {
    fn from(e: io::Error) -> Self {
        ManifestError::Io(e)
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Serialization(e)
    }
}

/// Current manifest format version
const MANIFEST_VERSION: u32 = 1;

/// Record of a completed build
///
/// Lists every encoded source image together with the bank indices its
/// tiles were assigned, so later builds and tooling can locate them.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Version number for compatibility checking
    version: u32,

    /// Timestamp when the build ran
    timestamp: String,

    /// One entry per encoded source image
    entries: Vec<ManifestEntry>,

    /// Total number of tiles in the bank
    tile_count: usize,

    /// Size of the exported pattern table in bytes
    bank_bytes: usize,
}

/// A single source image in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Source image path, as given to the importer
    pub source: String,

    /// Bank indices assigned to the image's tiles, in reading order
    pub tiles: Vec<u8>,
}

impl BuildManifest {
    /// Create an empty manifest stamped with the current time
    pub fn new() -> Self {
        BuildManifest {
            version: MANIFEST_VERSION,
            timestamp: chrono::Local::now().to_rfc3339(),
            entries: Vec::new(),
            tile_count: 0,
            bank_bytes: 0,
        }
    }

    /// Record an encoded source image
    ///
    /// # Arguments
    ///
    /// * `source` - Path of the source image
    /// * `tiles` - Bank indices its tiles were assigned
    pub fn record<S: Into<String>>(&mut self, source: S, tiles: Vec<u8>) {
        self.tile_count += tiles.len();
        self.bank_bytes = self.tile_count * TILE_BYTES;
        self.entries.push(ManifestEntry {
            source: source.into(),
            tiles,
        });
    }

    /// Get the recorded entries
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Get the total number of tiles in the bank
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Get the size of the exported pattern table in bytes
    pub fn bank_bytes(&self) -> usize {
        self.bank_bytes
    }

    /// Get the build timestamp
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Save this manifest to a file
    ///
    /// # Returns
    ///
    /// Result indicating success or error
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Load a manifest from a file
    ///
    /// # Returns
    ///
    /// Result containing the manifest or an error
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let json = fs::read_to_string(path)?;
        let manifest: BuildManifest = serde_json::from_str(&json)?;

        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::VersionMismatch {
                expected: MANIFEST_VERSION,
                found: manifest.version,
            });
        }

        Ok(manifest)
    }
}

impl Default for BuildManifest {
    fn default() -> Self {
        Self::new()
    }
}
