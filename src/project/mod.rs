// Project module - Build pipeline coordinator
//
// This module ties the pipeline together: it loads project settings, imports
// source images through the palette, registers their tiles into a pattern
// bank, and writes the build outputs (pattern table, manifest and preview
// sheet).

mod config;
mod import;
mod manifest;
mod preview;

pub use config::{BuildConfig, PaletteConfig, ProjectConfig, QueueConfig};
pub use import::{import_image, import_reader, ImportError};
pub use manifest::{BuildManifest, ManifestEntry, ManifestError};
pub use preview::{save_preview, PreviewError};

use crate::chr::{ChrError, PixelTable, TileBank};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the exported pattern table file
const PATTERN_TABLE_FILE: &str = "bank.chr";

/// Name of the build manifest file
const MANIFEST_FILE: &str = "manifest.json";

/// Paths and totals produced by a build
#[derive(Debug)]
pub struct BuildArtifacts {
    /// Path of the exported pattern table
    pub pattern_table: PathBuf,

    /// Path of the manifest, when one was written
    pub manifest: Option<PathBuf>,

    /// Path of the preview sheet, when one was rendered
    pub preview: Option<PathBuf>,

    /// Number of tiles in the bank after the build
    pub tile_count: usize,
}

/// Graphics build project
///
/// Coordinates the pipeline from source images to an exported pattern
/// table, keeping the bank and the build manifest in step with each
/// other.
pub struct Project {
    /// Project settings
    config: ProjectConfig,

    /// Pattern bank the build fills
    bank: TileBank,

    /// Record of what has been imported
    manifest: BuildManifest,
}

impl Project {
    /// Create a project with the given configuration
    pub fn new(config: ProjectConfig) -> Self {
        Project {
            config,
            bank: TileBank::new(),
            manifest: BuildManifest::new(),
        }
    }

    /// Open a project from a configuration file
    ///
    /// Missing or unreadable configuration falls back to the defaults,
    /// which are then written to the file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nes_gfx::project::Project;
    ///
    /// let project = Project::open("project.toml");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(ProjectConfig::load_or_default(path))
    }

    /// The project configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The pattern bank in its current state
    pub fn bank(&self) -> &TileBank {
        &self.bank
    }

    /// The build manifest in its current state
    pub fn manifest(&self) -> &BuildManifest {
        &self.manifest
    }

    /// Import a source image file into the bank
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the PNG file
    ///
    /// # Returns
    ///
    /// The bank indices assigned to the image's tiles, in reading order
    pub fn import<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let table = import_image(path, &self.config.palette)?;
        let indices = self.import_table(path.display().to_string(), &table)?;

        Ok(indices)
    }

    /// Register an already-imported pixel table into the bank
    ///
    /// The manifest records the registration under `name`. Registration
    /// is atomic: if the table does not fit in the bank, neither the
    /// bank nor the manifest changes.
    ///
    /// # Arguments
    ///
    /// * `name` - Source name recorded in the manifest
    /// * `table` - The pixel table to register
    ///
    /// # Returns
    ///
    /// The bank indices assigned to the table's tiles, in reading order
    pub fn import_table<S: Into<String>>(
        &mut self,
        name: S,
        table: &PixelTable,
    ) -> Result<Vec<u8>, ChrError> {
        let indices = self.bank.register_table(table)?;
        self.manifest.record(name, indices.clone());

        Ok(indices)
    }

    /// Run a full build
    ///
    /// Imports every PNG in the source directory in name order, then
    /// writes the pattern table and the configured extras to the output
    /// directory.
    ///
    /// # Returns
    ///
    /// Result containing the build artifacts or an error
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nes_gfx::project::Project;
    ///
    /// let mut project = Project::open("project.toml");
    /// let artifacts = project.build().expect("Build failed");
    /// println!("{} tiles encoded", artifacts.tile_count);
    /// ```
    pub fn build(&mut self) -> Result<BuildArtifacts, Box<dyn std::error::Error>> {
        for path in source_images(&self.config.build.source_directory)? {
            self.import(path)?;
        }

        let output_dir = self.config.build.output_directory.clone();
        fs::create_dir_all(&output_dir)?;

        let pattern_table = output_dir.join(PATTERN_TABLE_FILE);
        fs::write(&pattern_table, self.bank.export())?;

        let manifest = if self.config.build.write_manifest {
            let path = output_dir.join(MANIFEST_FILE);
            self.manifest.save_to_file(&path)?;
            Some(path)
        } else {
            None
        };

        let preview = if self.config.build.write_preview {
            Some(save_preview(&self.bank, &self.config.palette, &output_dir)?)
        } else {
            None
        };

        Ok(BuildArtifacts {
            pattern_table,
            manifest,
            preview,
            tile_count: self.bank.len(),
        })
    }
}

/// List the PNG files in a directory, sorted by name
///
/// Sorted input keeps tile index assignment stable across builds.
fn source_images(directory: &Path) -> Result<Vec<PathBuf>, io::Error> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_table() -> PixelTable {
        let mut table = PixelTable::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                table.set(x, y, ((x + y) % 4) as u8).unwrap();
            }
        }
        table
    }

    #[test]
    fn test_import_table_records_manifest() {
        let mut project = Project::new(ProjectConfig::default());

        let indices = project.import_table("hero", &checker_table()).unwrap();
        assert_eq!(indices, vec![0]);
        assert_eq!(project.bank().len(), 1);
        assert_eq!(project.manifest().tile_count(), 1);
        assert_eq!(project.manifest().entries()[0].source, "hero");
    }

    #[test]
    fn test_import_table_is_atomic_on_overflow() {
        let mut project = Project::new(ProjectConfig::default());

        // Fill the bank completely
        let full = PixelTable::new(128, 128).unwrap();
        project.import_table("fill", &full).unwrap();
        assert_eq!(project.bank().remaining(), 0);

        let result = project.import_table("extra", &checker_table());
        assert!(matches!(result, Err(ChrError::BankFull)));
        assert_eq!(project.manifest().entries().len(), 1);
        assert_eq!(project.manifest().tile_count(), 256);
    }

    #[test]
    fn test_source_images_sorted_and_filtered() {
        let dir = std::env::temp_dir().join("nes_gfx_source_scan");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        fs::write(dir.join("b.png"), b"stub").unwrap();
        fs::write(dir.join("a.png"), b"stub").unwrap();
        fs::write(dir.join("notes.txt"), b"stub").unwrap();

        let paths = source_images(&dir).unwrap();
        let names: Vec<_> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_source_images_missing_directory_errors() {
        let dir = std::env::temp_dir().join("nes_gfx_no_such_directory");
        assert!(source_images(&dir).is_err());
    }
}
