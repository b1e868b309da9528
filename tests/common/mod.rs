// Common test utilities for pipeline integration tests
//
// This module provides shared fixtures for building pixel tables and
// PNG sources used across the encoder, queue and pipeline test suites.

#![allow(dead_code)]

use nes_gfx::chr::PixelTable;
use nes_gfx::project::PaletteConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Build an 8x8 block filled with one color index
pub fn solid_block(value: u8) -> PixelTable {
    PixelTable::from_pixels(8, 8, &[value; 64]).expect("valid solid block")
}

/// Build a pixel table whose pixel (x, y) is `(x + y) % 4`
pub fn gradient_table(width: usize, height: usize) -> PixelTable {
    let mut table = PixelTable::new(width, height).expect("valid dimensions");
    for y in 0..height {
        for x in 0..width {
            table.set(x, y, ((x + y) % 4) as u8).expect("valid value");
        }
    }
    table
}

/// Encode 2bpp pixel values as an in-memory RGB PNG through a palette
pub fn encode_source_png(
    width: usize,
    height: usize,
    values: &[u8],
    palette: &PaletteConfig,
) -> Vec<u8> {
    assert_eq!(values.len(), width * height, "wrong number of pixel values");

    let mut rgb = Vec::with_capacity(values.len() * 3);
    for &value in values {
        rgb.extend_from_slice(&palette.color(value));
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width as u32, height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(&rgb).expect("PNG data");
    }
    out
}

/// A scratch directory under the system temp dir, emptied on creation
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create (or recreate) a named scratch directory
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("create scratch directory");
        ScratchDir { path }
    }

    /// The directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path inside the directory
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
