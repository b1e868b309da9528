// Bank preview rendering
//
// Renders an encoded tile bank back into RGB and saves it as a PNG
// sheet, so a build can be checked by eye.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::chr::constants::TILE_SIZE;
use crate::chr::TileBank;

use super::config::PaletteConfig;

/// Tiles per row in a rendered preview sheet
const SHEET_TILES_PER_ROW: usize = 16;

/// Errors that can occur during preview rendering
#[derive(Debug)]
pub enum PreviewError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),
}

impl std::fmt::Display for PreviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewError::Io(e) => write!(f, "I/O error: {}", e),
            PreviewError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
        }
    }
}

impl std::error::Error for PreviewError {}

impl From<io::Error> for PreviewError {
    fn from(e: io::Error) -> Self {
        PreviewError::Io(e)
    }
}

impl From<png::EncodingError> for PreviewError {
    fn from(e: png::EncodingError) -> Self {
        PreviewError::PngEncoding(e)
    }
}

/// Save a preview sheet of the bank's tiles
///
/// Decodes every registered tile through the reference unpacker, maps
/// pixel values back to RGB through the palette, and writes the result
/// as a PNG with 16 tiles per row.
///
/// # Arguments
///
/// * `bank` - The bank to render
/// * `palette` - Palette mapping pixel values back to RGB
/// * `directory` - Directory the sheet is written to
///
/// # Returns
///
/// Result containing the path to the saved sheet or an error
///
/// # Example
///
/// ```no_run
/// use nes_gfx::chr::TileBank;
/// use nes_gfx::project::{save_preview, ProjectConfig};
///
/// let bank = TileBank::new();
/// let config = ProjectConfig::default();
/// let path = save_preview(&bank, &config.palette, "build").expect("Failed to save preview");
/// println!("Preview saved to: {}", path.display());
/// ```
pub fn save_preview<P: AsRef<Path>>(
    bank: &TileBank,
    palette: &PaletteConfig,
    directory: P,
) -> Result<PathBuf, PreviewError> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;

    // Generate filename with timestamp
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("bank_{}.png", timestamp);
    let file_path = directory.join(filename);

    let (rgb_data, width, height) = render_sheet(bank, palette);
    save_png(&file_path, &rgb_data, width, height)?;

    Ok(file_path)
}

/// Render the bank as an RGB tile sheet
///
/// # Returns
///
/// The RGB data together with the sheet's width and height in pixels
fn render_sheet(bank: &TileBank, palette: &PaletteConfig) -> (Vec<u8>, u32, u32) {
    // An empty bank still renders one blank row
    let rows = bank.len().div_ceil(SHEET_TILES_PER_ROW).max(1);
    let width = SHEET_TILES_PER_ROW * TILE_SIZE;
    let height = rows * TILE_SIZE;

    let background = palette.color(0);
    let mut rgb_data = background.repeat(width * height);

    for (index, tile) in bank.tiles().iter().enumerate() {
        let sheet_x = (index % SHEET_TILES_PER_ROW) * TILE_SIZE;
        let sheet_y = (index / SHEET_TILES_PER_ROW) * TILE_SIZE;

        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let color = palette.color(tile.pixel(x, y));
                let offset = ((sheet_y + y) * width + sheet_x + x) * 3;
                rgb_data[offset..offset + 3].copy_from_slice(&color);
            }
        }
    }

    (rgb_data, width as u32, height as u32)
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), PreviewError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chr::{encode_tile, PixelTable};
    use crate::project::ProjectConfig;

    #[test]
    fn test_render_sheet_dimensions() {
        let palette = ProjectConfig::default().palette;

        let mut bank = TileBank::new();
        let block = PixelTable::new(8, 8).unwrap();
        for _ in 0..17 {
            bank.register(&block).unwrap();
        }

        // 17 tiles need a second row
        let (rgb, width, height) = render_sheet(&bank, &palette);
        assert_eq!(width, 128);
        assert_eq!(height, 16);
        assert_eq!(rgb.len(), 128 * 16 * 3);
    }

    #[test]
    fn test_render_sheet_empty_bank() {
        let palette = ProjectConfig::default().palette;
        let bank = TileBank::new();

        let (rgb, width, height) = render_sheet(&bank, &palette);
        assert_eq!(width, 128);
        assert_eq!(height, 8);

        // All background
        let background = palette.color(0);
        assert!(rgb.chunks_exact(3).all(|c| c == background));
    }

    #[test]
    fn test_render_sheet_places_pixels() {
        let palette = ProjectConfig::default().palette;

        let mut block = PixelTable::new(8, 8).unwrap();
        block.set(0, 0, 3).unwrap();
        let tile = encode_tile(&block).unwrap();

        let mut bank = TileBank::new();
        bank.register_tile(tile).unwrap();
        bank.register_tile(tile).unwrap();

        let (rgb, width, _) = render_sheet(&bank, &palette);
        let white = palette.color(3);

        // Tile 0's marked pixel lands at sheet (0, 0), tile 1's at (8, 0)
        assert_eq!(&rgb[0..3], white);
        let offset = 8 * 3;
        assert_eq!(&rgb[offset..offset + 3], white);

        // The pixel next to each mark is background
        let background = palette.color(0);
        assert_eq!(&rgb[3..6], background);
        assert_eq!(width, 128);
    }
}
