// Source image import
//
// Decodes PNG source art and maps its colors onto 2bpp pixel values
// through the project palette.

use std::fs;
use std::io;
use std::path::Path;

use crate::chr::{ChrError, PixelTable};

use super::config::PaletteConfig;

/// Errors that can occur while importing a source image
#[derive(Debug)]
pub enum ImportError {
    /// I/O error
    Io(io::Error),

    /// PNG decoding error
    PngDecoding(png::DecodingError),

    /// Source image is not 8-bit RGB or RGBA
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    /// Source image uses a color outside the project palette
    UnmappedColor { r: u8, g: u8, b: u8 },

    /// The mapped pixels do not form a valid pixel table
    Chr(ChrError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "I/O error: {}", e),
            ImportError::PngDecoding(e) => write!(f, "PNG decoding error: {}", e),
            ImportError::UnsupportedFormat {
                color_type,
                bit_depth,
            } => {
                write!(
                    f,
                    "Unsupported PNG format: {:?} {:?} (expected 8-bit RGB or RGBA)",
                    color_type, bit_depth
                )
            }
            ImportError::UnmappedColor { r, g, b } => {
                write!(f, "Color #{:02X}{:02X}{:02X} is not in the project palette", r, g, b)
            }
            ImportError::Chr(e) => write!(f, "Encoding error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<io::Error> for ImportError {
    fn from(e: io::Error) -> Self {
        ImportError::Io(e)
    }
}

impl From<png::DecodingError> for ImportError {
    fn from(e: png::DecodingError) -> Self {
        ImportError::PngDecoding(e)
    }
}

impl From<ChrError> for ImportError {
    fn from(e: ChrError) -> Self {
        ImportError::Chr(e)
    }
}

/// Import a PNG source image as a pixel table
///
/// The image must be 8-bit RGB or RGBA (alpha is ignored), use only the
/// four colors of the project palette, and have dimensions that are
/// multiples of 8.
///
/// # Arguments
///
/// * `path` - Path to the PNG file
/// * `palette` - Palette mapping source colors to pixel values
///
/// # Returns
///
/// Result containing the pixel table or an error
///
/// # Example
///
/// ```no_run
/// use nes_gfx::project::{import_image, ProjectConfig};
///
/// let config = ProjectConfig::default();
/// let table = import_image("assets/hero.png", &config.palette).expect("Failed to import");
/// println!("{} tiles", table.tile_count());
/// ```
pub fn import_image<P: AsRef<Path>>(
    path: P,
    palette: &PaletteConfig,
) -> Result<PixelTable, ImportError> {
    let file = fs::File::open(path)?;
    import_reader(io::BufReader::new(file), palette)
}

/// Import a PNG source image from any buffered, seekable reader
///
/// Same contract as [`import_image`], reading the PNG stream from
/// `reader` instead of a file. The decoder requires `Seek` in addition
/// to `BufRead`; in-memory sources can wrap their bytes in
/// [`std::io::Cursor`].
pub fn import_reader<R: io::BufRead + io::Seek>(
    reader: R,
    palette: &PaletteConfig,
) -> Result<PixelTable, ImportError> {
    let decoder = png::Decoder::new(reader);
    let mut png_reader = decoder.read_info()?;

    let info = png_reader.info();
    let width = info.width as usize;
    let height = info.height as usize;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let stride = match (color_type, bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
        (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
        _ => {
            return Err(ImportError::UnsupportedFormat {
                color_type,
                bit_depth,
            })
        }
    };

    let mut buf = vec![0u8; width * height * stride];
    png_reader.next_frame(&mut buf)?;

    // Map each source pixel onto its 2bpp value; alpha bytes are skipped
    let mut values = Vec::with_capacity(width * height);
    for pixel in buf.chunks_exact(stride) {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        match palette.value_for([r, g, b]) {
            Some(value) => values.push(value),
            None => return Err(ImportError::UnmappedColor { r, g, b }),
        }
    }

    Ok(PixelTable::from_pixels(width, height, &values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectConfig;
    use std::io::Cursor;

    /// Encode an RGB pixel grid as an in-memory PNG
    fn encode_png(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(rgb).unwrap();
        }
        out
    }

    #[test]
    fn test_import_maps_palette_colors() {
        let palette = ProjectConfig::default().palette;

        // 8x8 image: first pixel white, rest black
        let mut rgb = vec![0u8; 8 * 8 * 3];
        rgb[0] = 0xFF;
        rgb[1] = 0xFF;
        rgb[2] = 0xFF;
        let png_data = encode_png(8, 8, &rgb);

        let table = import_reader(Cursor::new(&png_data[..]), &palette).unwrap();
        assert_eq!(table.width(), 8);
        assert_eq!(table.height(), 8);
        assert_eq!(table.get(0, 0), 3);
        assert_eq!(table.get(1, 0), 0);
        assert_eq!(table.get(7, 7), 0);
    }

    #[test]
    fn test_import_image_reads_from_file() {
        let palette = ProjectConfig::default().palette;

        // Second pixel is gray 0xAA, palette value 2
        let mut rgb = vec![0u8; 8 * 8 * 3];
        rgb[3] = 0xAA;
        rgb[4] = 0xAA;
        rgb[5] = 0xAA;
        let png_data = encode_png(8, 8, &rgb);

        let path = std::env::temp_dir().join("nes_gfx_import_source.png");
        fs::write(&path, &png_data).unwrap();

        let table = import_image(&path, &palette).unwrap();
        assert_eq!(table.get(0, 0), 0);
        assert_eq!(table.get(1, 0), 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_import_rejects_unmapped_color() {
        let palette = ProjectConfig::default().palette;

        let mut rgb = vec![0u8; 8 * 8 * 3];
        rgb[3] = 0x12;
        rgb[4] = 0x34;
        rgb[5] = 0x56;
        let png_data = encode_png(8, 8, &rgb);

        let result = import_reader(Cursor::new(&png_data[..]), &palette);
        assert!(matches!(
            result,
            Err(ImportError::UnmappedColor {
                r: 0x12,
                g: 0x34,
                b: 0x56
            })
        ));
    }

    #[test]
    fn test_import_rejects_bad_dimensions() {
        let palette = ProjectConfig::default().palette;

        let rgb = vec![0u8; 7 * 8 * 3];
        let png_data = encode_png(7, 8, &rgb);

        let result = import_reader(Cursor::new(&png_data[..]), &palette);
        assert!(matches!(
            result,
            Err(ImportError::Chr(ChrError::InvalidDimensions {
                width: 7,
                height: 8
            }))
        ));
    }

    #[test]
    fn test_import_rejects_truncated_png() {
        let palette = ProjectConfig::default().palette;
        let result = import_reader(Cursor::new(&b"not a png"[..]), &palette);

        assert!(matches!(result, Err(ImportError::PngDecoding(_))));
    }

    #[test]
    fn test_import_rgba_ignores_alpha() {
        let palette = ProjectConfig::default().palette;

        // 8x8 RGBA image, all gray value 1 with varying alpha
        let mut rgba = Vec::with_capacity(8 * 8 * 4);
        for i in 0..64 {
            rgba.extend_from_slice(&[0x55, 0x55, 0x55, (i * 4) as u8]);
        }

        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, 8, 8);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&rgba).unwrap();
        }

        let table = import_reader(Cursor::new(&png_data[..]), &palette).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(table.get(x, y), 1);
            }
        }
    }

    #[test]
    fn test_import_error_display() {
        let err = ImportError::UnmappedColor {
            r: 0xAB,
            g: 0xCD,
            b: 0xEF,
        };
        assert_eq!(
            err.to_string(),
            "Color #ABCDEF is not in the project palette"
        );
    }
}
