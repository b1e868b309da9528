// NES Graphics Pipeline - Sheet Encoder
//
// This example demonstrates encoding a single PNG sheet into a pattern
// table without a project configuration file.

use nes_gfx::chr::TileBank;
use nes_gfx::project::{import_image, ProjectConfig};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("NES Graphics Pipeline (nes-gfx) v0.1.0");
    println!("======================================");
    println!();

    // Get sheet path from command line
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <png_path>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} hero.png", args[0]);
        eprintln!("  {} \"assets/font.png\"", args[0]);
        std::process::exit(1);
    }

    let png_path = &args[1];
    let config = ProjectConfig::default();

    // Import the sheet through the default grayscale palette
    println!("Importing sheet: {}", png_path);
    let table = match import_image(png_path, &config.palette) {
        Ok(table) => {
            println!(
                "✓ {}x{} pixels, {} tiles",
                table.width(),
                table.height(),
                table.tile_count()
            );
            table
        }
        Err(e) => {
            eprintln!("✗ Failed to import sheet: {}", e);
            std::process::exit(1);
        }
    };

    // Encode every block into a fresh bank
    let mut bank = TileBank::new();
    let indices = bank.register_table(&table)?;
    if let (Some(first), Some(last)) = (indices.first(), indices.last()) {
        println!("Registered bank indices {} through {}", first, last);
    }
    println!();

    fs::write("bank.chr", bank.export())?;
    println!("Pattern table written to: bank.chr");

    Ok(())
}
