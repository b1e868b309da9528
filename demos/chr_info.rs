// Simple tool to display pattern table information
use nes_gfx::chr::constants::{BANK_CAPACITY, TILE_BYTES};
use nes_gfx::chr::Tile;
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <chr_path>", args[0]);
        std::process::exit(1);
    }

    let chr_path = &args[1];
    println!("Loading pattern table: {}", chr_path);
    println!();

    let bytes = fs::read(chr_path)?;
    if !bytes.len().is_multiple_of(TILE_BYTES) {
        eprintln!(
            "File size {} is not a multiple of the {}-byte tile size",
            bytes.len(),
            TILE_BYTES
        );
        std::process::exit(1);
    }

    let tile_count = bytes.len() / TILE_BYTES;
    let mut blank_tiles = 0;
    let mut color_counts = [0usize; 4];

    for chunk in bytes.chunks_exact(TILE_BYTES) {
        if chunk.iter().all(|&b| b == 0) {
            blank_tiles += 1;
        }

        let mut raw = [0u8; TILE_BYTES];
        raw.copy_from_slice(chunk);
        let tile = Tile::from_bytes(raw);
        for y in 0..8 {
            for x in 0..8 {
                color_counts[tile.pixel(x, y) as usize] += 1;
            }
        }
    }

    println!("Pattern Table Information:");
    println!("==========================");
    println!("File Size:      {} bytes", bytes.len());
    println!("Tiles:          {} of {}", tile_count, BANK_CAPACITY);
    println!("Free Slots:     {}", BANK_CAPACITY.saturating_sub(tile_count));
    println!("Blank Tiles:    {}", blank_tiles);
    for (value, count) in color_counts.iter().enumerate() {
        println!("Color {} Pixels: {}", value, count);
    }

    Ok(())
}
