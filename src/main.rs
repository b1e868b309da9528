// NES Graphics Pipeline - Main Entry Point
//
// Runs a full build from the project configuration, then simulates one
// vblank of deferred VRAM uploads against the configured cycle budget.

use std::env;

use nes_gfx::project::Project;
use nes_gfx::vram::WriteRequest;
use nes_gfx::Vram;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("NES Graphics Pipeline (nes-gfx) v0.1.0");
    println!("======================================");
    println!();

    // Load or create the project configuration
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "project.toml".to_string());
    let mut project = Project::open(&config_path);
    println!("Project configuration loaded from '{}'", config_path);
    println!();

    println!("Build");
    println!("-----");
    let artifacts = project.build()?;
    println!("Encoded {} tiles", artifacts.tile_count);
    println!(
        "Pattern table written to: {}",
        artifacts.pattern_table.display()
    );
    if let Some(path) = &artifacts.manifest {
        println!("Manifest written to: {}", path.display());
    }
    if let Some(path) = &artifacts.preview {
        println!("Preview written to: {}", path.display());
    }
    println!();

    println!("Upload Simulation");
    println!("-----------------");

    // Load the freshly built bank into pattern table 0
    let mut vram = Vram::new();
    vram.load_bank(project.bank(), 0);

    // Queue one frame of work: a row of tile indices, its attribute
    // byte and one palette entry
    let mut queue = project.config().queue.build_queue();
    let tile_count = project.bank().len().max(1);
    let row: Vec<u8> = (0..32).map(|i| (i % tile_count) as u8).collect();

    queue.enqueue(WriteRequest::nametable(0x2000, row))?;
    queue.enqueue(WriteRequest::attribute(0x23C0, 0x00))?;
    queue.enqueue(WriteRequest::palette(0x3F01, 0x21))?;

    let budget = project.config().queue.budget_cycles;
    let applied = queue.flush(&mut vram, budget);
    let stats = queue.stats();

    println!(
        "Applied {} of {} requests within {} cycles",
        applied, stats.enqueued, budget
    );
    println!("Pending for the next blank: {}", queue.len());

    Ok(())
}
