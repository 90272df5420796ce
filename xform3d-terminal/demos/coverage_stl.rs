//! Example: Run the coverage checks over the vertices of an STL file
//!
//! Usage: cargo run --example coverage_stl -- path/to/file.stl

use std::env;
use std::io::stdout;
use xform3d_terminal::CoverageConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut config = CoverageConfig::load_or_default();
    match args.get(1) {
        Some(path) => {
            println!("Loading STL file: {}", path);
            config.geometry.stl = Some(path.into());
        }
        None => {
            eprintln!("Usage: {} <stl-file>", args[0]);
            eprintln!("\nNo STL file provided, using the plane box...");
        }
    }

    let report = xform3d_terminal::run(&config, &mut stdout())?;
    println!(
        "{} of {} transforms round-tripped",
        report.panels.iter().filter(|p| p.passed).count(),
        report.panels.len()
    );
    Ok(())
}
