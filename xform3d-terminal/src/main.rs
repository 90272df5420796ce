//! xform3d coverage run
//!
//! Pushes sample points through chains of transforms that cancel out and
//! checks that every transform and its inverse round-trip within tolerance.
//! Exits with status 1 if any check fails.

use anyhow::Context;
use clap::Parser;
use std::io::stdout;
use std::path::PathBuf;
use xform3d_terminal::CoverageConfig;

#[derive(Parser, Debug)]
#[command(name = "xform3d-coverage", about = "Round-trip coverage checks for xform3d transforms")]
struct Args {
    /// Configuration file (defaults to ./xform3d.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the vertices of this STL file as sample points
    #[arg(long)]
    stl: Option<PathBuf>,

    /// Largest accepted deviation
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Grid subdivisions along each plane edge
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CoverageConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CoverageConfig::load_or_default(),
    };
    config.merge_with_env();

    if let Some(stl) = args.stl {
        config.geometry.stl = Some(stl);
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(resolution) = args.resolution {
        config.geometry.resolution = resolution;
    }
    if args.no_color {
        config.report.color = false;
    }
    log::debug!("configuration: {:?}", config);

    let report = xform3d_terminal::run(&config, &mut stdout())?;
    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
