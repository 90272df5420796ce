//! Coverage runner for the xform3d transform engine
//!
//! Builds the cancelling transform chains, pushes a point set through every
//! transform and its inverse, and reports the numeric deviations.

pub mod config;
pub mod report;
pub mod scene;

pub use config::CoverageConfig;
pub use report::Report;
pub use scene::CoverageScene;

use std::path::Path;
use xform3d_core::{stl, PointSet};

/// Load the sample points: the vertices of `stl_path` when given, otherwise
/// the offset plane box
pub fn load_points(config: &CoverageConfig) -> anyhow::Result<PointSet> {
    match config.geometry.stl.as_deref() {
        Some(path) => load_stl(path),
        None => Ok(PointSet::coverage_box(
            config.geometry.offset,
            config.geometry.resolution,
        )),
    }
}

fn load_stl(path: &Path) -> anyhow::Result<PointSet> {
    use anyhow::Context;

    let data = std::fs::read(path).with_context(|| format!("failed to read STL file {}", path.display()))?;
    let points = stl::parse_stl(&data).with_context(|| format!("failed to parse STL file {}", path.display()))?;
    log::info!("loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Build the scene, run it over the configured points and render the report
pub fn run<W: std::io::Write>(config: &CoverageConfig, writer: &mut W) -> anyhow::Result<Report> {
    let points = load_points(config)?;
    let scene = CoverageScene::build()?;
    let report = Report::run(&scene, &points, config.tolerance)?;
    report.render(writer, config.report.color)?;
    Ok(report)
}
