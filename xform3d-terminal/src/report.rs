//! Numeric results of a coverage run and their terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point3;
use std::io::Write;
use xform3d_core::{transform_point_set, PointSet, Result, TransformFilter};

use crate::scene::CoverageScene;

/// Outcome for one transform applied to the sample points.
#[derive(Debug, Clone)]
pub struct PanelResult {
    pub name: &'static str,
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
    /// Largest distance between a point and its image mapped back through
    /// the panel's inverse.
    pub round_trip: f64,
    pub passed: bool,
}

/// Outcome for a pair of transforms expected to agree.
#[derive(Debug, Clone)]
pub struct EquivalenceResult {
    pub name: &'static str,
    pub deviation: f64,
    pub passed: bool,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub tolerance: f64,
    pub point_count: usize,
    pub panels: Vec<PanelResult>,
    pub equivalences: Vec<EquivalenceResult>,
}

fn deviation(a: &PointSet, b: &PointSet) -> f64 {
    a.max_deviation(b).unwrap_or(f64::INFINITY)
}

impl Report {
    pub fn run(scene: &CoverageScene, points: &PointSet, tolerance: f64) -> Result<Self> {
        let mut panels = Vec::new();
        for panel in scene.panels() {
            let forward = TransformFilter::with_transform(&panel.transform).execute(points)?;
            let back = TransformFilter::with_transform(panel.transform.inverse()).execute(&forward)?;
            let round_trip = deviation(&back, points);
            log::debug!("{}: round trip {:e}", panel.name, round_trip);

            panels.push(PanelResult {
                name: panel.name,
                bounds: forward.bounds(),
                round_trip,
                passed: round_trip <= tolerance,
            });
        }

        let mut equivalences = Vec::new();
        for (name, a, b) in scene.equivalences() {
            let deviation = deviation(&transform_point_set(&a, points)?, &transform_point_set(&b, points)?);
            equivalences.push(EquivalenceResult {
                name,
                deviation,
                passed: deviation <= tolerance,
            });
        }

        Ok(Self {
            tolerance,
            point_count: points.len(),
            panels,
            equivalences,
        })
    }

    pub fn passed(&self) -> bool {
        self.panels.iter().all(|p| p.passed) && self.equivalences.iter().all(|e| e.passed)
    }

    /// Write the report as a plain-text table, optionally coloured.
    pub fn render<W: Write>(&self, writer: &mut W, color: bool) -> std::io::Result<()> {
        writer.queue(Print(format!(
            "{} points, tolerance {:e}\n\n",
            self.point_count, self.tolerance
        )))?;

        writer.queue(Print(format!(
            "{:<22} {:>12}  {}\n",
            "transform", "round trip", "bounds"
        )))?;
        for panel in &self.panels {
            let bounds = match panel.bounds {
                Some((min, max)) => format!(
                    "[{:.3}, {:.3}] x [{:.3}, {:.3}] x [{:.3}, {:.3}]",
                    min.x, max.x, min.y, max.y, min.z, max.z
                ),
                None => "empty".to_string(),
            };
            status(writer, panel.passed, color)?;
            writer.queue(Print(format!(
                " {:<22} {:>12.3e}  {}\n",
                panel.name, panel.round_trip, bounds
            )))?;
        }

        writer.queue(Print("\n"))?;
        for check in &self.equivalences {
            status(writer, check.passed, color)?;
            writer.queue(Print(format!(" {:<40} {:>12.3e}\n", check.name, check.deviation)))?;
        }

        writer.queue(Print("\n"))?;
        status(writer, self.passed(), color)?;
        writer.queue(Print(" overall\n"))?;
        writer.flush()
    }
}

fn status<W: Write>(writer: &mut W, passed: bool, color: bool) -> std::io::Result<()> {
    let (label, tint) = if passed {
        ("PASS", Color::Green)
    } else {
        ("FAIL", Color::Red)
    };
    if color {
        writer.queue(SetForegroundColor(tint))?;
        writer.queue(Print(label))?;
        writer.queue(ResetColor)?;
    } else {
        writer.queue(Print(label))?;
    }
    Ok(())
}
