//! Evaluated form of a transform: homogeneous stages applied in order

use nalgebra::{Matrix4, Point3};

use crate::error::Result;
use crate::matrix;

/// Ordered list of 4x4 stages. A point is multiplied through each stage and
/// divided by its homogeneous coordinate before the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Pipeline {
    stages: Vec<Matrix4<f64>>,
}

impl Pipeline {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn single(m: Matrix4<f64>) -> Self {
        Self { stages: vec![m] }
    }

    /// Append `other` so that it runs after the stages already present.
    pub fn then(&mut self, other: Pipeline) {
        self.stages.extend(other.stages);
    }

    /// Reverse the stages and invert each of them.
    pub fn inverse(&self) -> Result<Pipeline> {
        let stages = self
            .stages
            .iter()
            .rev()
            .map(matrix::invert)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    /// Product of all stages, last stage leftmost.
    pub fn collapse(&self) -> Matrix4<f64> {
        self.stages
            .iter()
            .fold(Matrix4::identity(), |acc, stage| stage * acc)
    }

    pub fn apply(&self, point: &Point3<f64>) -> Result<Point3<f64>> {
        self.stages
            .iter()
            .try_fold(*point, |p, stage| matrix::apply(stage, &p))
    }
}
