//! Applies a transform to a whole point set

use crate::error::{Result, TransformError};
use crate::geometry::PointSet;
use crate::transform::Transform;

/// Map every point of `input` through `transform`, preserving order.
///
/// Fails without producing partial output if any point is sent to infinity
/// or an inverse on the way is singular.
pub fn transform_point_set(transform: &Transform, input: &PointSet) -> Result<PointSet> {
    let points = transform.apply_points(&input.points)?;
    log::trace!("transformed {} points", points.len());
    Ok(PointSet::from_points(points))
}

/// Point-set filter with a transform that is wired in after construction.
#[derive(Debug, Clone, Default)]
pub struct TransformFilter {
    transform: Option<Transform>,
}

impl TransformFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform<T: Into<Transform>>(transform: T) -> Self {
        Self {
            transform: Some(transform.into()),
        }
    }

    pub fn set_transform<T: Into<Transform>>(&mut self, transform: T) {
        self.transform = Some(transform.into());
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// Run the filter. Fails with `UnresolvedInput` if no transform was set.
    pub fn execute(&self, input: &PointSet) -> Result<PointSet> {
        let transform = self
            .transform
            .as_ref()
            .ok_or(TransformError::UnresolvedInput("filter has no transform"))?;
        transform_point_set(transform, input)
    }
}
