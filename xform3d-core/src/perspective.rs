//! Homogeneous transform with projection, viewport and camera helpers
use std::rc::Rc;

use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::matrix;
use crate::node::{TransformKind, TransformNode};
use crate::transform::{Transform, TransformOps};

/// Projective 4x4 transform. Accepts linear or perspective inputs.
#[derive(Debug, Clone)]
pub struct PerspectiveTransform {
    node: Rc<TransformNode>,
}

impl PerspectiveTransform {
    pub fn new() -> Self {
        Self {
            node: TransformNode::new(TransformKind::Perspective),
        }
    }

    /// An empty transform of the same kind.
    pub fn make_transform(&self) -> Self {
        Self::new()
    }

    /// Replace this transform's state with a copy of `source`'s.
    ///
    /// The copy shares the source's input and concatenated transforms but
    /// owns its own steps and stack, so later changes to `source` itself do
    /// not reach it.
    pub fn deep_copy(&self, source: &PerspectiveTransform) -> Result<()> {
        self.node.deep_copy_from(&source.node)
    }

    /// Remap the x/y window `old` onto `new`. Calling it again with the two
    /// windows swapped cancels it.
    #[allow(clippy::too_many_arguments)]
    pub fn adjust_viewport(
        &self,
        old_x_min: f64,
        old_x_max: f64,
        old_y_min: f64,
        old_y_max: f64,
        new_x_min: f64,
        new_x_max: f64,
        new_y_min: f64,
        new_y_max: f64,
    ) -> Result<()> {
        let m = matrix::viewport(
            old_x_min, old_x_max, old_y_min, old_y_max, new_x_min, new_x_max, new_y_min, new_y_max,
        )?;
        let unchanged = old_x_min == new_x_min
            && old_x_max == new_x_max
            && old_y_min == new_y_min
            && old_y_max == new_y_max;
        if !unchanged {
            self.node.append_affine(m);
        }
        Ok(())
    }

    /// Remap the depth range `[old_near, old_far]` onto `[new_near, new_far]`.
    pub fn adjust_z_buffer(&self, old_near: f64, old_far: f64, new_near: f64, new_far: f64) -> Result<()> {
        let m = matrix::z_buffer(old_near, old_far, new_near, new_far)?;
        if old_near != new_near || old_far != new_far {
            self.node.append_affine(m);
        }
        Ok(())
    }

    /// Shear x and y in proportion to z, keeping the plane `z = zplane` fixed.
    pub fn shear(&self, dxdz: f64, dydz: f64, zplane: f64) {
        if dxdz == 0.0 && dydz == 0.0 {
            return;
        }
        self.node.append_affine(matrix::shear(dxdz, dydz, zplane));
    }

    pub fn ortho(&self, x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_near: f64, z_far: f64) -> Result<()> {
        let m = matrix::ortho(x_min, x_max, y_min, y_max, z_near, z_far)?;
        self.node.append_matrix(&m)
    }

    pub fn frustum(&self, x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_near: f64, z_far: f64) -> Result<()> {
        let m = matrix::frustum(x_min, x_max, y_min, y_max, z_near, z_far)?;
        self.node.append_matrix(&m)
    }

    /// Symmetric perspective projection with a vertical field of view of
    /// `angle` degrees.
    pub fn perspective(&self, angle: f64, aspect: f64, z_near: f64, z_far: f64) -> Result<()> {
        let m = matrix::perspective(angle, aspect, z_near, z_far)?;
        self.node.append_matrix(&m)
    }

    /// View transform for a camera at `position` looking at `focal_point`.
    pub fn setup_camera(&self, position: &Point3<f64>, focal_point: &Point3<f64>, view_up: &Vector3<f64>) -> Result<()> {
        let m = matrix::look_at(position, focal_point, view_up)?;
        self.node.append_matrix(&m)
    }
}

impl Default for PerspectiveTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformOps for PerspectiveTransform {
    fn node(&self) -> &Rc<TransformNode> {
        &self.node
    }
}

impl From<&PerspectiveTransform> for Transform {
    fn from(transform: &PerspectiveTransform) -> Self {
        transform.as_transform()
    }
}

impl From<PerspectiveTransform> for Transform {
    fn from(transform: PerspectiveTransform) -> Self {
        Transform::Direct(transform.node)
    }
}
