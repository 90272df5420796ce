//! Affine transform built from scale, rotation and translation steps
use std::rc::Rc;

use nalgebra::Vector3;

use crate::error::Result;
use crate::node::{TransformKind, TransformNode};
use crate::transform::{Transform, TransformOps};

/// Affine 4x4 transform.
///
/// Inputs and concatenated transforms must themselves be linear, which keeps
/// the composed matrix affine.
#[derive(Debug, Clone)]
pub struct LinearTransform {
    node: Rc<TransformNode>,
}

impl LinearTransform {
    pub fn new() -> Self {
        Self {
            node: TransformNode::new(TransformKind::Linear),
        }
    }

    /// An empty transform of the same kind.
    pub fn make_transform(&self) -> Self {
        Self::new()
    }

    /// Replace this transform's state with a copy of `source`'s.
    pub fn deep_copy(&self, source: &LinearTransform) -> Result<()> {
        self.node.deep_copy_from(&source.node)
    }

    /// Apply the linear part only, ignoring translation.
    pub fn transform_vector(&self, v: &Vector3<f64>) -> Result<Vector3<f64>> {
        Ok(self.matrix()?.transform_vector(v))
    }
}

impl Default for LinearTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformOps for LinearTransform {
    fn node(&self) -> &Rc<TransformNode> {
        &self.node
    }
}

impl From<&LinearTransform> for Transform {
    fn from(transform: &LinearTransform) -> Self {
        transform.as_transform()
    }
}

impl From<LinearTransform> for Transform {
    fn from(transform: LinearTransform) -> Self {
        Transform::Direct(transform.node)
    }
}
