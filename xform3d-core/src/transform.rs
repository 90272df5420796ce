//! Type-erased transform handle and the operations shared by every kind
use std::rc::Rc;

use nalgebra::{Matrix4, Point3};

use crate::concatenation::MultiplyOrder;
use crate::error::Result;
use crate::matrix;
use crate::node::{TransformKind, TransformNode, TransformState};
use crate::pipeline::Pipeline;

/// A transform, or a live inverse view of one.
///
/// Both variants hold their node strongly, so a composite that takes an
/// inverse view as input or concatenation keeps the source alive with it.
#[derive(Debug, Clone)]
pub enum Transform {
    Direct(Rc<TransformNode>),
    Inverted(Rc<TransformNode>),
}

impl Transform {
    pub(crate) fn node(&self) -> &Rc<TransformNode> {
        match self {
            Transform::Direct(node) | Transform::Inverted(node) => node,
        }
    }

    pub fn is_inverse(&self) -> bool {
        matches!(self, Transform::Inverted(_))
    }

    pub fn kind(&self) -> TransformKind {
        self.node().kind()
    }

    /// The inverse of this handle. Inverting an inverse view yields the
    /// source itself.
    pub fn inverse(&self) -> Transform {
        match self {
            Transform::Direct(node) => Transform::Inverted(Rc::clone(node)),
            Transform::Inverted(node) => Transform::Direct(Rc::clone(node)),
        }
    }

    /// Finalize the underlying transform. Inverse views have no state of
    /// their own, so this updates the source.
    pub fn update(&self) -> Result<()> {
        self.node().update()
    }

    pub(crate) fn pipeline(&self) -> Result<Pipeline> {
        match self {
            Transform::Direct(node) => node.pipeline(),
            Transform::Inverted(node) => node.inverse_pipeline(),
        }
    }

    pub(crate) fn inverse_pipeline(&self) -> Result<Pipeline> {
        match self {
            Transform::Direct(node) => node.inverse_pipeline(),
            Transform::Inverted(node) => node.pipeline(),
        }
    }

    pub fn apply(&self, point: &Point3<f64>) -> Result<Point3<f64>> {
        self.pipeline()?.apply(point)
    }

    /// Map every point in order. The transform is resolved once.
    pub fn apply_points(&self, points: &[Point3<f64>]) -> Result<Vec<Point3<f64>>> {
        let pipeline = self.pipeline()?;
        points.iter().map(|p| pipeline.apply(p)).collect()
    }

    /// The whole mapping collapsed into a single homogeneous matrix.
    pub fn matrix(&self) -> Result<Matrix4<f64>> {
        Ok(self.pipeline()?.collapse())
    }
}

impl From<&Transform> for Transform {
    fn from(transform: &Transform) -> Self {
        transform.clone()
    }
}

/// Operations available on every concrete transform handle.
///
/// Scale, rotation and translation steps are composed in the current
/// [`MultiplyOrder`]. With the default `Pre` order each new step is applied
/// to points before the steps added earlier.
pub trait TransformOps {
    /// Shared state behind this handle.
    fn node(&self) -> &Rc<TransformNode>;

    fn as_transform(&self) -> Transform {
        Transform::Direct(Rc::clone(self.node()))
    }

    /// A view that always reflects the inverse of this transform's current
    /// state.
    fn inverse(&self) -> Transform {
        Transform::Inverted(Rc::clone(self.node()))
    }

    fn kind(&self) -> TransformKind {
        self.node().kind()
    }

    fn state(&self) -> TransformState {
        self.node().state()
    }

    fn translate(&self, x: f64, y: f64, z: f64) {
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return;
        }
        self.node().append_affine(matrix::translation(x, y, z));
    }

    fn scale(&self, x: f64, y: f64, z: f64) {
        if x == 1.0 && y == 1.0 && z == 1.0 {
            return;
        }
        self.node().append_affine(matrix::scale(x, y, z));
    }

    /// Rotate by `angle` degrees about the axis `(x, y, z)`.
    fn rotate_wxyz(&self, angle: f64, x: f64, y: f64, z: f64) {
        if let Some(m) = matrix::rotation_wxyz(angle, x, y, z) {
            self.node().append_affine(m);
        }
    }

    fn rotate_x(&self, angle: f64) {
        self.rotate_wxyz(angle, 1.0, 0.0, 0.0);
    }

    fn rotate_y(&self, angle: f64) {
        self.rotate_wxyz(angle, 0.0, 1.0, 0.0);
    }

    fn rotate_z(&self, angle: f64) {
        self.rotate_wxyz(angle, 0.0, 0.0, 1.0);
    }

    fn concatenate_matrix(&self, m: &Matrix4<f64>) -> Result<()> {
        self.node().append_matrix(m)
    }

    /// Append another transform's effect. The reference is live: later
    /// changes to `other` show up here.
    fn concatenate<T: Into<Transform>>(&self, other: T) -> Result<()> {
        self.node().append_transform(&other.into())
    }

    /// Use `input` as the innermost stage of this transform.
    fn set_input<T: Into<Transform>>(&self, input: T) -> Result<()> {
        self.node().set_input(&input.into())
    }

    fn clear_input(&self) {
        self.node().clear_input();
    }

    fn input(&self) -> Option<Transform> {
        self.node().input()
    }

    fn pre_multiply(&self) {
        self.node().set_multiply_order(MultiplyOrder::Pre);
    }

    fn post_multiply(&self) {
        self.node().set_multiply_order(MultiplyOrder::Post);
    }

    fn multiply_order(&self) -> MultiplyOrder {
        self.node().multiply_order()
    }

    /// Discard all steps. The input is kept.
    fn identity(&self) {
        self.node().identity();
    }

    /// Invert this transform in place.
    fn invert(&self) {
        self.node().invert();
    }

    fn is_inverted(&self) -> bool {
        self.node().is_inverted()
    }

    /// Save the current steps.
    ///
    /// Fails while the transform is still uninitialized. Operations with no
    /// effect (a zero translation, a unit scale, a zero rotation) append
    /// nothing, so they do not count as building.
    fn push(&self) -> Result<()> {
        self.node().push()
    }

    /// Restore the steps saved by the matching [`push`](Self::push).
    fn pop(&self) -> Result<()> {
        self.node().pop()
    }

    fn stack_depth(&self) -> usize {
        self.node().stack_depth()
    }

    fn update(&self) -> Result<()> {
        self.node().update()
    }

    fn apply(&self, point: &Point3<f64>) -> Result<Point3<f64>> {
        self.node().pipeline()?.apply(point)
    }

    fn apply_points(&self, points: &[Point3<f64>]) -> Result<Vec<Point3<f64>>> {
        self.as_transform().apply_points(points)
    }

    fn matrix(&self) -> Result<Matrix4<f64>> {
        Ok(self.node().pipeline()?.collapse())
    }
}
