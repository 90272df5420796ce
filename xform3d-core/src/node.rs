//! Shared state behind every transform handle

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Matrix4;

use crate::concatenation::{Concatenation, MultiplyOrder, StepKind};
use crate::error::{Result, TransformError};
use crate::matrix;
use crate::pipeline::Pipeline;
use crate::transform::Transform;

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// Next modification time. Strictly increasing across all transforms.
fn tick() -> u64 {
    CLOCK.fetch_add(1, Ordering::Relaxed) + 1
}

/// Capability of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Affine: preserves parallel lines.
    Linear,
    /// Homogeneous 4x4, including a divide by `w`.
    Perspective,
    /// Arbitrary chain of other transforms.
    General,
}

impl TransformKind {
    /// Whether a transform of kind `other` may feed one of this kind.
    pub fn accepts(self, other: TransformKind) -> bool {
        match self {
            TransformKind::Linear => other == TransformKind::Linear,
            TransformKind::Perspective => other != TransformKind::General,
            TransformKind::General => true,
        }
    }

    fn is_homogeneous(self) -> bool {
        self != TransformKind::General
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::Linear => "linear",
            TransformKind::Perspective => "perspective",
            TransformKind::General => "general",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    /// Nothing appended yet.
    Uninitialized,
    /// Mutated since the last evaluation.
    Building,
    /// Evaluated and cached.
    Finalized,
}

#[derive(Debug)]
struct Cache {
    mtime: u64,
    forward: Pipeline,
    inverse: Option<Pipeline>,
}

#[derive(Debug)]
struct Body {
    concatenation: Concatenation,
    input: Option<Transform>,
    stack: Vec<Concatenation>,
    state: TransformState,
    mtime: u64,
    cache: Option<Cache>,
}

/// Reference-counted transform state shared by handles and inverse views.
#[derive(Debug)]
pub struct TransformNode {
    kind: TransformKind,
    body: RefCell<Body>,
}

impl TransformNode {
    pub(crate) fn new(kind: TransformKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            body: RefCell::new(Body {
                concatenation: Concatenation::default(),
                input: None,
                stack: Vec::new(),
                state: TransformState::Uninitialized,
                mtime: tick(),
                cache: None,
            }),
        })
    }

    pub(crate) fn kind(&self) -> TransformKind {
        self.kind
    }

    pub(crate) fn state(&self) -> TransformState {
        self.body.borrow().state
    }

    fn modify(&self, f: impl FnOnce(&mut Body)) {
        let mut body = self.body.borrow_mut();
        f(&mut body);
        body.state = TransformState::Building;
        body.mtime = tick();
    }

    /// Append a matrix known to be affine.
    pub(crate) fn append_affine(&self, m: Matrix4<f64>) {
        self.modify(|body| body.concatenation.push(StepKind::Matrix(m)));
    }

    pub(crate) fn append_matrix(&self, m: &Matrix4<f64>) -> Result<()> {
        if self.kind == TransformKind::Linear && !matrix::is_affine(m) {
            return Err(TransformError::NonAffineMatrix);
        }
        self.modify(|body| body.concatenation.push(StepKind::Matrix(*m)));
        Ok(())
    }

    /// Check that `other` may be wired into this node.
    fn check_dependency(&self, other: &Transform) -> Result<()> {
        let node = other.node();
        if !self.kind.accepts(node.kind) {
            return Err(TransformError::IncompatibleTransform {
                expected: self.kind,
                found: node.kind,
            });
        }
        if node.depends_on(self) {
            return Err(TransformError::CircularReference);
        }
        Ok(())
    }

    pub(crate) fn append_transform(&self, other: &Transform) -> Result<()> {
        self.check_dependency(other)?;
        let other = other.clone();
        self.modify(|body| body.concatenation.push(StepKind::Transform(other)));
        Ok(())
    }

    pub(crate) fn set_input(&self, input: &Transform) -> Result<()> {
        self.check_dependency(input)?;
        let input = input.clone();
        self.modify(|body| body.input = Some(input));
        Ok(())
    }

    pub(crate) fn clear_input(&self) {
        self.modify(|body| body.input = None);
    }

    pub(crate) fn input(&self) -> Option<Transform> {
        self.body.borrow().input.clone()
    }

    pub(crate) fn multiply_order(&self) -> MultiplyOrder {
        self.body.borrow().concatenation.order()
    }

    pub(crate) fn set_multiply_order(&self, order: MultiplyOrder) {
        self.body.borrow_mut().concatenation.set_order(order);
    }

    pub(crate) fn identity(&self) {
        self.modify(|body| body.concatenation.clear());
    }

    pub(crate) fn invert(&self) {
        self.modify(|body| body.concatenation.invert());
    }

    pub(crate) fn is_inverted(&self) -> bool {
        self.body.borrow().concatenation.is_inverted()
    }

    pub(crate) fn push(&self) -> Result<()> {
        let mut body = self.body.borrow_mut();
        if body.state == TransformState::Uninitialized {
            return Err(TransformError::InvalidStackOperation(
                "push on a transform with no operations",
            ));
        }
        let frame = body.concatenation.clone();
        body.stack.push(frame);
        log::debug!("{} transform push, depth {}", self.kind, body.stack.len());
        Ok(())
    }

    pub(crate) fn pop(&self) -> Result<()> {
        let frame = self
            .body
            .borrow_mut()
            .stack
            .pop()
            .ok_or(TransformError::InvalidStackOperation("pop without matching push"))?;
        self.modify(|body| body.concatenation = frame);
        log::debug!("{} transform pop, depth {}", self.kind, self.stack_depth());
        Ok(())
    }

    pub(crate) fn stack_depth(&self) -> usize {
        self.body.borrow().stack.len()
    }

    /// Whether this node is `target` or reaches it through any reference,
    /// including those held in saved stack frames.
    fn depends_on(&self, target: &TransformNode) -> bool {
        if std::ptr::eq(self, target) {
            return true;
        }
        let body = self.body.borrow();
        let found = body
            .input
            .iter()
            .chain(body.concatenation.transforms())
            .chain(body.stack.iter().flat_map(Concatenation::transforms))
            .any(|t| t.node().depends_on(target));
        found
    }

    /// Copy every piece of state from `source`, sharing only its references
    /// to other transforms.
    pub(crate) fn deep_copy_from(&self, source: &TransformNode) -> Result<()> {
        if std::ptr::eq(self, source) {
            return Ok(());
        }
        if source.depends_on(self) {
            return Err(TransformError::CircularReference);
        }
        let (concatenation, input, stack, state) = {
            let src = source.body.borrow();
            (
                src.concatenation.clone(),
                src.input.clone(),
                src.stack.clone(),
                src.state,
            )
        };
        log::debug!(
            "deep copy of {} transform ({} steps, {} frames)",
            self.kind,
            concatenation.len(),
            stack.len()
        );
        let mut body = self.body.borrow_mut();
        body.concatenation = concatenation;
        body.input = input;
        body.stack = stack;
        body.state = match state {
            TransformState::Uninitialized => TransformState::Uninitialized,
            _ => TransformState::Building,
        };
        body.mtime = tick();
        body.cache = None;
        Ok(())
    }

    /// Latest modification time of this node and everything it reads.
    fn effective_mtime(&self) -> u64 {
        let body = self.body.borrow();
        let mtime = body
            .input
            .iter()
            .chain(body.concatenation.transforms())
            .map(|t| t.node().effective_mtime())
            .fold(body.mtime, u64::max);
        mtime
    }

    fn evaluate(&self) -> Result<Pipeline> {
        let body = self.body.borrow();
        let input = body.input.as_ref().map(Transform::pipeline).transpose()?;
        let composed = body.concatenation.compose(input)?;
        let composed = if self.kind.is_homogeneous() {
            Pipeline::single(composed.collapse())
        } else {
            composed
        };
        if body.concatenation.is_inverted() {
            composed.inverse()
        } else {
            Ok(composed)
        }
    }

    pub(crate) fn pipeline(&self) -> Result<Pipeline> {
        let mtime = self.effective_mtime();
        if let Some(cache) = self.body.borrow().cache.as_ref() {
            if cache.mtime == mtime {
                return Ok(cache.forward.clone());
            }
        }

        log::debug!("rebuilding {} transform", self.kind);
        let forward = self.evaluate()?;
        let mut body = self.body.borrow_mut();
        body.cache = Some(Cache {
            mtime,
            forward: forward.clone(),
            inverse: None,
        });
        body.state = TransformState::Finalized;
        Ok(forward)
    }

    pub(crate) fn inverse_pipeline(&self) -> Result<Pipeline> {
        let forward = self.pipeline()?;
        if let Some(inverse) = self
            .body
            .borrow()
            .cache
            .as_ref()
            .and_then(|cache| cache.inverse.clone())
        {
            return Ok(inverse);
        }

        let inverse = forward.inverse()?;
        if let Some(cache) = self.body.borrow_mut().cache.as_mut() {
            cache.inverse = Some(inverse.clone());
        }
        Ok(inverse)
    }

    pub(crate) fn update(&self) -> Result<()> {
        self.pipeline().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_compatibility() {
        assert!(TransformKind::Linear.accepts(TransformKind::Linear));
        assert!(!TransformKind::Linear.accepts(TransformKind::Perspective));
        assert!(TransformKind::Perspective.accepts(TransformKind::Linear));
        assert!(!TransformKind::Perspective.accepts(TransformKind::General));
        assert!(TransformKind::General.accepts(TransformKind::Perspective));
    }

    #[test]
    fn test_state_transitions() {
        let node = TransformNode::new(TransformKind::Linear);
        assert_eq!(node.state(), TransformState::Uninitialized);

        node.append_affine(matrix::translation(1.0, 0.0, 0.0));
        assert_eq!(node.state(), TransformState::Building);

        node.update().unwrap();
        assert_eq!(node.state(), TransformState::Finalized);

        node.append_affine(matrix::scale(2.0, 1.0, 1.0));
        assert_eq!(node.state(), TransformState::Building);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let a = tick();
        let b = tick();
        assert!(b > a);
    }

    #[test]
    fn test_cache_reused_until_mutation() {
        let node = TransformNode::new(TransformKind::Perspective);
        node.append_affine(matrix::translation(1.0, 2.0, 3.0));
        node.update().unwrap();
        let mtime = node.body.borrow().cache.as_ref().unwrap().mtime;

        node.update().unwrap();
        assert_eq!(node.body.borrow().cache.as_ref().unwrap().mtime, mtime);

        node.append_affine(matrix::scale(2.0, 2.0, 2.0));
        node.update().unwrap();
        assert!(node.body.borrow().cache.as_ref().unwrap().mtime > mtime);
    }
}
