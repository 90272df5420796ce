//! Ordered record of the steps a transform is built from

use nalgebra::Matrix4;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::transform::Transform;

/// Where newly added steps go relative to the effect accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiplyOrder {
    /// New steps are applied to points before the existing ones.
    #[default]
    Pre,
    /// New steps are applied to points after the existing ones.
    Post,
}

impl MultiplyOrder {
    fn flipped(self) -> Self {
        match self {
            MultiplyOrder::Pre => MultiplyOrder::Post,
            MultiplyOrder::Post => MultiplyOrder::Pre,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum StepKind {
    Matrix(Matrix4<f64>),
    Transform(Transform),
}

#[derive(Debug, Clone)]
pub(crate) struct Step {
    kind: StepKind,
    inverted: bool,
}

impl Step {
    fn pipeline(&self) -> Result<Pipeline> {
        match (&self.kind, self.inverted) {
            (StepKind::Matrix(m), false) => Ok(Pipeline::single(*m)),
            (StepKind::Matrix(m), true) => Pipeline::single(*m).inverse(),
            (StepKind::Transform(t), false) => t.pipeline(),
            (StepKind::Transform(t), true) => t.inverse_pipeline(),
        }
    }

    fn transform(&self) -> Option<&Transform> {
        match &self.kind {
            StepKind::Transform(t) => Some(t),
            StepKind::Matrix(_) => None,
        }
    }
}

/// Steps on either side of the input, composed as
/// `post_n .. post_1 * input * pre_1 .. pre_n`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Concatenation {
    pre: Vec<Step>,
    post: Vec<Step>,
    order: MultiplyOrder,
    inverted: bool,
}

impl Concatenation {
    /// Add a step in the current multiply order.
    ///
    /// While the concatenation is inverted, the step is stored inverted on
    /// the opposite side so that it still composes with the inverted result.
    pub fn push(&mut self, kind: StepKind) {
        let side = if self.inverted {
            self.order.flipped()
        } else {
            self.order
        };
        let step = Step {
            kind,
            inverted: self.inverted,
        };
        match side {
            MultiplyOrder::Pre => self.pre.push(step),
            MultiplyOrder::Post => self.post.push(step),
        }
    }

    pub fn order(&self) -> MultiplyOrder {
        self.order
    }

    pub fn set_order(&mut self, order: MultiplyOrder) {
        self.order = order;
    }

    pub fn invert(&mut self) {
        self.inverted = !self.inverted;
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Drop every step. The multiply order is kept.
    pub fn clear(&mut self) {
        self.pre.clear();
        self.post.clear();
        self.inverted = false;
    }

    pub fn len(&self) -> usize {
        self.pre.len() + self.post.len()
    }

    pub fn transforms(&self) -> impl Iterator<Item = &Transform> {
        self.pre
            .iter()
            .chain(self.post.iter())
            .filter_map(Step::transform)
    }

    /// Stages in point order, without applying the inversion flag.
    pub fn compose(&self, input: Option<Pipeline>) -> Result<Pipeline> {
        let mut pipeline = Pipeline::identity();
        for step in self.pre.iter().rev() {
            pipeline.then(step.pipeline()?);
        }
        if let Some(input) = input {
            pipeline.then(input);
        }
        for step in &self.post {
            pipeline.then(step.pipeline()?);
        }
        Ok(pipeline)
    }
}
