//! Chain of arbitrary transforms
use std::rc::Rc;

use crate::error::Result;
use crate::node::{TransformKind, TransformNode};
use crate::transform::{Transform, TransformOps};

/// Composable chain of transforms of any kind.
///
/// Unlike the homogeneous kinds, the chain is not collapsed into a single
/// matrix: each stage is applied in turn, and the inverse runs the stages
/// backwards with each one inverted.
#[derive(Debug, Clone)]
pub struct GeneralTransform {
    node: Rc<TransformNode>,
}

impl GeneralTransform {
    pub fn new() -> Self {
        Self {
            node: TransformNode::new(TransformKind::General),
        }
    }

    /// An empty transform of the same kind.
    pub fn make_transform(&self) -> Self {
        Self::new()
    }

    /// Replace this transform's state with a copy of `source`'s.
    pub fn deep_copy(&self, source: &GeneralTransform) -> Result<()> {
        self.node.deep_copy_from(&source.node)
    }
}

impl Default for GeneralTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformOps for GeneralTransform {
    fn node(&self) -> &Rc<TransformNode> {
        &self.node
    }
}

impl From<&GeneralTransform> for Transform {
    fn from(transform: &GeneralTransform) -> Self {
        transform.as_transform()
    }
}

impl From<GeneralTransform> for Transform {
    fn from(transform: GeneralTransform) -> Self {
        Transform::Direct(transform.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concatenation::MultiplyOrder;
    use crate::linear::LinearTransform;
    use crate::perspective::PerspectiveTransform;
    use nalgebra::Point3;

    fn assert_close(a: Point3<f64>, b: Point3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a} != {b}");
    }

    fn sample() -> LinearTransform {
        let t = LinearTransform::new();
        t.scale(1.5, 0.5, 2.0);
        t.rotate_y(20.0);
        t.translate(0.3, -0.2, 1.0);
        t
    }

    #[test]
    fn test_pre_and_post_order() {
        let shift = LinearTransform::new();
        shift.translate(1.0, 0.0, 0.0);
        let double = LinearTransform::new();
        double.scale(2.0, 2.0, 2.0);

        let g = GeneralTransform::new();
        assert_eq!(g.multiply_order(), MultiplyOrder::Pre);
        g.concatenate(&shift).unwrap();
        g.concatenate(&double).unwrap();
        assert_close(g.apply(&Point3::new(1.0, 0.0, 0.0)).unwrap(), Point3::new(3.0, 0.0, 0.0));

        let g = GeneralTransform::new();
        g.post_multiply();
        g.concatenate(&shift).unwrap();
        g.concatenate(&double).unwrap();
        assert_close(g.apply(&Point3::new(1.0, 0.0, 0.0)).unwrap(), Point3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_concatenate_with_own_inverse_cancels_in_both_orders() {
        let t = sample();
        let p = Point3::new(0.4, -0.7, 0.1);

        for post in [false, true] {
            let g = GeneralTransform::new();
            if post {
                g.post_multiply();
            }
            g.concatenate(&t).unwrap();
            g.concatenate(t.inverse()).unwrap();
            assert_close(g.apply(&p).unwrap(), p);
        }
    }

    #[test]
    fn test_inverse_reverses_chain() {
        let a = sample();
        let b = PerspectiveTransform::new();
        b.shear(0.2, 0.3, 0.0);
        b.rotate_x(15.0);

        let g = GeneralTransform::new();
        g.set_input(&a).unwrap();
        g.post_multiply();
        g.concatenate(&b).unwrap();
        g.translate(1.0, 2.0, 3.0);

        let p = Point3::new(-0.3, 0.2, 0.9);
        let there = g.apply(&p).unwrap();
        assert_close(g.inverse().apply(&there).unwrap(), p);
    }

    #[test]
    fn test_nested_general_input() {
        let inner = GeneralTransform::new();
        inner.translate(0.0, 1.0, 0.0);
        let outer = GeneralTransform::new();
        outer.set_input(&inner).unwrap();
        outer.scale(3.0, 3.0, 3.0);
        // scale, then the input
        assert_close(outer.apply(&Point3::new(1.0, 1.0, 1.0)).unwrap(), Point3::new(3.0, 4.0, 3.0));
    }

    #[test]
    fn test_deep_copy_keeps_shared_references() {
        let base = sample();
        let g = GeneralTransform::new();
        g.concatenate(&base).unwrap();

        let copy = g.make_transform();
        copy.deep_copy(&g).unwrap();
        g.translate(5.0, 0.0, 0.0);

        let p = Point3::new(1.0, 1.0, 1.0);
        assert_close(copy.apply(&p).unwrap(), base.apply(&p).unwrap());
    }
}
