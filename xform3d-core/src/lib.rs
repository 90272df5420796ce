//! xform3d Core Library - Composable 3D transforms
//!
//! This library provides linear, perspective and general transforms that
//! can be chained, inverted and copied, plus the point-set geometry they
//! are applied to.

pub mod error;
pub mod filter;
pub mod general;
pub mod geometry;
pub mod linear;
pub mod matrix;
pub mod perspective;
pub mod stl;
pub mod transform;

mod concatenation;
mod node;
mod pipeline;

// Re-export commonly used types
pub use concatenation::MultiplyOrder;
pub use error::{Result, StlError, TransformError};
pub use filter::{transform_point_set, TransformFilter};
pub use general::GeneralTransform;
pub use geometry::{PlaneSource, PointSet};
pub use linear::LinearTransform;
pub use node::{TransformKind, TransformNode, TransformState};
pub use perspective::PerspectiveTransform;
pub use transform::{Transform, TransformOps};
