//! Error types for transform evaluation and point-set loading

use thiserror::Error;

use crate::node::TransformKind;

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors reported by transform construction and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Pop without a matching push, or push before the transform was built.
    #[error("invalid stack operation: {0}")]
    InvalidStackOperation(&'static str),

    /// A point-set filter was run before its transform was set.
    #[error("unresolved input: {0}")]
    UnresolvedInput(&'static str),

    /// Singular inverse, zero homogeneous coordinate or empty range.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(&'static str),

    /// A transform of the wrong kind was supplied as input or concatenation.
    #[error("a {found} transform cannot be used where a {expected} transform is required")]
    IncompatibleTransform {
        expected: TransformKind,
        found: TransformKind,
    },

    /// A projective matrix was concatenated onto a linear transform.
    #[error("non-affine matrix cannot be concatenated onto a linear transform")]
    NonAffineMatrix,

    /// The operation would make a transform depend on itself.
    #[error("circular reference: transform would depend on itself")]
    CircularReference,
}

/// Errors reported while reading STL point data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("unexpected end of file: header declares {declared} triangles, found {found}")]
    Truncated { declared: usize, found: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}
