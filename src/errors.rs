use thiserror::Error;

use crate::method::Method;

///
/// Errors raised while building or evaluating an interpolator.
///
/// Three families exist: validation errors (bad grid, bad values, method
/// incompatible with an axis), domain errors (query outside the grid while
/// `bounds_error` is set) and configuration errors (unknown method name).
/// Serialization and i/o failures of the byte-buffer API are reported
/// separately.
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError
{
    #[error("grid must have at least one axis")]
    EmptyGrid,

    #[error("axis {axis} has no coordinates")]
    EmptyAxis { axis: usize },

    #[error("axis {axis} has a non-finite coordinate at position {index}")]
    NonFiniteCoordinate { axis: usize, index: usize },

    #[error("axis {axis} is not strictly increasing at position {index}")]
    NotStrictlyIncreasing { axis: usize, index: usize },

    #[error("axis {axis} spans more than the largest finite float")]
    UnboundedAxis { axis: usize },

    #[error("values have {actual} dimensions but the grid needs at least {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("axis {axis} has {expected} points but values have {actual} along that dimension")]
    ShapeMismatch { axis: usize, expected: usize, actual: usize },

    #[error("axis {axis} has {actual} points, but method {method} requires at least {required}")]
    InsufficientPoints { axis: usize, method: Method, required: usize, actual: usize },

    #[error("spline collocation matrix for axis {axis} is singular")]
    SingularCollocation { axis: usize },

    #[error("invalid array shape: {0}")]
    InvalidShape(String),

    #[error("query points have shape {shape:?}, expected trailing dimension {ndim}")]
    QueryShape { shape: Vec<usize>, ndim: usize },

    #[error("point {point} is out of bounds in axis {axis} (coordinate {coordinate})")]
    OutOfDomain { point: usize, axis: usize, coordinate: f64 },

    #[error("unsupported interpolation method `{0}`")]
    UnsupportedMethod(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("lz4 decompression failed")]
    Decompression,

    #[error("i/o failure: {0}")]
    Io(String),
}

impl InterpolationError
{
    /// Construction or rebinding rejected the grid, values or method.
    pub fn is_validation(&self) -> bool
    {
        matches!(self,
            Self::EmptyGrid
            | Self::EmptyAxis { .. }
            | Self::NonFiniteCoordinate { .. }
            | Self::NotStrictlyIncreasing { .. }
            | Self::UnboundedAxis { .. }
            | Self::DimensionMismatch { .. }
            | Self::ShapeMismatch { .. }
            | Self::InsufficientPoints { .. }
            | Self::SingularCollocation { .. }
            | Self::InvalidShape(_)
            | Self::QueryShape { .. })
    }

    /// A query coordinate fell outside the grid while `bounds_error` was set.
    pub fn is_domain(&self) -> bool
    {
        matches!(self, Self::OutOfDomain { .. })
    }

    pub fn is_configuration(&self) -> bool
    {
        matches!(self, Self::UnsupportedMethod(_))
    }
}

pub type Result<T> = std::result::Result<T, InterpolationError>;

#[test]
fn check_error_taxonomy()
{
    let err = InterpolationError::OutOfDomain { point: 3, axis: 1, coordinate: 7.5 };
    assert!(err.is_domain());
    assert!(!err.is_validation());
    assert_eq!(err.to_string(), "point 3 is out of bounds in axis 1 (coordinate 7.5)");

    let err = InterpolationError::InsufficientPoints { axis: 0, method: Method::Cubic, required: 4, actual: 3 };
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "axis 0 has 3 points, but method cubic requires at least 4");

    assert!(InterpolationError::UnsupportedMethod("bogus".to_string()).is_configuration());
}
