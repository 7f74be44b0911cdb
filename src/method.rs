use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InterpolationError;

///
/// Interpolation method used by an [`Interpolator`](crate::interpolator::Interpolator).
///
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method
{
    /// Snap every coordinate to the closest node (ties go to the lower node).
    Nearest,
    /// Tensor-product multilinear interpolation.
    #[default]
    Linear,
    /// Degree 1 tensor-product spline.
    Slinear,
    /// Degree 3 tensor-product spline with not-a-knot end conditions.
    Cubic,
    /// Degree 5 tensor-product spline with not-a-knot end conditions.
    Quintic,
    /// Tensor-product monotone piecewise cubic Hermite interpolation.
    Pchip,
}

impl Method
{
    pub const ALL: [Method; 6] = [Method::Nearest, Method::Linear, Method::Slinear, Method::Cubic, Method::Quintic, Method::Pchip];

    /// Position of the method in [`Method::ALL`].
    #[inline]
    pub fn index(&self) -> usize
    {
        *self as usize
    }

    pub fn name(&self) -> &'static str
    {
        match self
        {
            Method::Nearest => "nearest",
            Method::Linear => "linear",
            Method::Slinear => "slinear",
            Method::Cubic => "cubic",
            Method::Quintic => "quintic",
            Method::Pchip => "pchip",
        }
    }

    /// Polynomial degree of the B-spline for spline methods, `None` otherwise.
    pub fn spline_degree(&self) -> Option<usize>
    {
        match self
        {
            Method::Slinear => Some(1),
            Method::Cubic => Some(3),
            Method::Quintic => Some(5),
            _ => None,
        }
    }

    ///
    /// Minimum number of nodes an axis must have for this method.
    /// Nearest and linear accept degenerate (single node) axes.
    ///
    pub fn min_points(&self) -> usize
    {
        match self
        {
            Method::Nearest | Method::Linear => 1,
            Method::Slinear => 2,
            Method::Cubic | Method::Pchip => 4,
            Method::Quintic => 6,
        }
    }
}

impl Display for Method
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method
{
    type Err = InterpolationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL.iter()
            .find(|method| method.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| InterpolationError::UnsupportedMethod(s.to_string()))
    }
}

#[test]
fn check_method_names()
{
    for method in Method::ALL
    {
        assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
    }
    assert_eq!("Cubic".parse::<Method>().unwrap(), Method::Cubic);
    let err = "spline2".parse::<Method>().unwrap_err();
    assert!(err.is_configuration());
    for (i, method) in Method::ALL.iter().enumerate()
    {
        assert_eq!(method.index(), i);
    }
}

#[test]
fn check_min_points()
{
    assert_eq!(Method::Linear.min_points(), 1);
    assert_eq!(Method::Slinear.min_points(), Method::Slinear.spline_degree().unwrap() + 1);
    assert_eq!(Method::Quintic.min_points(), 6);
    assert_eq!(Method::Pchip.spline_degree(), None);
}
