use serde::{Deserialize, Serialize};

use crate::errors::{InterpolationError, Result};

///
/// Position of a coordinate relative to the closed span of an axis.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisPosition
{
    Below,
    Inside,
    Above,
}

impl AxisPosition
{
    #[inline]
    pub fn is_inside(&self) -> bool
    {
        matches!(self, AxisPosition::Inside)
    }
}

///
/// Result of locating a coordinate on an axis.
///
/// `interval` is the index `i` of the lower node of the interval used for the
/// coordinate and `t` the local coordinate inside `[x[i], x[i+1]]`. Outside the
/// axis span the boundary interval is reused and `t` leaves `[0, 1]`.
/// Single node axes report interval 0 and the unscaled offset `c - x[0]`.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Location
{
    pub interval: usize,
    pub t: f64,
    pub position: AxisPosition,
}

///
/// One strictly increasing coordinate sequence of a rectilinear grid.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct GridAxis
{
    nodes: Vec<f64>,
}

impl GridAxis
{
    ///
    /// Validate and wrap `nodes`. `axis` only labels errors.
    ///
    pub fn new(nodes: Vec<f64>, axis: usize) -> Result<Self>
    {
        if nodes.is_empty()
        {
            return Err(InterpolationError::EmptyAxis { axis });
        }
        if let Some(index) = nodes.iter().position(|x| !x.is_finite())
        {
            return Err(InterpolationError::NonFiniteCoordinate { axis, index });
        }
        if let Some(index) = nodes.windows(2).position(|w| w[1] <= w[0])
        {
            return Err(InterpolationError::NotStrictlyIncreasing { axis, index: index + 1 });
        }
        // interval widths and local coordinates are differences of nodes
        if !(nodes[nodes.len() - 1] - nodes[0]).is_finite()
        {
            return Err(InterpolationError::UnboundedAxis { axis });
        }
        Ok(Self { nodes })
    }

    #[inline]
    pub fn len(&self) -> usize
    {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool
    {
        self.nodes.len() == 1
    }

    #[inline]
    pub fn nodes(&self) -> &[f64]
    {
        &self.nodes
    }

    #[inline]
    pub fn lower(&self) -> f64
    {
        self.nodes[0]
    }

    #[inline]
    pub fn upper(&self) -> f64
    {
        self.nodes[self.nodes.len() - 1]
    }

    ///
    /// Classify `x` against `[lower, upper]`. NaN is never inside.
    ///
    #[inline]
    pub fn position(&self, x: f64) -> AxisPosition
    {
        if x >= self.lower() && x <= self.upper()
        {
            AxisPosition::Inside
        }
        else if x > self.upper()
        {
            AxisPosition::Above
        }
        else
        {
            AxisPosition::Below
        }
    }

    ///
    /// Binary search for the interval holding `x`. The last interval is
    /// closed on the right so the upper node maps to `t = 1`.
    ///
    #[inline]
    pub fn locate(&self, x: f64) -> Location
    {
        let position = self.position(x);
        let n = self.nodes.len();
        if n == 1
        {
            return Location { interval: 0, t: x - self.nodes[0], position };
        }
        let count = self.nodes.partition_point(|&node| node <= x);
        let interval = count.saturating_sub(1).min(n - 2);
        let x0 = self.nodes[interval];
        let x1 = self.nodes[interval + 1];
        Location { interval, t: (x - x0) / (x1 - x0), position }
    }
}

impl TryFrom<Vec<f64>> for GridAxis
{
    type Error = InterpolationError;

    fn try_from(value: Vec<f64>) -> Result<Self> {
        GridAxis::new(value, 0)
    }
}

impl From<GridAxis> for Vec<f64>
{
    fn from(value: GridAxis) -> Self {
        value.nodes
    }
}

#[test]
fn check_axis_validation()
{
    assert_eq!(GridAxis::new(vec![], 2), Err(InterpolationError::EmptyAxis { axis: 2 }));
    assert_eq!(GridAxis::new(vec![0.0, 1.0, 1.0], 1), Err(InterpolationError::NotStrictlyIncreasing { axis: 1, index: 2 }));
    assert_eq!(GridAxis::new(vec![0.0, 2.0, 1.0], 0), Err(InterpolationError::NotStrictlyIncreasing { axis: 0, index: 2 }));
    assert_eq!(GridAxis::new(vec![0.0, f64::NAN], 0), Err(InterpolationError::NonFiniteCoordinate { axis: 0, index: 1 }));
    assert!(GridAxis::new(vec![3.0], 0).unwrap().is_degenerate());
    assert_eq!(GridAxis::new(vec![-1e308, 1e308], 3), Err(InterpolationError::UnboundedAxis { axis: 3 }));
    let wide = GridAxis::new(vec![-0.8e308, 0.8e308], 0).unwrap();
    assert_eq!(wide.locate(0.0).t, 0.5);
}

#[test]
fn check_locate_inside()
{
    let axis = GridAxis::new(vec![0.0, 1.0, 3.0, 7.0], 0).unwrap();
    let loc = axis.locate(2.0);
    assert_eq!(loc.interval, 1);
    assert!((loc.t - 0.5).abs() < 1e-15);
    assert_eq!(loc.position, AxisPosition::Inside);

    let loc = axis.locate(1.0);
    assert_eq!((loc.interval, loc.t), (1, 0.0));

    let loc = axis.locate(7.0);
    assert_eq!((loc.interval, loc.t), (2, 1.0));
    assert!(loc.position.is_inside());
}

#[test]
fn check_locate_outside()
{
    let axis = GridAxis::new(vec![0.0, 1.0, 3.0], 0).unwrap();
    let loc = axis.locate(-1.0);
    assert_eq!((loc.interval, loc.t, loc.position), (0, -1.0, AxisPosition::Below));

    let loc = axis.locate(5.0);
    assert_eq!((loc.interval, loc.t, loc.position), (1, 2.0, AxisPosition::Above));

    let loc = axis.locate(f64::NAN);
    assert_eq!(loc.position, AxisPosition::Below);
    assert!(loc.t.is_nan());
}

#[test]
fn check_locate_degenerate()
{
    let axis = GridAxis::new(vec![2.0], 0).unwrap();
    let loc = axis.locate(2.5);
    assert_eq!((loc.interval, loc.t, loc.position), (0, 0.5, AxisPosition::Above));
    assert!(axis.locate(2.0).position.is_inside());
    assert_eq!(axis.locate(1.0).position, AxisPosition::Below);
}
