use serde::{Deserialize, Serialize};

use crate::errors::{InterpolationError, Result};
use crate::method::Method;

use super::axis::GridAxis;

///
/// Cartesian product of `ndim` independent axes. Nodes are enumerated in
/// row-major order (the last axis varies fastest), matching the layout of
/// the leading dimensions of a [`ValueTensor`](crate::storage::value_tensor::ValueTensor).
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct RectilinearGrid
{
    axes: Vec<GridAxis>,
}

impl RectilinearGrid
{
    pub fn new(axes: Vec<Vec<f64>>) -> Result<Self>
    {
        if axes.is_empty()
        {
            return Err(InterpolationError::EmptyGrid);
        }
        let axes = axes.into_iter().enumerate()
            .map(|(axis, nodes)| GridAxis::new(nodes, axis))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { axes })
    }

    pub fn from_axes(axes: Vec<GridAxis>) -> Result<Self>
    {
        if axes.is_empty()
        {
            return Err(InterpolationError::EmptyGrid);
        }
        Ok(Self { axes })
    }

    #[inline]
    pub fn ndim(&self) -> usize
    {
        self.axes.len()
    }

    #[inline]
    pub fn axis(&self, dim: usize) -> &GridAxis
    {
        &self.axes[dim]
    }

    #[inline]
    pub fn axes(&self) -> &[GridAxis]
    {
        &self.axes
    }

    /// Number of nodes along each axis.
    pub fn shape(&self) -> Vec<usize>
    {
        self.axes.iter().map(GridAxis::len).collect()
    }

    /// Total number of lattice nodes.
    pub fn len(&self) -> usize
    {
        self.axes.iter().map(GridAxis::len).product()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Check that `point` lies inside the closed span of every axis.
    pub fn contains(&self, point: &[f64]) -> bool
    {
        self.axes.iter().zip(point).all(|(axis, &x)| axis.position(x).is_inside())
    }

    ///
    /// Reject `method` if any axis has fewer nodes than it needs.
    ///
    pub fn check_method(&self, method: Method) -> Result<()>
    {
        let required = method.min_points();
        for (axis, grid_axis) in self.axes.iter().enumerate()
        {
            if grid_axis.len() < required
            {
                return Err(InterpolationError::InsufficientPoints { axis, method, required, actual: grid_axis.len() });
            }
        }
        Ok(())
    }

    /// Coordinates of the node with the given row-major multi-index.
    pub fn node(&self, index: &[usize]) -> Vec<f64>
    {
        self.axes.iter().zip(index).map(|(axis, &i)| axis.nodes()[i]).collect()
    }

    /// Iterate over all nodes in row-major order.
    pub fn points(&self) -> PointIterator<'_>
    {
        PointIterator { grid: self, index: vec![0; self.ndim()], remaining: self.len() }
    }
}

impl TryFrom<Vec<Vec<f64>>> for RectilinearGrid
{
    type Error = InterpolationError;

    fn try_from(value: Vec<Vec<f64>>) -> Result<Self> {
        RectilinearGrid::new(value)
    }
}

impl From<RectilinearGrid> for Vec<Vec<f64>>
{
    fn from(value: RectilinearGrid) -> Self {
        value.axes.into_iter().map(Vec::from).collect()
    }
}

///
/// Anything that can be validated into a [`RectilinearGrid`].
///
pub trait IntoGrid
{
    fn into_grid(self) -> Result<RectilinearGrid>;
}

impl IntoGrid for RectilinearGrid
{
    fn into_grid(self) -> Result<RectilinearGrid>
    {
        Ok(self)
    }
}

impl IntoGrid for Vec<Vec<f64>>
{
    fn into_grid(self) -> Result<RectilinearGrid>
    {
        RectilinearGrid::new(self)
    }
}

impl IntoGrid for Vec<GridAxis>
{
    fn into_grid(self) -> Result<RectilinearGrid>
    {
        RectilinearGrid::from_axes(self)
    }
}

impl IntoGrid for &[Vec<f64>]
{
    fn into_grid(self) -> Result<RectilinearGrid>
    {
        RectilinearGrid::new(self.to_vec())
    }
}

///
/// Row-major walk over the nodes of a [`RectilinearGrid`].
///
pub struct PointIterator<'a>
{
    grid: &'a RectilinearGrid,
    index: Vec<usize>,
    remaining: usize,
}

impl Iterator for PointIterator<'_>
{
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0
        {
            return None;
        }
        let point = self.grid.node(&self.index);
        self.remaining -= 1;
        for d in (0..self.index.len()).rev()
        {
            self.index[d] += 1;
            if self.index[d] < self.grid.axis(d).len()
            {
                break;
            }
            self.index[d] = 0;
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PointIterator<'_> {}

#[test]
fn check_grid_shape()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![0.0, 0.5]]).unwrap();
    assert_eq!(grid.ndim(), 2);
    assert_eq!(grid.shape(), vec![3, 2]);
    assert_eq!(grid.len(), 6);
    assert!(grid.contains(&[2.0, 0.25]));
    assert!(!grid.contains(&[2.1, 0.25]));
}

#[test]
fn check_grid_points_row_major()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0], vec![10.0, 20.0, 30.0]]).unwrap();
    let points: Vec<Vec<f64>> = grid.points().collect();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0], vec![0.0, 10.0]);
    assert_eq!(points[1], vec![0.0, 20.0]);
    assert_eq!(points[3], vec![1.0, 10.0]);
    assert_eq!(points[5], vec![1.0, 30.0]);
}

#[test]
fn check_grid_validation()
{
    assert_eq!(RectilinearGrid::new(vec![]), Err(InterpolationError::EmptyGrid));
    let err = RectilinearGrid::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap_err();
    assert_eq!(err, InterpolationError::NotStrictlyIncreasing { axis: 1, index: 1 });

    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0]]).unwrap();
    assert!(grid.check_method(Method::Pchip).is_err());
    assert!(grid.check_method(Method::Slinear).is_ok());
    assert_eq!(grid.check_method(Method::Cubic),
        Err(InterpolationError::InsufficientPoints { axis: 1, method: Method::Cubic, required: 4, actual: 3 }));
}
