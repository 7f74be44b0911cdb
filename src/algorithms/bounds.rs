use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSlice;

use crate::errors::{InterpolationError, Result};
use crate::grids::axis::GridAxis;
use crate::grids::rectilinear_grid::RectilinearGrid;

///
/// What to do with query points outside the closed span of the grid.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BoundsPolicy
{
    /// Fail the whole evaluation with [`InterpolationError::OutOfDomain`].
    Raise,
    /// Write the value into every batch slot of the point.
    Fill(f64),
    /// Let the kernel continue its boundary pieces.
    Extrapolate,
}

impl BoundsPolicy
{
    pub fn new(bounds_error: bool, fill_value: Option<f64>) -> Self
    {
        match (bounds_error, fill_value)
        {
            (true, _) => BoundsPolicy::Raise,
            (false, Some(value)) => BoundsPolicy::Fill(value),
            (false, None) => BoundsPolicy::Extrapolate,
        }
    }

    ///
    /// Under [`BoundsPolicy::Raise`], report the first point (in query order)
    /// with a coordinate outside its axis. `points` holds `ndim` coordinates
    /// per point.
    ///
    pub fn check(&self, grid: &RectilinearGrid, points: &[f64]) -> Result<()>
    {
        if *self != BoundsPolicy::Raise || points.is_empty()
        {
            return Ok(());
        }
        let violation = points.par_chunks(grid.ndim()).enumerate()
            .filter_map(|(point, x)| first_outside(grid, x).map(|(axis, coordinate)| (point, axis, coordinate)))
            .find_first(|_| true);
        match violation
        {
            Some((point, axis, coordinate)) => Err(InterpolationError::OutOfDomain { point, axis, coordinate }),
            None => Ok(()),
        }
    }

    /// Value for an out-of-domain point, if this policy overrides the kernel.
    #[inline]
    pub fn fill(&self, grid: &RectilinearGrid, x: &[f64]) -> Option<f64>
    {
        match self
        {
            BoundsPolicy::Fill(value) if grid.axes().iter().zip(x).any(|(axis, &c)| is_outside(axis, c)) => Some(*value),
            _ => None,
        }
    }
}

/// NaN coordinates are left to the kernels, which propagate them.
#[inline]
fn is_outside(axis: &GridAxis, c: f64) -> bool
{
    !c.is_nan() && !axis.position(c).is_inside()
}

fn first_outside(grid: &RectilinearGrid, x: &[f64]) -> Option<(usize, f64)>
{
    for (dim, (axis, &c)) in grid.axes().iter().zip(x).enumerate()
    {
        if is_outside(axis, c)
        {
            return Some((dim, c));
        }
    }
    None
}

#[test]
fn check_bounds_policy_selection()
{
    assert_eq!(BoundsPolicy::new(true, None), BoundsPolicy::Raise);
    assert_eq!(BoundsPolicy::new(true, Some(1.0)), BoundsPolicy::Raise);
    assert_eq!(BoundsPolicy::new(false, Some(-1.0)), BoundsPolicy::Fill(-1.0));
    assert_eq!(BoundsPolicy::new(false, None), BoundsPolicy::Extrapolate);
}

#[test]
fn check_raise_reports_first_violation()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![5.0]]).unwrap();
    let points = [0.5, 5.0, 1.0, 5.0, 1.0, 6.0, 3.0, 5.0];
    let err = BoundsPolicy::Raise.check(&grid, &points).unwrap_err();
    assert_eq!(err, InterpolationError::OutOfDomain { point: 2, axis: 1, coordinate: 6.0 });
    assert!(BoundsPolicy::Extrapolate.check(&grid, &points).is_ok());
    assert!(BoundsPolicy::Raise.check(&grid, &points[..4]).is_ok());
}

#[test]
fn check_nan_coordinates_are_not_out_of_domain()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![5.0]]).unwrap();
    assert!(BoundsPolicy::Raise.check(&grid, &[f64::NAN, 5.0, 1.0, f64::NAN]).is_ok());
    let policy = BoundsPolicy::Fill(-101.0);
    assert_eq!(policy.fill(&grid, &[f64::NAN, 5.0]), None);
    // a real violation on another axis still fills
    assert_eq!(policy.fill(&grid, &[f64::NAN, 6.0]), Some(-101.0));
}

#[test]
fn check_fill_only_outside()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0]]).unwrap();
    let policy = BoundsPolicy::Fill(-7.0);
    assert_eq!(policy.fill(&grid, &[0.5]), None);
    assert_eq!(policy.fill(&grid, &[1.5]), Some(-7.0));
    assert_eq!(policy.fill(&grid, &[f64::NAN]), None);
    assert_eq!(BoundsPolicy::Extrapolate.fill(&grid, &[1.5]), None);
}
