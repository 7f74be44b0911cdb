use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::{ParallelSlice, ParallelSliceMut};

use crate::basis::base::{AxisKernel, AxisStencil};
use crate::basis::kernel::Kernel;
use crate::errors::Result;
use crate::grids::rectilinear_grid::RectilinearGrid;
use crate::storage::value_tensor::ValueTensor;

use super::bounds::BoundsPolicy;

///
/// Per-thread buffers reused across the points a worker evaluates.
///
struct Scratch<S>
{
    stencils: Vec<S>,
    windows: Vec<(usize, usize)>,
    offsets: Vec<usize>,
    block: Vec<f64>,
    reduced: Vec<f64>,
    fibre: Vec<f64>,
}

impl<S> Scratch<S>
{
    fn new(ndim: usize) -> Self
    {
        Self
        {
            stencils: Vec::with_capacity(ndim),
            windows: Vec::with_capacity(ndim),
            offsets: Vec::with_capacity(ndim),
            block: Vec::new(),
            reduced: Vec::new(),
            fibre: Vec::new(),
        }
    }
}

pub(crate) struct InterpolationOperation<'a, K: AxisKernel>
{
    pub grid: &'a RectilinearGrid,
    /// Tensor the kernel weights apply to (values or spline coefficients).
    pub source: &'a ValueTensor,
    pub kernel: &'a K,
    pub policy: BoundsPolicy,
}

impl<K: AxisKernel> InterpolationOperation<'_, K>
{
    ///
    /// Interpolate every batch slot at `x` into `result`.
    ///
    /// The contributing block of the source tensor is gathered once and then
    /// contracted one axis at a time, last axis first, so each step turns a
    /// block of shape `[w_0, .., w_d, B]` into `[w_0, .., w_{d-1}, B]`.
    ///
    #[inline]
    fn interpolate(&self, x: &[f64], scratch: &mut Scratch<K::Stencil>, result: &mut [f64])
    {
        if let Some(value) = self.policy.fill(self.grid, x)
        {
            result.fill(value);
            return;
        }
        scratch.stencils.clear();
        scratch.windows.clear();
        for (dim, (axis, &c)) in self.grid.axes().iter().zip(x).enumerate()
        {
            let stencil = self.kernel.stencil(dim, axis, c, &axis.locate(c));
            scratch.windows.push(stencil.window());
            scratch.stencils.push(stencil);
        }
        self.source.gather(&scratch.windows, &mut scratch.offsets, &mut scratch.block);

        let batch_len = result.len();
        for (stencil, &(_, width)) in scratch.stencils.iter().zip(&scratch.windows).rev()
        {
            let chunk = width * batch_len;
            scratch.reduced.clear();
            for block in scratch.block.chunks_exact(chunk)
            {
                for b in 0..batch_len
                {
                    scratch.fibre.clear();
                    scratch.fibre.extend((0..width).map(|k| block[k * batch_len + b]));
                    scratch.reduced.push(stencil.collapse(&scratch.fibre));
                }
            }
            std::mem::swap(&mut scratch.block, &mut scratch.reduced);
        }
        result.copy_from_slice(&scratch.block);
    }

    fn interpolate_batch(&self, points: &[f64], results: &mut [f64])
    {
        let ndim = self.grid.ndim();
        let batch_len = self.source.batch_len();
        points.par_chunks(ndim).zip(results.par_chunks_mut(batch_len)).for_each_init(
            || Scratch::new(ndim),
            |scratch, (x, y)|
            {
                self.interpolate(x, scratch, y);
            }
        );
    }
}

///
/// Evaluate `kernel` at every point of `points` (`ndim` coordinates per point)
/// and return `batch_len` values per point, points in query order.
///
pub fn evaluate_points(kernel: &Kernel, grid: &RectilinearGrid, values: &ValueTensor, policy: BoundsPolicy, points: &[f64]) -> Result<Vec<f64>>
{
    debug_assert_eq!(points.len() % grid.ndim(), 0);
    policy.check(grid, points)?;
    let batch_len = values.batch_len();
    let mut results = vec![0.0; points.len() / grid.ndim() * batch_len];
    if results.is_empty()
    {
        return Ok(results);
    }
    let source = kernel.source(values);
    match kernel
    {
        Kernel::Nearest(k) => InterpolationOperation { grid, source, kernel: k, policy }.interpolate_batch(points, &mut results),
        Kernel::Linear(k) => InterpolationOperation { grid, source, kernel: k, policy }.interpolate_batch(points, &mut results),
        Kernel::Spline(k) => InterpolationOperation { grid, source, kernel: k, policy }.interpolate_batch(points, &mut results),
        Kernel::Pchip(k) => InterpolationOperation { grid, source, kernel: k, policy }.interpolate_batch(points, &mut results),
    }
    Ok(results)
}

#[cfg(test)]
fn bilinear_setup() -> (RectilinearGrid, ValueTensor)
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0]]).unwrap();
    let values = ValueTensor::from_fn(&grid, &[2], &mut |x| vec![x[0] + 10.0 * x[1], x[0] * x[1]]).unwrap();
    (grid, values)
}

#[test]
fn check_linear_evaluation_with_batch()
{
    use crate::basis::linear::LinearKernel;
    let (grid, values) = bilinear_setup();
    let kernel = Kernel::Linear(LinearKernel);
    let points = [0.5, 1.0, 2.0, 0.5, 3.0, 2.0];
    let results = evaluate_points(&kernel, &grid, &values, BoundsPolicy::Raise, &points).unwrap();
    let expected = [10.5, 0.5, 7.0, 1.0, 23.0, 6.0];
    for (r, e) in results.iter().zip(expected)
    {
        assert!((r - e).abs() < 1e-12, "{r} vs {e}");
    }
}

#[test]
fn check_fill_and_extrapolation()
{
    use crate::basis::linear::LinearKernel;
    let (grid, values) = bilinear_setup();
    let kernel = Kernel::Linear(LinearKernel);
    let points = [4.0, 1.0];
    let filled = evaluate_points(&kernel, &grid, &values, BoundsPolicy::Fill(-1.0), &points).unwrap();
    assert_eq!(filled, vec![-1.0, -1.0]);
    let extrapolated = evaluate_points(&kernel, &grid, &values, BoundsPolicy::Extrapolate, &points).unwrap();
    assert!((extrapolated[0] - 14.0).abs() < 1e-12);
    assert!((extrapolated[1] - 4.0).abs() < 1e-12);
    assert!(evaluate_points(&kernel, &grid, &values, BoundsPolicy::Raise, &points).unwrap_err().is_domain());
}

#[test]
fn check_empty_queries()
{
    use crate::basis::nearest::NearestKernel;
    let (grid, values) = bilinear_setup();
    let results = evaluate_points(&Kernel::Nearest(NearestKernel), &grid, &values, BoundsPolicy::Raise, &[]).unwrap();
    assert!(results.is_empty());
}
