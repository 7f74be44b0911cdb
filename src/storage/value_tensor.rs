use ndarray::{ArrayD, IxDyn};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::errors::{InterpolationError, Result};
use crate::grids::rectilinear_grid::RectilinearGrid;

///
/// Sampled values on a grid. The leading `grid_ndim` dimensions follow the
/// grid axes; any trailing dimensions form the batch shape, i.e. several
/// functions sampled on the same nodes. Data is kept in standard (row-major)
/// layout so that every node owns a contiguous run of `batch_len` values.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTensor
{
    data: ArrayD<f64>,
    grid_ndim: usize,
    /// Element stride of each grid dimension in the flat data.
    strides: Vec<usize>,
}

impl ValueTensor
{
    ///
    /// Check `values` against `grid` and take ownership.
    ///
    pub fn new(values: ArrayD<f64>, grid: &RectilinearGrid) -> Result<Self>
    {
        let ndim = grid.ndim();
        if values.ndim() < ndim
        {
            return Err(InterpolationError::DimensionMismatch { expected: ndim, actual: values.ndim() });
        }
        for (axis, (&expected, &actual)) in grid.shape().iter().zip(values.shape()).enumerate()
        {
            if expected != actual
            {
                return Err(InterpolationError::ShapeMismatch { axis, expected, actual });
            }
        }
        let data = if values.is_standard_layout() { values } else { values.as_standard_layout().into_owned() };
        Ok(Self::from_standard(data, ndim))
    }

    fn from_standard(data: ArrayD<f64>, grid_ndim: usize) -> Self
    {
        let shape = data.shape();
        let mut strides = vec![0; grid_ndim];
        let mut stride: usize = shape[grid_ndim..].iter().product();
        for d in (0..grid_ndim).rev()
        {
            strides[d] = stride;
            stride *= shape[d];
        }
        Self { data, grid_ndim, strides }
    }

    ///
    /// Build values by evaluating `eval_fun` at every grid node.
    /// `eval_fun` must return `batch_shape.iter().product()` values.
    ///
    pub fn from_fn(grid: &RectilinearGrid, batch_shape: &[usize], eval_fun: &mut dyn FnMut(&[f64]) -> Vec<f64>) -> Result<Self>
    {
        let batch_len: usize = batch_shape.iter().product();
        let mut data = Vec::with_capacity(grid.len() * batch_len);
        for point in grid.points()
        {
            let value = eval_fun(&point);
            if value.len() != batch_len
            {
                return Err(InterpolationError::ShapeMismatch { axis: grid.ndim(), expected: batch_len, actual: value.len() });
            }
            data.extend(value);
        }
        Self::assemble(grid, batch_shape, data)
    }

    ///
    /// Same as [`ValueTensor::from_fn`] but evaluates the nodes in parallel.
    ///
    pub fn from_fn_parallel<EF: Fn(&[f64]) -> Vec<f64> + Send + Sync>(grid: &RectilinearGrid, batch_shape: &[usize], eval_fun: &EF) -> Result<Self>
    {
        let batch_len: usize = batch_shape.iter().product();
        let mut data = vec![0.0; grid.len() * batch_len];
        if batch_len > 0
        {
            let points: Vec<Vec<f64>> = grid.points().collect();
            let mismatch = points.into_par_iter().zip(data.par_chunks_mut(batch_len)).map(
            |(point, slot)|
            {
                let value = eval_fun(&point);
                if value.len() == batch_len
                {
                    slot.copy_from_slice(&value);
                    None
                }
                else
                {
                    Some(value.len())
                }
            }).find_any(Option::is_some).flatten();
            if let Some(actual) = mismatch
            {
                return Err(InterpolationError::ShapeMismatch { axis: grid.ndim(), expected: batch_len, actual });
            }
        }
        Self::assemble(grid, batch_shape, data)
    }

    fn assemble(grid: &RectilinearGrid, batch_shape: &[usize], data: Vec<f64>) -> Result<Self>
    {
        let mut shape = grid.shape();
        shape.extend_from_slice(batch_shape);
        let data = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map_err(|e| InterpolationError::InvalidShape(e.to_string()))?;
        Ok(Self::from_standard(data, grid.ndim()))
    }

    ///
    /// Replace the data with a tensor of identical shape (used for spline
    /// coefficients, which share the layout of the values they come from).
    ///
    pub(crate) fn with_data(&self, data: Vec<f64>) -> Self
    {
        debug_assert_eq!(data.len(), self.data.len());
        let data = ArrayD::from_shape_vec(self.data.raw_dim(), data).expect("data length matches the tensor shape");
        Self::from_standard(data, self.grid_ndim)
    }

    #[inline]
    pub fn array(&self) -> &ArrayD<f64>
    {
        &self.data
    }

    pub fn into_array(self) -> ArrayD<f64>
    {
        self.data
    }

    #[inline]
    pub fn grid_ndim(&self) -> usize
    {
        self.grid_ndim
    }

    #[inline]
    pub fn grid_shape(&self) -> &[usize]
    {
        &self.data.shape()[..self.grid_ndim]
    }

    #[inline]
    pub fn batch_shape(&self) -> &[usize]
    {
        &self.data.shape()[self.grid_ndim..]
    }

    /// Number of values stored per grid node.
    #[inline]
    pub fn batch_len(&self) -> usize
    {
        self.batch_shape().iter().product()
    }

    #[inline]
    pub fn strides(&self) -> &[usize]
    {
        &self.strides
    }

    #[inline]
    pub fn flat(&self) -> &[f64]
    {
        self.data.as_slice().expect("value tensor is stored in standard layout")
    }

    /// Values stored at the node with multi-index `index`.
    pub fn node_values(&self, index: &[usize]) -> &[f64]
    {
        let offset: usize = index.iter().zip(&self.strides).map(|(i, s)| i * s).sum();
        &self.flat()[offset..offset + self.batch_len()]
    }

    ///
    /// Copy the block `[start_d, start_d + len_d)` of every grid dimension into
    /// `block` in row-major order. `block` ends up with `prod(len_d) * batch_len`
    /// values, the batch running fastest. `offsets` is a work buffer.
    ///
    pub fn gather(&self, windows: &[(usize, usize)], offsets: &mut Vec<usize>, block: &mut Vec<f64>)
    {
        let batch_len = self.batch_len();
        let flat = self.flat();
        let count: usize = windows.iter().map(|w| w.1).product();
        block.clear();
        block.reserve(count * batch_len);
        offsets.clear();
        offsets.resize(windows.len(), 0);
        for _ in 0..count
        {
            let base: usize = windows.iter().zip(offsets.iter()).zip(&self.strides)
                .map(|((w, k), s)| (w.0 + k) * s)
                .sum();
            block.extend_from_slice(&flat[base..base + batch_len]);
            for d in (0..windows.len()).rev()
            {
                offsets[d] += 1;
                if offsets[d] < windows[d].1
                {
                    break;
                }
                offsets[d] = 0;
            }
        }
    }
}

#[test]
fn check_value_tensor_shapes()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0]]).unwrap();
    let values = ArrayD::from_shape_vec(IxDyn(&[3, 2, 4]), (0..24).map(f64::from).collect()).unwrap();
    let tensor = ValueTensor::new(values, &grid).unwrap();
    assert_eq!(tensor.grid_shape(), &[3, 2]);
    assert_eq!(tensor.batch_shape(), &[4]);
    assert_eq!(tensor.batch_len(), 4);
    assert_eq!(tensor.strides(), &[8, 4]);
    assert_eq!(tensor.node_values(&[2, 1]), &[20.0, 21.0, 22.0, 23.0]);
}

#[test]
fn check_value_tensor_mismatch()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0]]).unwrap();
    let values = ArrayD::zeros(IxDyn(&[3]));
    assert_eq!(ValueTensor::new(values, &grid), Err(InterpolationError::DimensionMismatch { expected: 2, actual: 1 }));
    let values = ArrayD::zeros(IxDyn(&[3, 3]));
    assert_eq!(ValueTensor::new(values, &grid), Err(InterpolationError::ShapeMismatch { axis: 1, expected: 2, actual: 3 }));
}

#[test]
fn check_value_tensor_non_standard_layout()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0], vec![0.0, 1.0, 2.0]]).unwrap();
    let values = ArrayD::from_shape_vec(IxDyn(&[3, 2]), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let transposed = values.reversed_axes();
    let tensor = ValueTensor::new(transposed, &grid).unwrap();
    assert_eq!(tensor.flat(), &[0.0, 2.0, 4.0, 1.0, 3.0, 5.0]);
}

#[test]
fn check_gather_block()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]]).unwrap();
    let tensor = ValueTensor::from_fn(&grid, &[2], &mut |x| vec![10.0 * x[0] + x[1], -x[1]]).unwrap();
    let mut offsets = vec![7, 7, 7];
    let mut block = vec![1.0; 3];
    tensor.gather(&[(1, 2), (0, 2)], &mut offsets, &mut block);
    assert_eq!(block, vec![10.0, 0.0, 11.0, -1.0, 20.0, 0.0, 21.0, -1.0]);
    // buffers are reset between calls
    tensor.gather(&[(2, 1), (1, 2)], &mut offsets, &mut block);
    assert_eq!(block, vec![21.0, -1.0, 22.0, -2.0]);
}

#[test]
fn check_from_fn_parallel_matches_serial()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 0.5, 2.0], vec![1.0, 3.0], vec![-1.0, 0.0, 1.0, 2.0]]).unwrap();
    let f = |x: &[f64]| vec![x[0] * x[1] + x[2], x[2] * x[2]];
    let serial = ValueTensor::from_fn(&grid, &[2], &mut |x| f(x)).unwrap();
    let parallel = ValueTensor::from_fn_parallel(&grid, &[2], &f).unwrap();
    assert_eq!(serial, parallel);
    assert!(ValueTensor::from_fn(&grid, &[3], &mut |x| f(x)).is_err());
}
