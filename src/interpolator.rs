use std::sync::OnceLock;

use ndarray::{Array, ArrayBase, ArrayD, Data, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::algorithms::bounds::BoundsPolicy;
use crate::algorithms::evaluation::evaluate_points;
use crate::basis::kernel::Kernel;
use crate::errors::{InterpolationError, Result};
use crate::grids::rectilinear_grid::{IntoGrid, RectilinearGrid};
use crate::method::Method;
use crate::storage::value_tensor::ValueTensor;

///
/// Construction settings of an [`Interpolator`].
///
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpolatorOptions
{
    pub method: Method,
    /// Fail evaluations that contain a point outside the grid.
    pub bounds_error: bool,
    /// Value used for out-of-domain points when `bounds_error` is off.
    /// `None` extrapolates with the kernel.
    pub fill_value: Option<f64>,
}

impl Default for InterpolatorOptions
{
    fn default() -> Self {
        Self { method: Method::Linear, bounds_error: true, fill_value: Some(f64::NAN) }
    }
}

///
/// Interpolator over a rectilinear grid of arbitrary dimension.
///
/// Values carry the grid axes first and any number of trailing batch
/// dimensions: values of shape `(m_0, .., m_{N-1}, b_0, .., b_k)` describe
/// `b_0 * .. * b_k` functions sampled on the same grid, and every query point
/// yields a block of shape `(b_0, .., b_k)`. A query array of shape
/// `(q_0, .., q_j, N)` produces an output of shape `(q_0, .., q_j, b_0, .., b_k)`.
///
/// Spline coefficients are computed when the method, grid or values change,
/// so evaluation with the configured method never mutates the interpolator.
/// Kernels built for per-call method overrides are cached until the next
/// rebinding.
///
#[derive(Clone, Debug)]
pub struct Interpolator
{
    grid: RectilinearGrid,
    values: ValueTensor,
    options: InterpolatorOptions,
    kernel: Kernel,
    /// Override kernels, indexed by [`Method::index`].
    overrides: [OnceLock<Kernel>; Method::ALL.len()],
}

impl Interpolator
{
    pub fn new<G: IntoGrid, D: Dimension>(grid: G, values: Array<f64, D>, method: Method, bounds_error: bool, fill_value: Option<f64>) -> Result<Self>
    {
        Self::with_options(grid, values, InterpolatorOptions { method, bounds_error, fill_value })
    }

    pub fn with_options<G: IntoGrid, D: Dimension>(grid: G, values: Array<f64, D>, options: InterpolatorOptions) -> Result<Self>
    {
        let grid = grid.into_grid()?;
        let values = ValueTensor::new(values.into_dyn(), &grid)?;
        let kernel = Kernel::build(options.method, &grid, &values)?;
        debug!(ndim = grid.ndim(), shape = ?grid.shape(), batch = ?values.batch_shape(), method = %options.method, "constructed interpolator");
        Ok(Self { grid, values, options, kernel, overrides: Default::default() })
    }

    #[inline]
    pub fn grid(&self) -> &RectilinearGrid
    {
        &self.grid
    }

    #[inline]
    pub fn values(&self) -> &ValueTensor
    {
        &self.values
    }

    #[inline]
    pub fn method(&self) -> Method
    {
        self.options.method
    }

    #[inline]
    pub fn bounds_error(&self) -> bool
    {
        self.options.bounds_error
    }

    #[inline]
    pub fn fill_value(&self) -> Option<f64>
    {
        self.options.fill_value
    }

    #[inline]
    pub fn options(&self) -> InterpolatorOptions
    {
        self.options
    }

    #[inline]
    pub fn ndim(&self) -> usize
    {
        self.grid.ndim()
    }

    #[inline]
    pub fn batch_shape(&self) -> &[usize]
    {
        self.values.batch_shape()
    }

    pub fn set_fill_value(&mut self, fill_value: Option<f64>)
    {
        self.options.fill_value = fill_value;
    }

    pub fn set_bounds_error(&mut self, bounds_error: bool)
    {
        self.options.bounds_error = bounds_error;
    }

    ///
    /// Switch the method. The interpolator is unchanged if the grid has too few
    /// nodes for `method`.
    ///
    pub fn set_method(&mut self, method: Method) -> Result<()>
    {
        if method == self.options.method
        {
            return Ok(());
        }
        let kernel = match self.overrides[method.index()].take()
        {
            Some(kernel) => kernel,
            None => Kernel::build(method, &self.grid, &self.values)?,
        };
        self.kernel = kernel;
        self.options.method = method;
        debug!(%method, "changed interpolation method");
        Ok(())
    }

    /// Replace the grid, keeping the current values.
    pub fn set_grid<G: IntoGrid>(&mut self, grid: G) -> Result<()>
    {
        let values = self.values.array().clone();
        self.rebind(grid, values)
    }

    /// Replace the values, keeping the current grid.
    pub fn set_values<D: Dimension>(&mut self, values: Array<f64, D>) -> Result<()>
    {
        let grid = self.grid.clone();
        self.rebind(grid, values)
    }

    ///
    /// Replace grid and values together. Everything is validated before any
    /// state changes; on error the interpolator keeps its previous binding.
    ///
    pub fn rebind<G: IntoGrid, D: Dimension>(&mut self, grid: G, values: Array<f64, D>) -> Result<()>
    {
        let grid = grid.into_grid()?;
        let values = ValueTensor::new(values.into_dyn(), &grid)?;
        let kernel = Kernel::build(self.options.method, &grid, &values)?;
        debug!(ndim = grid.ndim(), shape = ?grid.shape(), batch = ?values.batch_shape(), "rebound interpolator");
        self.grid = grid;
        self.values = values;
        self.kernel = kernel;
        self.overrides = Default::default();
        Ok(())
    }

    pub fn evaluate<S: Data<Elem = f64>, D: Dimension>(&self, points: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    {
        self.evaluate_with(points, None)
    }

    ///
    /// Evaluate at `points`, optionally with a different method for this call
    /// only. An override is checked against the grid like a constructor
    /// method would be. The first call with a spline override solves for its
    /// coefficients; later calls reuse them until the grid or values change.
    ///
    pub fn evaluate_with<S: Data<Elem = f64>, D: Dimension>(&self, points: &ArrayBase<S, D>, method: Option<Method>) -> Result<ArrayD<f64>>
    {
        let leading = self.query_shape(points.shape())?;
        let coordinates: Vec<f64> = points.iter().copied().collect();
        let results = match method
        {
            Some(method) if method != self.options.method =>
            {
                let kernel = self.override_kernel(method)?;
                self.evaluate_flat(kernel, &coordinates)?
            },
            _ => self.evaluate_flat(&self.kernel, &coordinates)?,
        };
        let mut shape = leading;
        shape.extend_from_slice(self.batch_shape());
        ArrayD::from_shape_vec(IxDyn(&shape), results).map_err(|e| InterpolationError::InvalidShape(e.to_string()))
    }

    ///
    /// Interpolate a single point, returning its batch values flattened in
    /// row-major order.
    ///
    pub fn interpolate_point(&self, x: &[f64]) -> Result<Vec<f64>>
    {
        if x.len() != self.ndim()
        {
            return Err(InterpolationError::QueryShape { shape: vec![x.len()], ndim: self.ndim() });
        }
        self.evaluate_flat(&self.kernel, x)
    }

    fn override_kernel(&self, method: Method) -> Result<&Kernel>
    {
        let slot = &self.overrides[method.index()];
        if let Some(kernel) = slot.get()
        {
            return Ok(kernel);
        }
        let kernel = Kernel::build(method, &self.grid, &self.values)?;
        debug!(%method, "cached kernel for method override");
        Ok(slot.get_or_init(|| kernel))
    }

    fn evaluate_flat(&self, kernel: &Kernel, coordinates: &[f64]) -> Result<Vec<f64>>
    {
        let policy = BoundsPolicy::new(self.options.bounds_error, self.options.fill_value);
        trace!(points = coordinates.len() / self.ndim(), method = %kernel.method(), ?policy, "evaluating");
        evaluate_points(kernel, &self.grid, &self.values, policy, coordinates)
    }

    ///
    /// Leading (point) shape of a query array. Single-axis grids read a 1-D
    /// array as a list of scalar points; other grids read it as one point.
    ///
    fn query_shape(&self, shape: &[usize]) -> Result<Vec<usize>>
    {
        let ndim = self.ndim();
        let error = || InterpolationError::QueryShape { shape: shape.to_vec(), ndim };
        match shape
        {
            [] if ndim == 1 => Ok(vec![]),
            [] => Err(error()),
            [m] if ndim == 1 => Ok(vec![*m]),
            [n] if *n == ndim => Ok(vec![1]),
            [.., last] if shape.len() > 1 && *last == ndim => Ok(shape[..shape.len() - 1].to_vec()),
            _ => Err(error()),
        }
    }
}

///
/// Build an interpolator with default bounds handling and evaluate it once.
///
pub fn interpolate<G: IntoGrid, D: Dimension, S: Data<Elem = f64>, DQ: Dimension>(grid: G, values: Array<f64, D>, points: &ArrayBase<S, DQ>, method: Method) -> Result<ArrayD<f64>>
{
    let options = InterpolatorOptions { method, ..Default::default() };
    Interpolator::with_options(grid, values, options)?.evaluate(points)
}

#[cfg(test)]
fn plane() -> Interpolator
{
    use ndarray::Array2;
    let values = Array2::from_shape_fn((3, 4), |(i, j)| i as f64 + 2.0 * j as f64);
    Interpolator::new(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0]], values, Method::Linear, true, Some(f64::NAN)).unwrap()
}

#[test]
fn check_query_shapes()
{
    use ndarray::{arr1, Array3};
    let interpolator = plane();
    let out = interpolator.evaluate(&arr1(&[0.5, 0.5])).unwrap();
    assert_eq!(out.shape(), &[1]);
    assert!((out[[0]] - 1.5).abs() < 1e-12);

    let points = Array3::from_elem((2, 3, 2), 1.0);
    assert_eq!(interpolator.evaluate(&points).unwrap().shape(), &[2, 3]);

    let err = interpolator.evaluate(&arr1(&[0.5, 0.5, 0.5])).unwrap_err();
    assert_eq!(err, InterpolationError::QueryShape { shape: vec![3], ndim: 2 });
    assert!(interpolator.interpolate_point(&[0.5]).is_err());
}

#[test]
fn check_failed_rebind_keeps_state()
{
    use ndarray::Array2;
    let mut interpolator = plane();
    let before = interpolator.interpolate_point(&[1.5, 2.5]).unwrap();
    assert!(interpolator.set_values(Array2::<f64>::zeros((3, 5))).is_err());
    assert!(interpolator.set_grid(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 1.0, 3.0]]).is_err());
    assert!(interpolator.set_method(Method::Cubic).is_err());
    assert_eq!(interpolator.method(), Method::Linear);
    assert_eq!(interpolator.interpolate_point(&[1.5, 2.5]).unwrap(), before);
}

#[test]
fn check_options_round_trip()
{
    let mut interpolator = plane();
    interpolator.set_bounds_error(false);
    interpolator.set_fill_value(None);
    let options = interpolator.options();
    assert_eq!(options.method, Method::Linear);
    assert!(!options.bounds_error);
    assert_eq!(options.fill_value, None);
    assert!(InterpolatorOptions::default().fill_value.is_some_and(f64::is_nan));
}

#[test]
fn check_override_kernels_are_cached()
{
    use ndarray::{array, Array2};
    let mut interpolator = plane();
    let values = Array2::from_shape_fn((4, 4), |(i, j)| (i * i * i) as f64 + j as f64);
    interpolator.rebind(vec![vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0, 3.0]], values).unwrap();
    let points = array![[1.5, 0.5]];
    let first = interpolator.evaluate_with(&points, Some(Method::Cubic)).unwrap();
    assert!(interpolator.overrides[Method::Cubic.index()].get().is_some());
    assert!(interpolator.overrides[Method::Quintic.index()].get().is_none());
    let second = interpolator.evaluate_with(&points, Some(Method::Cubic)).unwrap();
    assert_eq!(first, second);
    assert!((first[[0]] - 3.875).abs() < 1e-10);

    // switching to a cached method moves the kernel over
    interpolator.set_method(Method::Cubic).unwrap();
    assert!(interpolator.overrides[Method::Cubic.index()].get().is_none());
    assert_eq!(interpolator.evaluate(&points).unwrap(), first);

    interpolator.evaluate_with(&points, Some(Method::Pchip)).unwrap();
    interpolator.set_values(Array2::from_elem((4, 4), 2.0)).unwrap();
    assert!(interpolator.overrides.iter().all(|slot| slot.get().is_none()));
    assert!((interpolator.evaluate_with(&points, Some(Method::Pchip)).unwrap()[[0]] - 2.0).abs() < 1e-12);
}
