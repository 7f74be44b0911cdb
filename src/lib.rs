//!
//! Interpolation of functions sampled on N-dimensional rectilinear grids.
//!
//! A grid is a list of strictly increasing axes. Values are an array whose
//! first N dimensions match the axis lengths; any trailing dimensions are a
//! batch of functions sharing the grid, and every query point returns one
//! value per batch entry. Available kernels are nearest neighbour,
//! multilinear, not-a-knot tensor-product splines of degree 1, 3 and 5, and
//! monotone cubic Hermite (pchip).
//!
//! ```
//! use ndarray::{array, Array2};
//! use rgrid::{Interpolator, Method};
//!
//! let x = vec![0.0, 1.0, 2.0, 3.0];
//! let y = vec![0.0, 1.0, 2.0, 3.0, 4.0];
//! let values = Array2::from_shape_fn((4, 5), |(i, j)| (i * i + j) as f64);
//! let interpolator = Interpolator::new(vec![x, y], values, Method::Cubic, true, Some(f64::NAN)).unwrap();
//! let out = interpolator.evaluate(&array![[1.5, 2.0], [0.25, 3.5]]).unwrap();
//! assert_eq!(out.shape(), &[2]);
//! assert!((out[[0]] - 4.25).abs() < 1e-12);
//! ```
//!
pub mod algorithms;
pub mod basis;
pub mod errors;
pub mod grids;
pub mod interpolator;
pub mod method;
pub mod serialization;
pub mod storage;
pub mod utilities;

pub use errors::{InterpolationError, Result};
pub use grids::axis::GridAxis;
pub use grids::rectilinear_grid::{IntoGrid, RectilinearGrid};
pub use interpolator::{interpolate, Interpolator, InterpolatorOptions};
pub use method::Method;
pub use storage::value_tensor::ValueTensor;
