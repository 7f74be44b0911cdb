use tracing::debug;

use crate::algorithms::coefficients::spline_kernel;
use crate::errors::Result;
use crate::grids::rectilinear_grid::RectilinearGrid;
use crate::method::Method;
use crate::storage::value_tensor::ValueTensor;

use super::bspline::SplineKernel;
use super::linear::LinearKernel;
use super::nearest::NearestKernel;
use super::pchip::PchipKernel;

///
/// Interpolation kernel selected for an interpolator, with any state it
/// precomputes from the grid and values (spline coefficients).
///
#[derive(Clone, Debug)]
pub enum Kernel
{
    Nearest(NearestKernel),
    Linear(LinearKernel),
    Spline(SplineKernel),
    Pchip(PchipKernel),
}

impl Kernel
{
    ///
    /// Check `method` against the grid and build its kernel.
    ///
    pub fn build(method: Method, grid: &RectilinearGrid, values: &ValueTensor) -> Result<Self>
    {
        grid.check_method(method)?;
        let kernel = match method
        {
            Method::Nearest => Kernel::Nearest(NearestKernel),
            Method::Linear => Kernel::Linear(LinearKernel),
            Method::Pchip => Kernel::Pchip(PchipKernel),
            Method::Slinear | Method::Cubic | Method::Quintic =>
            {
                let degree = method.spline_degree().unwrap_or(1);
                debug!(%method, degree, "building tensor-product spline");
                Kernel::Spline(spline_kernel(grid, values, degree)?)
            },
        };
        Ok(kernel)
    }

    pub fn method(&self) -> Method
    {
        match self
        {
            Kernel::Nearest(_) => Method::Nearest,
            Kernel::Linear(_) => Method::Linear,
            Kernel::Pchip(_) => Method::Pchip,
            Kernel::Spline(spline) => match spline.degree()
            {
                1 => Method::Slinear,
                3 => Method::Cubic,
                _ => Method::Quintic,
            },
        }
    }

    ///
    /// Tensor the kernel combines: the spline coefficients for spline
    /// kernels, the sampled values otherwise.
    ///
    pub fn source<'a>(&'a self, values: &'a ValueTensor) -> &'a ValueTensor
    {
        match self
        {
            Kernel::Spline(spline) => spline.coefficients(),
            _ => values,
        }
    }
}

#[test]
fn check_kernel_build()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0]]).unwrap();
    let values = ValueTensor::from_fn(&grid, &[], &mut |x| vec![x[0] + x[1]]).unwrap();
    assert_eq!(Kernel::build(Method::Nearest, &grid, &values).unwrap().method(), Method::Nearest);
    assert_eq!(Kernel::build(Method::Slinear, &grid, &values).unwrap().method(), Method::Slinear);
    let err = Kernel::build(Method::Cubic, &grid, &values).unwrap_err();
    assert!(err.is_validation());
    let err = Kernel::build(Method::Pchip, &grid, &values).unwrap_err();
    assert!(err.to_string().contains("axis 1"));
}
