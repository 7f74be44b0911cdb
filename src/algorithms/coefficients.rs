use tracing::debug;

use crate::basis::bspline::{BSplineAxis, SplineKernel};
use crate::errors::{InterpolationError, Result};
use crate::grids::rectilinear_grid::RectilinearGrid;
use crate::storage::value_tensor::ValueTensor;

use super::sweep::sweep_in_place;

///
/// Build the tensor-product interpolating B-spline of `degree` for `values`.
///
/// The tensor-product collocation matrix is the Kronecker product of the
/// per-axis matrices, so the coefficients follow from one banded solve per
/// fibre along each axis in turn. Degree 1 collocation is the identity and
/// the values are used as they are.
///
pub fn spline_kernel(grid: &RectilinearGrid, values: &ValueTensor, degree: usize) -> Result<SplineKernel>
{
    let axes: Vec<BSplineAxis> = grid.axes().iter()
        .map(|axis| BSplineAxis::not_a_knot(axis.nodes(), degree))
        .collect();
    let mut data = values.flat().to_vec();
    if degree > 1
    {
        for (dim, (basis, axis)) in axes.iter().zip(grid.axes()).enumerate()
        {
            let lu = basis.collocation(axis.nodes())
                .map_err(|_| InterpolationError::SingularCollocation { axis: dim })?;
            debug!(axis = dim, degree, nodes = axis.len(), "solving spline collocation");
            sweep_in_place(&mut data, axis.len(), values.strides()[dim], &|fibre: &mut [f64]| lu.solve(fibre));
        }
    }
    Ok(SplineKernel { degree, axes, coefficients: values.with_data(data) })
}

#[test]
fn check_slinear_coefficients_are_values()
{
    let grid = RectilinearGrid::new(vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0]]).unwrap();
    let values = ValueTensor::from_fn(&grid, &[], &mut |x| vec![x[0] * x[1] + 1.0]).unwrap();
    let kernel = spline_kernel(&grid, &values, 1).unwrap();
    assert_eq!(kernel.coefficients().flat(), values.flat());
}

#[test]
fn check_cubic_coefficients_reproduce_nodes()
{
    use crate::basis::bspline::MAX_DEGREE;
    let grid = RectilinearGrid::new(vec![vec![0.0, 0.5, 1.0, 2.0, 2.5], vec![-1.0, 0.0, 1.0, 3.0]]).unwrap();
    let values = ValueTensor::from_fn(&grid, &[2], &mut |x| vec![(x[0] * 3.0).sin() + x[1], x[0] * x[1]]).unwrap();
    let kernel = spline_kernel(&grid, &values, 3).unwrap();
    let mut b0 = [0.0; MAX_DEGREE + 1];
    let mut b1 = [0.0; MAX_DEGREE + 1];
    for (i, &x0) in grid.axis(0).nodes().iter().enumerate()
    {
        for (j, &x1) in grid.axis(1).nodes().iter().enumerate()
        {
            let s0 = kernel.axes[0].span(x0);
            let s1 = kernel.axes[1].span(x1);
            kernel.axes[0].basis(s0, x0, &mut b0);
            kernel.axes[1].basis(s1, x1, &mut b1);
            for b in 0..2
            {
                let mut value = 0.0;
                for r0 in 0..4
                {
                    for r1 in 0..4
                    {
                        let c = kernel.coefficients().node_values(&[s0 - 3 + r0, s1 - 3 + r1])[b];
                        value += b0[r0] * b1[r1] * c;
                    }
                }
                let expected = values.node_values(&[i, j])[b];
                assert!((value - expected).abs() < 1e-10, "node ({i},{j}) batch {b}: {value} vs {expected}");
            }
        }
    }
}
