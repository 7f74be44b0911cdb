use crate::grids::axis::{GridAxis, Location};
use crate::storage::value_tensor::ValueTensor;
use crate::utilities::banded::BandedLu;

use super::base::{AxisKernel, AxisStencil};

/// Highest supported spline degree (quintic).
pub const MAX_DEGREE: usize = 5;

///
/// B-spline basis of odd degree on one axis, with not-a-knot end conditions:
/// the knot vector repeats each end node `degree + 1` times and drops the
/// `(degree - 1) / 2` interior nodes nearest each end.
///
#[derive(Clone, Debug, PartialEq)]
pub struct BSplineAxis
{
    degree: usize,
    knots: Vec<f64>,
}

impl BSplineAxis
{
    pub fn not_a_knot(nodes: &[f64], degree: usize) -> Self
    {
        debug_assert!(degree % 2 == 1 && degree <= MAX_DEGREE);
        debug_assert!(nodes.len() > degree);
        let m = nodes.len();
        let skip = (degree + 1) / 2;
        let mut knots = Vec::with_capacity(m + degree + 1);
        knots.extend(std::iter::repeat(nodes[0]).take(degree + 1));
        knots.extend_from_slice(&nodes[skip..m - skip]);
        knots.extend(std::iter::repeat(nodes[m - 1]).take(degree + 1));
        Self { degree, knots }
    }

    #[inline]
    pub fn degree(&self) -> usize
    {
        self.degree
    }

    #[inline]
    pub fn knots(&self) -> &[f64]
    {
        &self.knots
    }

    /// Number of basis functions (equal to the number of axis nodes).
    #[inline]
    pub fn num_coefficients(&self) -> usize
    {
        self.knots.len() - self.degree - 1
    }

    ///
    /// Knot span `mu` in `[degree, n - 1]` with `knots[mu] <= x < knots[mu + 1]`,
    /// clamped to the first/last span outside the knot range.
    ///
    #[inline]
    pub fn span(&self, x: f64) -> usize
    {
        let n = self.num_coefficients();
        self.degree + self.knots[self.degree + 1..n].partition_point(|&knot| knot <= x)
    }

    ///
    /// Values of the `degree + 1` basis functions that are non-zero on `span`,
    /// evaluated at `x` (Cox-de Boor). Outside the span the polynomial pieces of
    /// that span are continued.
    ///
    pub fn basis(&self, span: usize, x: f64, out: &mut [f64])
    {
        let k = self.degree;
        let t = &self.knots;
        let mut left = [0.0; MAX_DEGREE + 1];
        let mut right = [0.0; MAX_DEGREE + 1];
        out[0] = 1.0;
        for j in 1..=k
        {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j
            {
                let temp = out[r] / (right[r + 1] + left[j - r]);
                out[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            out[j] = saved;
        }
    }

    ///
    /// Factorised collocation matrix `A[i][j] = B_j(nodes[i])`. Fails with the
    /// offending column when the system is singular.
    ///
    pub fn collocation(&self, nodes: &[f64]) -> Result<BandedLu, usize>
    {
        let k = self.degree;
        let n = nodes.len();
        let mut matrix = BandedLu::zeros(n, k, k);
        let mut row = [0.0; MAX_DEGREE + 1];
        for (i, &x) in nodes.iter().enumerate()
        {
            let span = self.span(x);
            self.basis(span, x, &mut row);
            for (r, &value) in row[..=k].iter().enumerate()
            {
                matrix.set(i, span - k + r, value);
            }
        }
        matrix.factorize()?;
        Ok(matrix)
    }
}

///
/// Tensor-product B-spline of odd degree. Evaluation runs over the spline
/// coefficients, not the sampled values.
///
#[derive(Clone, Debug)]
pub struct SplineKernel
{
    pub(crate) degree: usize,
    pub(crate) axes: Vec<BSplineAxis>,
    pub(crate) coefficients: ValueTensor,
}

impl SplineKernel
{
    #[inline]
    pub fn degree(&self) -> usize
    {
        self.degree
    }

    #[inline]
    pub fn coefficients(&self) -> &ValueTensor
    {
        &self.coefficients
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SplineStencil
{
    start: usize,
    len: usize,
    weights: [f64; MAX_DEGREE + 1],
}

impl AxisStencil for SplineStencil
{
    #[inline]
    fn window(&self) -> (usize, usize)
    {
        (self.start, self.len)
    }

    #[inline]
    fn collapse(&self, fibre: &[f64]) -> f64
    {
        self.weights[..self.len].iter().zip(fibre).map(|(w, c)| w * c).sum()
    }
}

impl AxisKernel for SplineKernel
{
    type Stencil = SplineStencil;

    #[inline]
    fn stencil(&self, dim: usize, _axis: &GridAxis, x: f64, _location: &Location) -> SplineStencil
    {
        let basis = &self.axes[dim];
        let span = basis.span(x);
        let mut weights = [0.0; MAX_DEGREE + 1];
        basis.basis(span, x, &mut weights);
        SplineStencil { start: span - basis.degree, len: basis.degree + 1, weights }
    }
}

#[test]
fn check_not_a_knot_knots()
{
    let nodes = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let linear = BSplineAxis::not_a_knot(&nodes, 1);
    assert_eq!(linear.knots(), &[0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0]);
    let cubic = BSplineAxis::not_a_knot(&nodes, 3);
    assert_eq!(cubic.knots(), &[0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 5.0, 5.0, 5.0, 5.0]);
    assert_eq!(cubic.num_coefficients(), 6);
    let quintic = BSplineAxis::not_a_knot(&nodes, 5);
    assert_eq!(quintic.knots().len(), 12);
    assert_eq!(quintic.num_coefficients(), 6);
}

#[test]
fn check_basis_partition_of_unity()
{
    let nodes = [0.0, 0.3, 1.1, 2.0, 2.2, 3.5, 4.0];
    for degree in [1, 3, 5]
    {
        let axis = BSplineAxis::not_a_knot(&nodes, degree);
        let mut out = [0.0; MAX_DEGREE + 1];
        for x in [0.0, 0.15, 1.0, 2.1, 3.9, 4.0, -0.5, 4.5]
        {
            let span = axis.span(x);
            axis.basis(span, x, &mut out);
            let sum: f64 = out[..=degree].iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "degree {degree} x {x} sum {sum}");
        }
    }
}

#[test]
fn check_span_clamping()
{
    let nodes = [0.0, 1.0, 2.0, 3.0, 4.0];
    let axis = BSplineAxis::not_a_knot(&nodes, 3);
    assert_eq!(axis.span(-1.0), 3);
    assert_eq!(axis.span(0.5), 3);
    assert_eq!(axis.span(2.5), 4);
    assert_eq!(axis.span(4.0), 4);
    assert_eq!(axis.span(10.0), 4);
}

#[test]
fn check_collocation_reproduces_cubic()
{
    // not-a-knot cubic interpolation is exact for cubic polynomials
    let nodes = [0.0, 0.5, 1.5, 2.0, 3.0, 4.5];
    let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x * x;
    let axis = BSplineAxis::not_a_knot(&nodes, 3);
    let lu = axis.collocation(&nodes).unwrap();
    let mut coefficients: Vec<f64> = nodes.iter().map(|&x| f(x)).collect();
    lu.solve(&mut coefficients);
    let mut basis = [0.0; MAX_DEGREE + 1];
    for x in [0.25, 1.0, 2.7, 4.4, 5.0, -0.5]
    {
        let span = axis.span(x);
        axis.basis(span, x, &mut basis);
        let value: f64 = (0..=3).map(|r| basis[r] * coefficients[span - 3 + r]).sum();
        assert!((value - f(x)).abs() < 1e-10, "x={x} value={value} expected={}", f(x));
    }
}
