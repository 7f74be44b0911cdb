use crate::grids::axis::{GridAxis, Location};

use super::base::{AxisKernel, AxisStencil};

///
/// Hat functions: weights `(1 - t, t)` on the ends of the located interval.
/// Outside the axis the boundary interval's line is continued.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearKernel;

#[derive(Copy, Clone, Debug)]
pub struct LinearStencil
{
    start: usize,
    len: usize,
    t: f64,
}

impl AxisStencil for LinearStencil
{
    #[inline]
    fn window(&self) -> (usize, usize)
    {
        (self.start, self.len)
    }

    #[inline]
    fn collapse(&self, fibre: &[f64]) -> f64
    {
        if self.len == 1
        {
            // single node axis, `t` only carries NaN coordinates through
            if self.t.is_nan() { f64::NAN } else { fibre[0] }
        }
        else
        {
            (1.0 - self.t) * fibre[0] + self.t * fibre[1]
        }
    }
}

impl AxisKernel for LinearKernel
{
    type Stencil = LinearStencil;

    #[inline]
    fn stencil(&self, _dim: usize, axis: &GridAxis, _x: f64, location: &Location) -> LinearStencil
    {
        if axis.is_degenerate()
        {
            return LinearStencil { start: 0, len: 1, t: location.t };
        }
        LinearStencil { start: location.interval, len: 2, t: location.t }
    }
}

#[test]
fn check_linear_weights()
{
    let axis = GridAxis::new(vec![0.0, 2.0, 3.0], 0).unwrap();
    let fibre = [0.0, 4.0, 10.0];
    let eval = |x: f64|
    {
        let stencil = LinearKernel.stencil(0, &axis, x, &axis.locate(x));
        let (start, len) = stencil.window();
        stencil.collapse(&fibre[start..start + len])
    };
    assert_eq!(eval(1.0), 2.0);
    assert_eq!(eval(2.5), 7.0);
    assert_eq!(eval(3.0), 10.0);
    // continued lines outside the span
    assert_eq!(eval(-1.0), -2.0);
    assert_eq!(eval(4.0), 16.0);
}

#[test]
fn check_linear_degenerate_axis()
{
    let axis = GridAxis::new(vec![1.0], 0).unwrap();
    for x in [1.0, -3.0, 8.0]
    {
        let stencil = LinearKernel.stencil(0, &axis, x, &axis.locate(x));
        assert_eq!(stencil.window(), (0, 1));
        assert_eq!(stencil.collapse(&[5.0]), 5.0);
    }
    let stencil = LinearKernel.stencil(0, &axis, f64::NAN, &axis.locate(f64::NAN));
    assert!(stencil.collapse(&[5.0]).is_nan());
}
