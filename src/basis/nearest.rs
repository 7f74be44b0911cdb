use crate::grids::axis::{GridAxis, Location};

use super::base::{AxisKernel, AxisStencil};

///
/// Snaps each coordinate to the closer end of its interval. Ties go to the
/// lower node; outside the axis the boundary node is repeated.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestKernel;

#[derive(Copy, Clone, Debug)]
pub struct NearestStencil
{
    index: usize,
    /// NaN coordinates have no nearest node.
    undefined: bool,
}

impl AxisStencil for NearestStencil
{
    #[inline]
    fn window(&self) -> (usize, usize)
    {
        (self.index, 1)
    }

    #[inline]
    fn collapse(&self, fibre: &[f64]) -> f64
    {
        if self.undefined { f64::NAN } else { fibre[0] }
    }
}

impl AxisKernel for NearestKernel
{
    type Stencil = NearestStencil;

    #[inline]
    fn stencil(&self, _dim: usize, axis: &GridAxis, x: f64, location: &Location) -> NearestStencil
    {
        if axis.is_degenerate()
        {
            return NearestStencil { index: 0, undefined: x.is_nan() };
        }
        let index = if location.t > 0.5 { location.interval + 1 } else { location.interval };
        NearestStencil { index, undefined: location.t.is_nan() }
    }
}

#[test]
fn check_nearest_ties_to_lower()
{
    let axis = GridAxis::new(vec![0.0, 1.0, 2.0], 0).unwrap();
    let fibre = [10.0, 20.0, 30.0];
    let pick = |x: f64|
    {
        let stencil = NearestKernel.stencil(0, &axis, x, &axis.locate(x));
        let (start, len) = stencil.window();
        stencil.collapse(&fibre[start..start + len])
    };
    assert_eq!(pick(0.5), 10.0);
    assert_eq!(pick(0.51), 20.0);
    assert_eq!(pick(1.5), 20.0);
    assert_eq!(pick(2.0), 30.0);
    assert_eq!(pick(-4.0), 10.0);
    assert_eq!(pick(9.0), 30.0);
    assert!(pick(f64::NAN).is_nan());
}
