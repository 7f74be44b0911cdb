use crate::grids::axis::{GridAxis, Location};

///
/// Per-axis weights of a kernel for one located coordinate.
///
/// A stencil names the window of consecutive nodes that contribute along its
/// axis and collapses one fibre of window values (ordered by node index) to
/// the interpolated value.
///
pub trait AxisStencil
{
    /// First node and number of nodes contributing along this axis.
    fn window(&self) -> (usize, usize);

    fn collapse(&self, fibre: &[f64]) -> f64;
}

///
/// One-dimensional rule applied along every axis of a tensor-product
/// interpolant.
///
pub trait AxisKernel: Sync
{
    type Stencil: AxisStencil + Send;

    /// Build the stencil for coordinate `x` located at `location` on axis `dim`.
    fn stencil(&self, dim: usize, axis: &GridAxis, x: f64, location: &Location) -> Self::Stencil;
}
