use crate::grids::axis::{GridAxis, Location};

use super::base::{AxisKernel, AxisStencil};

///
/// Monotone piecewise cubic Hermite interpolation (Fritsch-Carlson slopes).
///
/// The cubic on interval `i` only depends on the slopes at its two ends, which
/// in turn only look one node further out. A stencil therefore carries a
/// window of at most four nodes (`i - 1 ..= i + 2`, clipped to the axis) and
/// computes the Hermite cubic from the fibre values on demand.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct PchipKernel;

#[derive(Copy, Clone, Debug)]
pub struct PchipStencil
{
    start: usize,
    len: usize,
    /// Position of the evaluated interval inside the window.
    local: usize,
    nodes: [f64; 4],
    x: f64,
}

#[inline]
fn sign(x: f64) -> f64
{
    if x > 0.0
    {
        1.0
    }
    else if x < 0.0
    {
        -1.0
    }
    else
    {
        0.0
    }
}

///
/// One-sided three point slope estimate at an end node, limited so that the
/// interpolant stays monotone.
///
#[inline]
fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64
{
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0)
    {
        0.0
    }
    else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs()
    {
        3.0 * m0
    }
    else
    {
        d
    }
}

///
/// Weighted harmonic mean of neighbouring secants, zero at local extrema.
///
#[inline]
fn interior_slope(h_prev: f64, h_next: f64, m_prev: f64, m_next: f64) -> f64
{
    if m_prev == 0.0 || m_next == 0.0 || sign(m_prev) != sign(m_next)
    {
        0.0
    }
    else
    {
        let w1 = 2.0 * h_next + h_prev;
        let w2 = h_next + 2.0 * h_prev;
        (w1 + w2) / (w1 / m_prev + w2 / m_next)
    }
}

///
/// Slope at node `k` of a window of `n` nodes. Window edges only get the
/// one-sided estimate; callers never ask for a window edge that is not an
/// axis end.
///
fn slope(k: usize, n: usize, h: &[f64], m: &[f64]) -> f64
{
    if n == 2
    {
        m[0]
    }
    else if k == 0
    {
        edge_slope(h[0], h[1], m[0], m[1])
    }
    else if k == n - 1
    {
        edge_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3])
    }
    else
    {
        interior_slope(h[k - 1], h[k], m[k - 1], m[k])
    }
}

///
/// Evaluate the monotone cubic through `(nodes[j], values[j])` on interval
/// `local` at `x`. Outside the interval the same cubic is continued.
///
pub fn pchip_eval(nodes: &[f64], values: &[f64], local: usize, x: f64) -> f64
{
    let n = nodes.len();
    let mut h = [0.0; 3];
    let mut m = [0.0; 3];
    for j in 0..n - 1
    {
        h[j] = nodes[j + 1] - nodes[j];
        m[j] = (values[j + 1] - values[j]) / h[j];
    }
    let d0 = slope(local, n, &h, &m);
    let d1 = slope(local + 1, n, &h, &m);
    let hk = h[local];
    let t = (x - nodes[local]) / hk;
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * values[local] + h10 * hk * d0 + h01 * values[local + 1] + h11 * hk * d1
}

impl AxisStencil for PchipStencil
{
    #[inline]
    fn window(&self) -> (usize, usize)
    {
        (self.start, self.len)
    }

    #[inline]
    fn collapse(&self, fibre: &[f64]) -> f64
    {
        pchip_eval(&self.nodes[..self.len], &fibre[..self.len], self.local, self.x)
    }
}

impl AxisKernel for PchipKernel
{
    type Stencil = PchipStencil;

    #[inline]
    fn stencil(&self, _dim: usize, axis: &GridAxis, x: f64, location: &Location) -> PchipStencil
    {
        let n = axis.len();
        let start = location.interval.saturating_sub(1);
        let end = (location.interval + 2).min(n - 1);
        let len = end - start + 1;
        let mut nodes = [0.0; 4];
        nodes[..len].copy_from_slice(&axis.nodes()[start..=end]);
        PchipStencil { start, len, local: location.interval - start, nodes, x }
    }
}

#[test]
fn check_pchip_reproduces_nodes()
{
    let nodes = [0.0, 1.0, 2.5, 3.0];
    let values = [1.0, -2.0, 4.0, 4.5];
    for local in 0..3
    {
        assert_eq!(pchip_eval(&nodes, &values, local, nodes[local]), values[local]);
        assert_eq!(pchip_eval(&nodes, &values, local, nodes[local + 1]), values[local + 1]);
    }
}

#[test]
fn check_pchip_is_monotone_on_step()
{
    let nodes = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let values = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let axis = GridAxis::new(nodes.to_vec(), 0).unwrap();
    let mut previous = f64::NEG_INFINITY;
    for i in 0..=100
    {
        let x = 5.0 * i as f64 / 100.0;
        let stencil = PchipKernel.stencil(0, &axis, x, &axis.locate(x));
        let (start, len) = stencil.window();
        let y = stencil.collapse(&values[start..start + len]);
        assert!((-1e-12..=1.0 + 1e-12).contains(&y), "overshoot at {x}: {y}");
        assert!(y >= previous - 1e-12);
        previous = y;
    }
}

#[test]
fn check_pchip_window_matches_full_axis()
{
    // slopes from a clipped window agree with those of the whole axis
    let nodes = [0.0, 0.7, 1.1, 2.0, 3.5, 3.9, 5.0];
    let values = [0.3, 1.0, 1.2, 3.0, 2.5, 2.6, 4.0];
    let axis = GridAxis::new(nodes.to_vec(), 0).unwrap();
    for x in [0.2, 0.9, 1.5, 2.9, 3.7, 4.5]
    {
        let location = axis.locate(x);
        let stencil = PchipKernel.stencil(0, &axis, x, &location);
        let (start, len) = stencil.window();
        let windowed = stencil.collapse(&values[start..start + len]);

        // full-axis reference slopes
        let n = nodes.len();
        let h: Vec<f64> = nodes.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = (0..n - 1).map(|j| (values[j + 1] - values[j]) / h[j]).collect();
        let d = |k: usize| if k == 0 { edge_slope(h[0], h[1], m[0], m[1]) }
            else if k == n - 1 { edge_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]) }
            else { interior_slope(h[k - 1], h[k], m[k - 1], m[k]) };
        let i = location.interval;
        let t = (x - nodes[i]) / h[i];
        let reference = (2.0 * t.powi(3) - 3.0 * t.powi(2) + 1.0) * values[i]
            + (t.powi(3) - 2.0 * t.powi(2) + t) * h[i] * d(i)
            + (-2.0 * t.powi(3) + 3.0 * t.powi(2)) * values[i + 1]
            + (t.powi(3) - t.powi(2)) * h[i] * d(i + 1);
        assert!((windowed - reference).abs() < 1e-12, "x={x}");
    }
}
