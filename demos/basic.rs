
use ndarray::{array, Array2, Array3};
use rgrid::{errors::InterpolationError, Interpolator, Method};

fn degenerate_axis() -> Result<(), InterpolationError>
{
    println!("\nRunning \"degenerate_axis\" example\n");
    // The second axis has a single node, so every query off y = 0 is outside the grid.
    let values = array![[0.0], [5.0], [10.0]];
    let points = array![[2.0, 0.0], [2.0, 1.0], [2.0, -1.0]];
    let mut interpolator = Interpolator::new(vec![vec![0.0, 5.0, 10.0], vec![0.0]], values, Method::Linear, false, None)?;
    println!("extrapolated: {}", interpolator.evaluate(&points)?);

    interpolator.set_fill_value(Some(-101.0));
    println!("filled: {}", interpolator.evaluate(&points)?);

    interpolator.set_bounds_error(true);
    if let Err(err) = interpolator.evaluate(&points)
    {
        println!("bounds_error: {err}");
    }
    Ok(())
}

///
/// Compare every method on a smooth function, then evaluate a batch of two functions at once.
///
fn methods_and_batches() -> Result<(), InterpolationError>
{
    println!("\nRunning \"methods_and_batches\" example\n");
    let x: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
    let y: Vec<f64> = (0..6).map(|i| i as f64 * 0.6).collect();
    let f = |x: f64, y: f64| (x * 0.7).sin() * (y * 0.4).cos();
    let values = Array2::from_shape_fn((x.len(), y.len()), |(i, j)| f(x[i], y[j]));
    let interpolator = Interpolator::new(vec![x.clone(), y.clone()], values, Method::Linear, true, None)?;
    let point = array![1.3, 2.1];
    for method in Method::ALL
    {
        let value = interpolator.evaluate_with(&point, Some(method))?[[0]];
        println!("{:>8}: calculated {value:.6}, expected {:.6}. Error={:.2e}", method.name(), f(1.3, 2.1), (value - f(1.3, 2.1)).abs());
    }

    // trailing dimensions hold independent functions sharing the grid
    let batch = Array3::from_shape_fn((x.len(), y.len(), 2), |(i, j, k)| if k == 0 { f(x[i], y[j]) } else { x[i] + y[j] });
    let interpolator = Interpolator::new(vec![x, y], batch, Method::Cubic, true, None)?;
    println!("batch at {point}: {}", interpolator.evaluate(&point)?);
    Ok(())
}

fn main() -> Result<(), InterpolationError>
{
    degenerate_axis()?;
    methods_and_batches()?;
    Ok(())
}
