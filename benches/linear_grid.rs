use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use rgrid::{errors::InterpolationError, Interpolator, Method, RectilinearGrid, ValueTensor};

fn build_six_d_interpolator(method: Method) -> Result<Interpolator, InterpolationError>
{
    // 6D grid with 7 nodes per axis, one value per node.
    let axes: Vec<Vec<f64>> = (0..6).map(|_| (0..7).map(|i| i as f64 / 6.0).collect()).collect();
    let grid = RectilinearGrid::new(axes)?;

    let f = |x: &[f64]| vec![x.iter().map(|xi| xi * xi * xi).sum::<f64>()];
    let values = ValueTensor::from_fn_parallel(&grid, &[], &f)?;
    Interpolator::new(grid, values.into_array(), method, true, None)
}

fn six_d(interpolator: &Interpolator, points: &Array2<f64>) -> Result<(), InterpolationError>
{
    let _values = interpolator.evaluate(points)?;
    Ok(())
}

fn run_six_d(c: &mut Criterion)
{
    let points = Array2::from_shape_fn((1000, 6), |(p, d)| ((p * 7 + d * 13) % 100) as f64 / 100.0);
    for method in [Method::Nearest, Method::Linear, Method::Pchip]
    {
        let interpolator = build_six_d_interpolator(method).unwrap();
        c.bench_function(&format!("6d {method}"), |b| b.iter(|| six_d(&interpolator, &points).unwrap()));
    }
}

criterion_group!(benches, run_six_d);
criterion_main!(benches);
