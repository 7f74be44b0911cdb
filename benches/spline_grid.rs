use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array2, Array3};
use rgrid::{errors::InterpolationError, Interpolator, Method};

fn build_three_d_interpolator(method: Method) -> Result<Interpolator, InterpolationError>
{
    let axis: Vec<f64> = (0..20).map(|i| (i as f64 / 19.0).powf(1.5)).collect();
    let values = Array3::from_shape_fn((20, 20, 20), |(i, j, k)| (axis[i] * 3.0).sin() * axis[j] + axis[k] * axis[k]);
    Interpolator::new(vec![axis.clone(), axis.clone(), axis], values, method, true, None)
}

fn run_construction(c: &mut Criterion)
{
    for method in [Method::Cubic, Method::Quintic]
    {
        c.bench_function(&format!("3d {method} coefficients"), |b| b.iter(|| build_three_d_interpolator(method).unwrap()));
    }
}

fn run_evaluation(c: &mut Criterion)
{
    let points = Array2::from_shape_fn((1000, 3), |(p, d)| ((p * 11 + d * 29) % 97) as f64 / 97.0);
    for method in [Method::Slinear, Method::Cubic, Method::Quintic]
    {
        let interpolator = build_three_d_interpolator(method).unwrap();
        c.bench_function(&format!("3d {method} evaluate"), |b| b.iter(|| interpolator.evaluate(&points).unwrap()));
    }
}

criterion_group!(benches, run_construction, run_evaluation);
criterion_main!(benches);
