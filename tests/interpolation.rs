use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::{array, s, Array1, Array2, Array4, ArrayD, Axis, Ix2, IxDyn};
use rgrid::{interpolate, InterpolationError, Interpolator, InterpolatorOptions, Method, RectilinearGrid, ValueTensor};

fn tabulate(axes: &[Vec<f64>], batch_shape: &[usize], f: impl Fn(&[f64]) -> Vec<f64>) -> ArrayD<f64>
{
    let grid = RectilinearGrid::new(axes.to_vec()).unwrap();
    ValueTensor::from_fn(&grid, batch_shape, &mut |x| f(x)).unwrap().into_array()
}

fn uneven_axes() -> Vec<Vec<f64>>
{
    vec![
        vec![-1.0, -0.4, 0.0, 0.3, 1.1, 1.5, 2.0],
        vec![0.0, 0.5, 0.7, 1.6, 2.2, 3.0],
    ]
}

#[test]
fn check_degenerate_axis_scenario()
{
    let values = array![[0.0], [5.0], [10.0]];
    let grid = vec![vec![0.0, 5.0, 10.0], vec![0.0]];
    let points = array![[2.0, 0.0], [2.0, 1.0], [2.0, -1.0]];

    let mut interpolator = Interpolator::new(grid, values, Method::Linear, false, None).unwrap();
    let extrapolated = interpolator.evaluate(&points).unwrap();
    assert_eq!(extrapolated.as_slice().unwrap(), &[2.0, 2.0, 2.0]);

    interpolator.set_fill_value(Some(-101.0));
    let filled = interpolator.evaluate(&points).unwrap();
    assert_eq!(filled.as_slice().unwrap(), &[2.0, -101.0, -101.0]);

    interpolator.set_bounds_error(true);
    let err = interpolator.evaluate(&points).unwrap_err();
    assert_eq!(err, InterpolationError::OutOfDomain { point: 1, axis: 1, coordinate: 1.0 });
}

#[test]
fn check_cubic_sum_scenario()
{
    let x: Vec<f64> = (0..5).map(f64::from).collect();
    let y: Vec<f64> = (0..6).map(f64::from).collect();
    let values = Array2::from_shape_fn((5, 6), |(i, j)| (i as f64).powi(3) + (j as f64).powi(3));
    let interpolator = Interpolator::new(vec![x, y], values, Method::Linear, true, Some(f64::NAN)).unwrap();
    let out = interpolator.evaluate(&array![[1.5, 1.5], [3.5, 2.6]]).unwrap();
    assert_relative_eq!(out[[0]], 9.0, epsilon = 1e-12);
    assert_relative_eq!(out[[1]], 64.9, epsilon = 1e-12);
}

#[test]
fn check_nodes_reproduced_for_every_method()
{
    let axes = uneven_axes();
    let values = tabulate(&axes, &[2], |x| vec![(2.0 * x[0]).sin() * x[1].exp(), x[0] * x[0] - x[1]]);
    let grid = RectilinearGrid::new(axes.clone()).unwrap();
    let nodes: Vec<f64> = grid.points().flatten().collect();
    let nodes = Array2::from_shape_vec((grid.len(), 2), nodes).unwrap();
    for method in Method::ALL
    {
        let interpolator = Interpolator::new(axes.clone(), values.clone(), method, true, Some(f64::NAN)).unwrap();
        let out = interpolator.evaluate(&nodes).unwrap();
        assert_eq!(out.shape(), &[grid.len(), 2]);
        for (a, b) in out.iter().zip(values.iter())
        {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

#[test]
fn check_linear_matches_slinear()
{
    let axes = uneven_axes();
    let values = tabulate(&axes, &[], |x| vec![(x[0] * x[1]).cos() + x[1]]);
    let linear = Interpolator::new(axes.clone(), values.clone(), Method::Linear, true, None).unwrap();
    let points = array![[-0.9, 0.1], [0.15, 2.9], [1.9, 1.0], [2.0, 3.0], [0.0, 0.0], [1.2, 0.6]];
    let a = linear.evaluate(&points).unwrap();
    let b = linear.evaluate_with(&points, Some(Method::Slinear)).unwrap();
    for (a, b) in a.iter().zip(b.iter())
    {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn check_cubic_reproduces_cubic_polynomials()
{
    let axes = uneven_axes();
    let f = |x: &[f64]| x[0].powi(3) - 2.0 * x[0] * x[1] * x[1] + x[1].powi(3) + 1.0;
    let values = tabulate(&axes, &[], |x| vec![f(x)]);
    let interpolator = Interpolator::new(axes, values, Method::Cubic, false, None).unwrap();
    // includes points outside the grid, where the boundary pieces continue
    for x in [[0.1, 0.2], [-0.7, 2.5], [1.7, 1.9], [2.4, -0.5], [-1.5, 3.5]]
    {
        let value = interpolator.interpolate_point(&x).unwrap()[0];
        assert_relative_eq!(value, f(&x), epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn check_quintic_reproduces_quintic_polynomials()
{
    let axis = vec![0.0, 0.3, 0.5, 1.2, 1.9, 2.0, 2.6, 3.1];
    let f = |x: f64| x.powi(5) - 3.0 * x.powi(4) + x * x - 0.5;
    let values = Array1::from_iter(axis.iter().map(|&x| f(x)));
    let interpolator = Interpolator::new(vec![axis], values, Method::Quintic, false, None).unwrap();
    let queries = Array1::linspace(0.0, 3.1, 23);
    let out = interpolator.evaluate(&queries).unwrap();
    assert_eq!(out.shape(), &[23]);
    for (value, &x) in out.iter().zip(queries.iter())
    {
        assert_abs_diff_eq!(*value, f(x), epsilon = 1e-9);
    }
}

#[test]
fn check_pchip_does_not_overshoot()
{
    let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let y = vec![0.0, 1.0, 2.0, 3.0];
    let values = Array2::from_shape_fn((6, 4), |(i, j)| (if i >= 3 { 1.0 } else { 0.0 }) + j as f64);
    let pchip = Interpolator::new(vec![x, y], values.clone(), Method::Pchip, true, None).unwrap();
    let cubic = Interpolator::new(vec![vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], vec![0.0, 1.0, 2.0, 3.0]], values, Method::Cubic, true, None).unwrap();
    let mut cubic_overshoots = false;
    for i in 0..=50
    {
        let point = [5.0 * i as f64 / 50.0, 1.5];
        let value = pchip.interpolate_point(&point).unwrap()[0];
        assert!((1.5 - 1e-12..=2.5 + 1e-12).contains(&value), "pchip overshoot {value} at {point:?}");
        let value = cubic.interpolate_point(&point).unwrap()[0];
        cubic_overshoots |= !(1.5..=2.5).contains(&value);
    }
    assert!(cubic_overshoots);
}

#[test]
fn check_bounds_error_and_fill()
{
    let axes = uneven_axes();
    let values = tabulate(&axes, &[3], |x| vec![x[0], x[1], x[0] + x[1]]);
    let mut interpolator = Interpolator::with_options(axes, values, InterpolatorOptions::default()).unwrap();
    let points = array![[0.0, 0.0], [0.5, 1.0], [2.5, 1.0], [0.0, -1.0]];

    let err = interpolator.evaluate(&points).unwrap_err();
    assert!(err.is_domain());
    assert_eq!(err, InterpolationError::OutOfDomain { point: 2, axis: 0, coordinate: 2.5 });

    interpolator.set_bounds_error(false);
    let out = interpolator.evaluate(&points).unwrap().into_dimensionality::<Ix2>().unwrap();
    assert_eq!(out.shape(), &[4, 3]);
    assert!(out.slice(s![2.., ..]).iter().all(|v| v.is_nan()));
    assert_abs_diff_eq!(out[[1, 2]], 1.5, epsilon = 1e-12);

    interpolator.set_fill_value(Some(42.0));
    let out = interpolator.evaluate(&points).unwrap().into_dimensionality::<Ix2>().unwrap();
    assert!(out.slice(s![2.., ..]).iter().all(|&v| v == 42.0));

    interpolator.set_method(Method::Cubic).unwrap();
    let out = interpolator.evaluate(&points).unwrap().into_dimensionality::<Ix2>().unwrap();
    assert!(out.slice(s![2.., ..]).iter().all(|&v| v == 42.0));
}

#[test]
fn check_batch_dimensions()
{
    let axes = uneven_axes();
    let values = Array4::from_shape_fn((7, 6, 2, 3), |(i, j, a, b)| (i * j) as f64 + (a * 3 + b) as f64 * (i as f64 - 2.0));
    let points = Array2::from_shape_fn((5, 2), |(p, d)| if d == 0 { -0.8 + 0.55 * p as f64 } else { 0.2 + 0.6 * p as f64 });
    for method in [Method::Linear, Method::Cubic, Method::Pchip, Method::Nearest]
    {
        let interpolator = Interpolator::new(axes.clone(), values.clone(), method, true, None).unwrap();
        assert_eq!(interpolator.batch_shape(), &[2, 3]);
        let all = interpolator.evaluate(&points).unwrap();
        assert_eq!(all.shape(), &[5, 2, 3]);
        for a in 0..2
        {
            for b in 0..3
            {
                let slice = values.index_axis(Axis(3), b).index_axis(Axis(2), a).to_owned();
                let single = Interpolator::new(axes.clone(), slice, method, true, None).unwrap();
                let out = single.evaluate(&points).unwrap();
                for p in 0..5
                {
                    assert_abs_diff_eq!(all[[p, a, b]], out[[p]], epsilon = 1e-10);
                }
            }
        }
    }
}

#[test]
fn check_query_layouts()
{
    let values = Array2::from_shape_fn((3, 2), |(i, b)| i as f64 * (b as f64 + 1.0));
    let interpolator = Interpolator::new(vec![vec![0.0, 1.0, 2.0]], values, Method::Linear, true, None).unwrap();
    let out = interpolator.evaluate(&array![0.5, 1.5, 2.0]).unwrap();
    assert_eq!(out.shape(), &[3, 2]);
    assert_eq!(out.index_axis(Axis(0), 1).iter().copied().collect::<Vec<_>>(), vec![1.5, 3.0]);

    let grid = ArrayD::from_shape_vec(IxDyn(&[2, 2, 1]), vec![0.0, 0.5, 1.0, 2.0]).unwrap();
    assert_eq!(interpolator.evaluate(&grid).unwrap().shape(), &[2, 2, 2]);

    let err = interpolator.evaluate(&array![[0.5, 0.5]]).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn check_method_override_and_validation()
{
    let axes = vec![vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 2.0]];
    let values = tabulate(&axes, &[], |x| vec![x[0] * x[0] + x[1]]);
    let interpolator = Interpolator::new(axes.clone(), values.clone(), Method::Linear, true, None).unwrap();
    let points = array![[0.4, 0.6], [2.5, 1.5]];

    let nearest = interpolator.evaluate_with(&points, Some(Method::Nearest)).unwrap();
    assert_eq!(nearest.iter().copied().collect::<Vec<_>>(), vec![1.0, 5.0]);
    assert_eq!(interpolator.method(), Method::Linear);

    let err = interpolator.evaluate_with(&points, Some(Method::Cubic)).unwrap_err();
    assert_eq!(err, InterpolationError::InsufficientPoints { axis: 1, method: Method::Cubic, required: 4, actual: 3 });
    assert_eq!(err.to_string(), "axis 1 has 3 points, but method cubic requires at least 4");

    let err = Interpolator::new(axes, values, Method::Quintic, true, None).unwrap_err();
    assert!(err.is_validation());
    assert!("spline7".parse::<Method>().unwrap_err().is_configuration());
}

#[test]
fn check_rebinding()
{
    let mut interpolator = Interpolator::new(vec![vec![0.0, 1.0, 2.0, 3.0]], array![0.0, 1.0, 4.0, 9.0], Method::Cubic, true, None).unwrap();
    assert_abs_diff_eq!(interpolator.interpolate_point(&[1.5]).unwrap()[0], 2.25, epsilon = 1e-12);

    interpolator.set_values(array![0.0, 1.0, 8.0, 27.0]).unwrap();
    assert_abs_diff_eq!(interpolator.interpolate_point(&[1.5]).unwrap()[0], 3.375, epsilon = 1e-12);

    interpolator.set_grid(vec![vec![0.0, 2.0, 4.0, 6.0]]).unwrap();
    assert_abs_diff_eq!(interpolator.interpolate_point(&[3.0]).unwrap()[0], 3.375, epsilon = 1e-12);

    assert!(interpolator.rebind(vec![vec![0.0, 1.0]], array![1.0, 2.0]).is_err());
    assert_eq!(interpolator.grid().axis(0).nodes(), &[0.0, 2.0, 4.0, 6.0]);

    interpolator.set_method(Method::Linear).unwrap();
    interpolator.rebind(vec![vec![0.0, 1.0]], array![1.0, 2.0]).unwrap();
    assert_eq!(interpolator.interpolate_point(&[0.25]).unwrap(), vec![1.25]);
}

#[test]
fn check_nan_propagation()
{
    let mut values = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64);
    values[[1, 1]] = f64::NAN;
    let axes = vec![vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0, 3.0]];
    let interpolator = Interpolator::new(axes, values, Method::Linear, false, None).unwrap();
    assert!(interpolator.interpolate_point(&[0.5, 0.5]).unwrap()[0].is_nan());
    assert_eq!(interpolator.interpolate_point(&[2.5, 2.5]).unwrap(), vec![5.0]);
    assert!(interpolator.interpolate_point(&[f64::NAN, 2.5]).unwrap()[0].is_nan());
}

#[test]
fn check_nan_query_ignores_fill_and_bounds()
{
    let values = Array2::from_shape_fn((6, 6), |(i, j)| (i * j) as f64);
    let axes = vec![(0..6).map(f64::from).collect::<Vec<_>>(), (0..6).map(f64::from).collect()];
    for method in Method::ALL
    {
        let mut interpolator = Interpolator::new(axes.clone(), values.clone(), method, false, Some(-101.0)).unwrap();
        assert!(interpolator.interpolate_point(&[f64::NAN, 2.5]).unwrap()[0].is_nan(), "{method}");
        assert_eq!(interpolator.interpolate_point(&[f64::NAN, 9.0]).unwrap(), vec![-101.0]);
        interpolator.set_bounds_error(true);
        assert!(interpolator.interpolate_point(&[2.5, f64::NAN]).unwrap()[0].is_nan(), "{method}");
    }
}

#[test]
fn check_overflowing_axis_span_rejected()
{
    let err = Interpolator::new(vec![vec![-1e308, 1e308]], array![0.0, 2.0], Method::Linear, true, None).unwrap_err();
    assert_eq!(err, InterpolationError::UnboundedAxis { axis: 0 });
    assert!(err.is_validation());
    let wide = Interpolator::new(vec![vec![-0.8e308, 0.8e308]], array![0.0, 2.0], Method::Linear, true, None).unwrap();
    assert_eq!(wide.interpolate_point(&[0.0]).unwrap(), vec![1.0]);
}

#[test]
fn check_free_function()
{
    let axes = uneven_axes();
    let values = tabulate(&axes, &[], |x| vec![x[0] - x[1]]);
    let points = array![[0.2, 0.2], [1.0, 2.0]];
    let out = interpolate(axes.clone(), values, &points, Method::Pchip).unwrap();
    assert_abs_diff_eq!(out[[0]], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(out[[1]], -1.0, epsilon = 1e-12);

    let err = interpolate(axes, Array2::<f64>::zeros((7, 5)), &points, Method::Linear).unwrap_err();
    assert_eq!(err, InterpolationError::ShapeMismatch { axis: 1, expected: 6, actual: 5 });
}
