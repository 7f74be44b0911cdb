use ndarray::{Array1, Array2};
use proptest::prelude::*;
use rgrid::{Interpolator, Method};

/// Strictly increasing axis built from positive gaps.
fn axis_strategy(min_len: usize) -> impl Strategy<Value = Vec<f64>>
{
    (-5.0..5.0f64, prop::collection::vec(0.05..2.0f64, min_len - 1..8)).prop_map(|(start, gaps)|
    {
        let mut nodes = vec![start];
        for gap in gaps
        {
            let next = nodes[nodes.len() - 1] + gap;
            nodes.push(next);
        }
        nodes
    })
}

fn grid_case(min_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Array2<f64>)>
{
    (axis_strategy(min_len), axis_strategy(min_len)).prop_flat_map(|(x, y)|
    {
        let shape = (x.len(), y.len());
        prop::collection::vec(-10.0..10.0f64, shape.0 * shape.1)
            .prop_map(move |data| (x.clone(), y.clone(), Array2::from_shape_vec(shape, data).unwrap()))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn linear_stays_within_data_range((x, y, values) in grid_case(2), u in 0.0..=1.0f64, v in 0.0..=1.0f64)
    {
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let point = [(x[0] + u * (x[x.len() - 1] - x[0])).min(x[x.len() - 1]), (y[0] + v * (y[y.len() - 1] - y[0])).min(y[y.len() - 1])];
        let interpolator = Interpolator::new(vec![x, y], values, Method::Linear, true, None).unwrap();
        let value = interpolator.interpolate_point(&point).unwrap()[0];
        prop_assert!(value >= lo - 1e-9 && value <= hi + 1e-9);
    }

    #[test]
    fn slinear_equals_linear((x, y, values) in grid_case(2), u in -0.2..=1.2f64, v in -0.2..=1.2f64)
    {
        let point = [x[0] + u * (x[x.len() - 1] - x[0]), y[0] + v * (y[y.len() - 1] - y[0])];
        let interpolator = Interpolator::new(vec![x, y], values, Method::Linear, false, None).unwrap();
        let linear = interpolator.interpolate_point(&point).unwrap()[0];
        let slinear = interpolator.evaluate_with(&Array1::from(point.to_vec()), Some(Method::Slinear)).unwrap()[[0]];
        prop_assert!((linear - slinear).abs() <= 1e-9 * (1.0 + linear.abs()));
    }

    #[test]
    fn pchip_preserves_monotone_data(x in axis_strategy(4), steps in prop::collection::vec(0.0..3.0f64, 8), u in 0.0..=1.0f64, w in 0.0..=1.0f64)
    {
        let values: Vec<f64> = x.iter().enumerate().map(|(i, _)| steps[..i].iter().sum()).collect();
        let last = x[x.len() - 1];
        let a = (x[0] + u.min(w) * (last - x[0])).min(last);
        let b = (x[0] + u.max(w) * (last - x[0])).min(last);
        let interpolator = Interpolator::new(vec![x], Array1::from(values.clone()), Method::Pchip, true, None).unwrap();
        let fa = interpolator.interpolate_point(&[a]).unwrap()[0];
        let fb = interpolator.interpolate_point(&[b]).unwrap()[0];
        prop_assert!(fa <= fb + 1e-9);
        prop_assert!(fa >= values[0] - 1e-9 && fb <= values[values.len() - 1] + 1e-9);
    }

    #[test]
    fn every_method_reproduces_nodes((x, y, values) in grid_case(6), method in prop::sample::select(Method::ALL.to_vec()))
    {
        let interpolator = Interpolator::new(vec![x.clone(), y.clone()], values.clone(), method, true, None).unwrap();
        for (i, &xi) in x.iter().enumerate()
        {
            for (j, &yj) in y.iter().enumerate()
            {
                let value = interpolator.interpolate_point(&[xi, yj]).unwrap()[0];
                prop_assert!((value - values[[i, j]]).abs() <= 1e-7 * (1.0 + values[[i, j]].abs()), "{method} at ({i}, {j})");
            }
        }
    }
}
