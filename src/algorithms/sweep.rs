use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;

///
/// Apply `function` in place to every fibre of `data` along one dimension.
///
/// `data` is a row-major tensor; the swept dimension has `len` entries and
/// `inner` is the element stride of that dimension (the product of all later
/// dimensions, batch included). Blocks of `len * inner` values are processed
/// in parallel.
///
pub(crate) fn sweep_in_place<F: Fn(&mut [f64]) + Send + Sync>(data: &mut [f64], len: usize, inner: usize, function: &F)
{
    let chunk = len * inner;
    if chunk == 0
    {
        return;
    }
    data.par_chunks_mut(chunk).for_each(
    |block|
    {
        let mut fibre = vec![0.0; len];
        for r in 0..inner
        {
            for (k, value) in fibre.iter_mut().enumerate()
            {
                *value = block[k * inner + r];
            }
            function(&mut fibre);
            for (k, &value) in fibre.iter().enumerate()
            {
                block[k * inner + r] = value;
            }
        }
    });
}

#[test]
fn check_sweep_middle_dimension()
{
    // shape [2, 3, 2], sweep dimension 1 reversing each fibre
    let mut data: Vec<f64> = (0..12).map(f64::from).collect();
    sweep_in_place(&mut data, 3, 2, &|fibre: &mut [f64]| fibre.reverse());
    assert_eq!(data, vec![4.0, 5.0, 2.0, 3.0, 0.0, 1.0, 10.0, 11.0, 8.0, 9.0, 6.0, 7.0]);
}
