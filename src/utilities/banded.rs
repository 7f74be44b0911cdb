///
/// LU factorisation with partial pivoting of a square band matrix with `kl`
/// sub-diagonals and `ku` super-diagonals.
///
/// Row `i` stores columns `i - kl ..= i + kl + ku`; the extra `kl` columns hold
/// the fill-in produced by row interchanges.
///
#[derive(Clone, Debug)]
pub struct BandedLu
{
    n: usize,
    kl: usize,
    ku: usize,
    width: usize,
    band: Vec<f64>,
    pivots: Vec<usize>,
}

impl BandedLu
{
    ///
    /// Empty `n x n` matrix, to be filled with [`BandedLu::set`] and then
    /// factorised.
    ///
    pub fn zeros(n: usize, kl: usize, ku: usize) -> Self
    {
        let width = 2 * kl + ku + 1;
        Self { n, kl, ku, width, band: vec![0.0; n * width], pivots: (0..n).collect() }
    }

    #[inline]
    pub fn len(&self) -> usize
    {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.n == 0
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize
    {
        debug_assert!(col + self.kl >= row && col <= row + self.kl + self.ku);
        row * self.width + col + self.kl - row
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64
    {
        if col + self.kl < row || col > row + self.kl + self.ku
        {
            0.0
        }
        else
        {
            self.band[self.offset(row, col)]
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64)
    {
        let offset = self.offset(row, col);
        self.band[offset] = value;
    }

    ///
    /// Factorise in place. Returns the first column without a usable pivot if
    /// the matrix is singular.
    ///
    pub fn factorize(&mut self) -> Result<(), usize>
    {
        let n = self.n;
        let reach = self.kl + self.ku;
        for j in 0..n
        {
            let last_row = (j + self.kl).min(n - 1);
            let mut pivot = j;
            let mut pivot_value = self.get(j, j).abs();
            for i in j + 1..=last_row
            {
                let value = self.get(i, j).abs();
                if value > pivot_value
                {
                    pivot = i;
                    pivot_value = value;
                }
            }
            if pivot_value == 0.0 || !pivot_value.is_finite()
            {
                return Err(j);
            }
            let last_col = (j + reach).min(n - 1);
            self.pivots[j] = pivot;
            if pivot != j
            {
                for c in j..=last_col
                {
                    let a = self.offset(j, c);
                    let b = self.offset(pivot, c);
                    self.band.swap(a, b);
                }
            }
            let diagonal = self.get(j, j);
            for i in j + 1..=last_row
            {
                let factor = self.get(i, j) / diagonal;
                self.set(i, j, factor);
                if factor != 0.0
                {
                    for c in j + 1..=last_col
                    {
                        let value = self.get(i, c) - factor * self.get(j, c);
                        self.set(i, c, value);
                    }
                }
            }
        }
        Ok(())
    }

    ///
    /// Solve `A x = b` in place using a factorised matrix.
    ///
    pub fn solve(&self, b: &mut [f64])
    {
        let n = self.n;
        let reach = self.kl + self.ku;
        for j in 0..n
        {
            let pivot = self.pivots[j];
            if pivot != j
            {
                b.swap(j, pivot);
            }
            let bj = b[j];
            for i in j + 1..=(j + self.kl).min(n - 1)
            {
                b[i] -= self.get(i, j) * bj;
            }
        }
        for i in (0..n).rev()
        {
            let mut sum = b[i];
            for c in i + 1..=(i + reach).min(n - 1)
            {
                sum -= self.get(i, c) * b[c];
            }
            b[i] = sum / self.get(i, i);
        }
    }
}

#[test]
fn check_tridiagonal_solve()
{
    // [2 1 0; 1 3 1; 0 1 4] x = [4, 9, 10] -> x = [1, 2, 2]
    let mut lu = BandedLu::zeros(3, 1, 1);
    let rows = [[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]];
    for (i, row) in rows.iter().enumerate()
    {
        for (j, &value) in row.iter().enumerate()
        {
            if j + 1 >= i && j <= i + 1
            {
                lu.set(i, j, value);
            }
        }
    }
    lu.factorize().unwrap();
    let mut b = [4.0, 9.0, 10.0];
    lu.solve(&mut b);
    for (x, expected) in b.iter().zip([1.0, 2.0, 2.0])
    {
        assert!((x - expected).abs() < 1e-12);
    }
}

#[test]
fn check_pivoting_solve()
{
    // zero on the leading diagonal forces a row interchange
    let mut lu = BandedLu::zeros(3, 1, 1);
    lu.set(0, 0, 0.0);
    lu.set(0, 1, 1.0);
    lu.set(1, 0, 2.0);
    lu.set(1, 1, 1.0);
    lu.set(1, 2, 1.0);
    lu.set(2, 1, 1.0);
    lu.set(2, 2, 3.0);
    lu.factorize().unwrap();
    // x = [1, 2, 3]
    let mut b = [2.0, 7.0, 11.0];
    lu.solve(&mut b);
    for (x, expected) in b.iter().zip([1.0, 2.0, 3.0])
    {
        assert!((x - expected).abs() < 1e-12);
    }
}

#[test]
fn check_singular_matrix()
{
    let mut lu = BandedLu::zeros(2, 1, 1);
    lu.set(0, 0, 1.0);
    lu.set(0, 1, 2.0);
    lu.set(1, 0, 2.0);
    lu.set(1, 1, 4.0);
    assert_eq!(lu.factorize(), Err(1));
}
