/// Dense row-major `rows × cols` matrix of `f32`.
///
/// The shape is fixed at construction; only values can change afterwards.
///
/// # Example
///
/// ```
/// use evoluvine_network::Matrix;
///
/// let m = Matrix::from_fn(2, 3, |r, c| (r * 3 + c) as f32);
/// assert_eq!(m.row(1), &[3.0, 4.0, 5.0]);
/// assert_eq!(m.affine(&[1.0, 0.0, 1.0], &[0.5, -0.5]), vec![2.5, 7.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Nested row vectors, as stored in persisted models.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Computes `self · input + bias`.
    ///
    /// # Panics
    ///
    /// Panics if `input.len() != cols` or `bias.len() != rows`.
    #[must_use]
    pub fn affine(&self, input: &[f32], bias: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.cols, "input length must match column count");
        assert_eq!(bias.len(), self.rows, "bias length must match row count");
        (0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .zip(input)
                    .map(|(w, a)| w * a)
                    .sum::<f32>()
                    + bias[r]
            })
            .collect()
    }
}

/// Index of the first maximal value, or `None` for an empty slice.
///
/// NaN entries never win.
///
/// ```
/// use evoluvine_network::argmax;
///
/// assert_eq!(argmax(&[0.2, 0.7, 0.7]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// ```
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] || (values[best].is_nan() && !v.is_nan()) {
            best = i;
        }
    }
    (!values.is_empty()).then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let m = Matrix::from_fn(2, 2, |r, c| (10 * r + c) as f32);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 10.0, 11.0]);
        assert_eq!(m.to_rows(), vec![vec![0.0, 1.0], vec![10.0, 11.0]]);
        assert_eq!(m.shape(), (2, 2));
    }

    #[test]
    fn test_affine_identity() {
        let m = Matrix::from_fn(3, 3, |r, c| if r == c { 1.0 } else { 0.0 });
        assert_eq!(
            m.affine(&[1.0, 2.0, 3.0], &[0.0, 0.0, 1.0]),
            vec![1.0, 2.0, 4.0]
        );
    }

    #[test]
    #[should_panic(expected = "input length")]
    fn test_affine_rejects_wrong_input_length() {
        let _ = Matrix::zeros(2, 3).affine(&[1.0, 2.0], &[0.0, 0.0]);
    }

    #[test]
    fn test_argmax_first_of_ties() {
        assert_eq!(argmax(&[1.0, 1.0, 1.0]), Some(0));
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.5, 0.2]), Some(1));
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), Some(0));
    }
}
