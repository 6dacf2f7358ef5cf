use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Zip};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::distance::condensed_len;
use crate::errors::PbcError;

///
/// A rectangular periodic cell. Each axis wraps independently with the
/// period given by its dimension.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicBox {
    dimensions: Vec<f64>,
}

impl PeriodicBox {
    ///
    /// Create a periodic box from the period along each axis.
    ///
    /// Every period must be strictly positive; zero, negative and NaN
    /// periods are rejected.
    ///
    pub fn new(dimensions: &[f64]) -> Result<Self, PbcError> {
        if dimensions.is_empty() {
            return Err(PbcError::EmptyBox);
        }

        for (axis, &value) in dimensions.iter().enumerate() {
            // written to also catch NaN
            if !(value > 0.0) {
                return Err(PbcError::InvalidDimension { axis, value });
            }
        }

        Ok(PeriodicBox {
            dimensions: dimensions.to_vec(),
        })
    }

    pub fn dimensions(&self) -> &[f64] {
        &self.dimensions
    }

    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// Apply the minimum-image convention to a separation along `axis`.
    ///
    /// Returns the absolute separation, or its wrapped-around complement
    /// when the separation exceeds half the period.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= self.ndim()`.
    #[inline]
    pub fn minimum_image(&self, delta: f64, axis: usize) -> f64 {
        let delta = delta.abs();
        let period = self.dimensions[axis];
        if delta > 0.5 * period {
            period - delta
        } else {
            delta
        }
    }

    #[inline]
    fn pair_squared_distance(&self, p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
        p.iter()
            .zip(q.iter())
            .enumerate()
            .map(|(axis, (a, b))| {
                let delta = self.minimum_image(a - b, axis);
                delta * delta
            })
            .sum()
    }

    #[inline]
    fn finish(sqdistance: f64, squared: bool) -> f64 {
        if squared { sqdistance } else { sqdistance.sqrt() }
    }

    ///
    /// Distance between two single points.
    ///
    /// # Arguments
    /// - p, q: coordinates, one value per box dimension
    /// - squared: return the squared distance instead of the distance
    ///
    pub fn distance(&self, p: &[f64], q: &[f64], squared: bool) -> Result<f64, PbcError> {
        for point in [p, q] {
            if point.len() != self.ndim() {
                return Err(PbcError::DimensionMismatch {
                    expected: self.ndim(),
                    found: point.len(),
                });
            }
        }

        let sqdistance = self.pair_squared_distance(ArrayView1::from(p), ArrayView1::from(q));
        Ok(Self::finish(sqdistance, squared))
    }

    fn check_points(&self, points: &ArrayView2<f64>) -> Result<(), PbcError> {
        // an empty set has nothing to compare, its column count is irrelevant
        if points.nrows() > 0 && points.ncols() != self.ndim() {
            return Err(PbcError::DimensionMismatch {
                expected: self.ndim(),
                found: points.ncols(),
            });
        }
        Ok(())
    }

    ///
    /// Distances between every point of `x0` and every point of `x1`.
    ///
    /// Returns a matrix of shape `(x0.nrows(), x1.nrows())`.
    ///
    pub fn cdist(
        &self,
        x0: ArrayView2<f64>,
        x1: ArrayView2<f64>,
        squared: bool,
    ) -> Result<Array2<f64>, PbcError> {
        self.check_points(&x0)?;
        self.check_points(&x1)?;

        debug!(
            "Computing {}x{} periodic distances in {} dimensions",
            x0.nrows(),
            x1.nrows(),
            self.ndim()
        );

        #[cfg(feature = "parallel")]
        let out = self.cdist_parallel(x0, x1, squared);

        #[cfg(not(feature = "parallel"))]
        let out = self.cdist_sequential(x0, x1, squared);

        Ok(out)
    }

    ///
    /// Distances between all pairs `(i, j)` with `i < j` of a single point set.
    ///
    /// The result has length `n * (n - 1) / 2` and lists pairs with `i`
    /// ascending, then `j` ascending.
    ///
    pub fn pdist(&self, x: ArrayView2<f64>, squared: bool) -> Result<Array1<f64>, PbcError> {
        self.check_points(&x)?;

        let n = x.nrows();
        debug!(
            "Computing {} pairwise periodic distances in {} dimensions",
            condensed_len(n),
            self.ndim()
        );

        #[cfg(feature = "parallel")]
        let distances = self.pdist_parallel(x, squared);

        #[cfg(not(feature = "parallel"))]
        let distances = self.pdist_sequential(x, squared);

        Ok(Array1::from(distances))
    }

    #[inline]
    fn fill_row(
        &self,
        mut row: ArrayViewMut1<f64>,
        p: ArrayView1<f64>,
        x1: ArrayView2<f64>,
        squared: bool,
    ) {
        for (value, q) in row.iter_mut().zip(x1.rows()) {
            *value = Self::finish(self.pair_squared_distance(p, q), squared);
        }
    }

    /// Distances from point `i` to every later point of `x`.
    fn pdist_row(
        &self,
        x: ArrayView2<'_, f64>,
        i: usize,
        squared: bool,
    ) -> impl Iterator<Item = f64> {
        (i + 1..x.nrows())
            .map(move |j| Self::finish(self.pair_squared_distance(x.row(i), x.row(j)), squared))
    }

    #[cfg(feature = "parallel")]
    fn cdist_parallel(
        &self,
        x0: ArrayView2<f64>,
        x1: ArrayView2<f64>,
        squared: bool,
    ) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((x0.nrows(), x1.nrows()));
        Zip::from(out.rows_mut())
            .and(x0.rows())
            .par_for_each(|row, p| self.fill_row(row, p, x1, squared));
        out
    }

    #[cfg(any(test, not(feature = "parallel")))]
    fn cdist_sequential(
        &self,
        x0: ArrayView2<f64>,
        x1: ArrayView2<f64>,
        squared: bool,
    ) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((x0.nrows(), x1.nrows()));
        Zip::from(out.rows_mut())
            .and(x0.rows())
            .for_each(|row, p| self.fill_row(row, p, x1, squared));
        out
    }

    #[cfg(feature = "parallel")]
    fn pdist_parallel(&self, x: ArrayView2<f64>, squared: bool) -> Vec<f64> {
        (0..x.nrows())
            .into_par_iter()
            .flat_map_iter(|i| self.pdist_row(x, i, squared))
            .collect()
    }

    #[cfg(any(test, not(feature = "parallel")))]
    fn pdist_sequential(&self, x: ArrayView2<f64>, squared: bool) -> Vec<f64> {
        (0..x.nrows())
            .flat_map(|i| self.pdist_row(x, i, squared))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(vec![0.0, 10.0], 0, 0.0)]
    #[case(vec![10.0, -1.0], 1, -1.0)]
    #[case(vec![10.0, f64::NAN, 3.0], 1, f64::NAN)]
    fn test_invalid_dimensions(#[case] dims: Vec<f64>, #[case] axis: usize, #[case] value: f64) {
        match PeriodicBox::new(&dims) {
            Err(PbcError::InvalidDimension { axis: a, value: v }) => {
                assert_eq!(a, axis);
                assert!(v == value || (v.is_nan() && value.is_nan()));
            }
            other => panic!("expected an invalid dimension error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_empty_box() {
        assert_eq!(PeriodicBox::new(&[]), Err(PbcError::EmptyBox));
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(-4.0, 4.0)]
    #[case(5.0, 5.0)]
    #[case(9.0, 1.0)]
    #[case(-6.0, 4.0)]
    fn test_minimum_image(#[case] delta: f64, #[case] expected: f64) {
        let pbc = PeriodicBox::new(&[10.0]).unwrap();
        assert_abs_diff_eq!(pbc.minimum_image(delta, 0), expected);
    }

    #[rstest]
    #[should_panic]
    fn test_minimum_image_axis_out_of_range() {
        let pbc = PeriodicBox::new(&[10.0, 10.0]).unwrap();
        pbc.minimum_image(1.0, 2);
    }

    #[rstest]
    fn test_single_pair_distance() {
        let pbc = PeriodicBox::new(&[10.0, 10.0, 10.0]).unwrap();
        let d = pbc.distance(&[0.5, 1.0, 1.0], &[9.5, 1.0, 4.0], false).unwrap();
        assert_abs_diff_eq!(d, 10.0_f64.sqrt(), epsilon = 1e-12);

        let sq = pbc.distance(&[0.5, 1.0, 1.0], &[9.5, 1.0, 4.0], true).unwrap();
        assert_abs_diff_eq!(sq, 10.0, epsilon = 1e-12);

        assert_eq!(
            pbc.distance(&[0.5, 1.0], &[9.5, 1.0, 4.0], true),
            Err(PbcError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[rstest]
    fn test_cdist_shape_and_values() {
        let pbc = PeriodicBox::new(&[10.0, 10.0]).unwrap();
        let x0 = array![[1.0, 1.0], [9.0, 9.0], [5.0, 5.0]];
        let x1 = array![[1.0, 9.0], [0.0, 0.0]];

        let out = pbc.cdist(x0.view(), x1.view(), true).unwrap();
        assert_eq!(out.shape(), &[3, 2]);

        let expected = array![[4.0, 2.0], [4.0, 2.0], [32.0, 50.0]];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[rstest]
    fn test_cdist_dimension_mismatch() {
        let pbc = PeriodicBox::new(&[10.0, 10.0]).unwrap();
        let x0 = array![[1.0, 1.0, 1.0]];
        let x1 = array![[1.0, 9.0]];

        assert_eq!(
            pbc.cdist(x0.view(), x1.view(), false),
            Err(PbcError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_parallel_and_sequential_agree(#[case] squared: bool) {
        let pbc = PeriodicBox::new(&[10.0, 12.0, 7.5]).unwrap();
        let x = array![
            [0.5, 0.5, 0.5],
            [9.5, 11.5, 7.0],
            [5.0, 6.0, 3.75],
            [2.25, 10.0, 1.0],
            [7.75, 1.5, 6.5],
        ];
        let y = array![[4.9, 0.1, 3.0], [1.0, 11.0, 7.4]];

        let full = pbc.cdist(x.view(), y.view(), squared).unwrap();
        assert_eq!(full, pbc.cdist_sequential(x.view(), y.view(), squared));

        let condensed = pbc.pdist(x.view(), squared).unwrap();
        assert_eq!(condensed.to_vec(), pbc.pdist_sequential(x.view(), squared));

        // both agree with the single pair distance
        for i in 0..x.nrows() {
            for j in 0..y.nrows() {
                let d = pbc
                    .distance(&x.row(i).to_vec(), &y.row(j).to_vec(), squared)
                    .unwrap();
                assert_abs_diff_eq!(full[[i, j]], d, epsilon = 1e-12);
            }
        }
    }

    #[rstest]
    fn test_pdist_small() {
        let pbc = PeriodicBox::new(&[10.0, 10.0]).unwrap();
        let x = array![[1.0, 1.0], [9.0, 9.0], [1.0, 6.0]];

        let out = pbc.pdist(x.view(), true).unwrap();
        // (0,1): 2^2 + 2^2, (0,2): 0 + 5^2, (1,2): 2^2 + 3^2
        assert_eq!(out.to_vec(), vec![8.0, 25.0, 13.0]);
    }
}
