use ndarray::{Array1, Array2, ArrayView2};

use crate::errors::PbcError;
use crate::periodic_box::PeriodicBox;

///
/// Periodic distances between two point sets.
///
/// # Arguments
/// - x0: points of shape `(n0, d)`
/// - x1: points of shape `(n1, d)`
/// - dimensions: period of the box along each of the `d` axes
/// - squared: return squared euclidean distances
///
/// Returns a matrix of shape `(n0, n1)`.
///
pub fn cdist_periodic(
    x0: ArrayView2<f64>,
    x1: ArrayView2<f64>,
    dimensions: &[f64],
    squared: bool,
) -> Result<Array2<f64>, PbcError> {
    PeriodicBox::new(dimensions)?.cdist(x0, x1, squared)
}

///
/// Periodic distances between all pairs of a single point set, in
/// condensed (upper triangle, row-major) order.
///
/// # Arguments
/// - x: points of shape `(n, d)`
/// - dimensions: period of the box along each of the `d` axes
/// - squared: return squared euclidean distances
///
pub fn pdist_periodic(
    x: ArrayView2<f64>,
    dimensions: &[f64],
    squared: bool,
) -> Result<Array1<f64>, PbcError> {
    PeriodicBox::new(dimensions)?.pdist(x, squared)
}

/// Number of pairs `(i, j)` with `i < j` among `n` points.
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of the pair `(i, j)` in a condensed distance vector over `n`
/// points. The pair is unordered; `None` for `i == j` or out of range indices.
pub fn condensed_index(n: usize, i: usize, j: usize) -> Option<usize> {
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    if i == j || j >= n {
        return None;
    }
    // pairs before row i: (n-1) + (n-2) + ... + (n-i)
    Some(i * (2 * n - i - 1) / 2 + (j - i - 1))
}
