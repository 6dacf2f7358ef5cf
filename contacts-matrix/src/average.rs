use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use sprs::TriMat;

use contacts_core::utils::has_extension;

use crate::consts::{NPZ_EXTENSION, PROGRESS_TEMPLATE};
use crate::errors::MatrixError;
use crate::matrix_market::read_matrix_market;
use crate::models::ContactMatrix;
use crate::npz::read_npz;

/// How a stack of contact matrices is reduced to a single matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AverageMethod {
    #[default]
    Sum,
    Mean,
    Median,
}

impl FromStr for AverageMethod {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AverageMethod::Sum),
            "mean" => Ok(AverageMethod::Mean),
            "median" => Ok(AverageMethod::Median),
            _ => Err(MatrixError::UnknownMethod(s.to_string())),
        }
    }
}

impl Display for AverageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AverageMethod::Sum => "sum",
            AverageMethod::Mean => "mean",
            AverageMethod::Median => "median",
        };
        write!(f, "{}", name)
    }
}

/// Check that there is at least one matrix and that all share a shape.
fn common_shape(matrices: &[ContactMatrix]) -> Result<(usize, usize), MatrixError> {
    let first = matrices.first().ok_or(MatrixError::NoMatrices)?;
    let expected = first.shape();

    for (index, matrix) in matrices.iter().enumerate().skip(1) {
        if matrix.shape() != expected {
            return Err(MatrixError::ShapeMismatch {
                index,
                expected,
                found: matrix.shape(),
            });
        }
    }

    Ok(expected)
}

///
/// Element-wise sum of a set of matrices of identical shape.
///
pub fn compute_sum(matrices: &[ContactMatrix]) -> Result<ContactMatrix, MatrixError> {
    let shape = common_shape(matrices)?;

    let capacity = matrices.iter().map(|m| m.nnz()).sum();
    let mut tri = TriMat::with_capacity(shape, capacity);
    for matrix in matrices {
        for (&value, (row, col)) in matrix.inner().iter() {
            tri.add_triplet(row, col, value);
        }
    }

    // duplicate coordinates are summed during conversion
    Ok(ContactMatrix::new(tri.to_csc()))
}

///
/// Element-wise mean: the sum divided by the number of matrices.
///
pub fn compute_mean(matrices: &[ContactMatrix]) -> Result<ContactMatrix, MatrixError> {
    let summed = compute_sum(matrices)?;
    let n = matrices.len() as f64;
    Ok(ContactMatrix::new(summed.inner().map(|value| value / n)))
}

/// Median of a stack of values; NaN if any value is NaN.
fn median(values: &mut [f64]) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let count = values.len();
    if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    }
}

///
/// Element-wise median across matrices of identical shape.
///
/// Entries a matrix does not store count as zero, so the result equals the
/// median of the dense stack. Zero medians are not stored.
///
pub fn compute_median(matrices: &[ContactMatrix]) -> Result<ContactMatrix, MatrixError> {
    let shape = common_shape(matrices)?;
    let n = matrices.len();

    let mut stacked: HashMap<(usize, usize), Vec<f64>> = HashMap::new();
    for matrix in matrices {
        for (&value, (row, col)) in matrix.inner().iter() {
            stacked
                .entry((row, col))
                .or_insert_with(|| Vec::with_capacity(n))
                .push(value);
        }
    }

    let mut tri = TriMat::with_capacity(shape, stacked.len());
    for ((row, col), mut values) in stacked {
        // matrices without an entry here contribute a zero
        values.resize(n, 0.0);
        let value = median(&mut values);
        if value != 0.0 {
            tri.add_triplet(row, col, value);
        }
    }

    Ok(ContactMatrix::new(tri.to_csc()))
}

///
/// Reduce a stack of matrices with the given method.
///
pub fn average_matrices(
    matrices: &[ContactMatrix],
    method: AverageMethod,
) -> Result<ContactMatrix, MatrixError> {
    debug!("Averaging {} matrices with method {}", matrices.len(), method);
    match method {
        AverageMethod::Sum => compute_sum(matrices),
        AverageMethod::Mean => compute_mean(matrices),
        AverageMethod::Median => compute_median(matrices),
    }
}

/// Read a matrix, choosing the reader from the file extension.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<ContactMatrix, MatrixError> {
    let path = path.as_ref();
    if has_extension(path, NPZ_EXTENSION) {
        read_npz(path)
    } else {
        read_matrix_market(path)
    }
}

///
/// Load contact matrices and reduce them with the given method.
///
/// # Arguments
/// - paths: scipy `.npz`, `.mtx` or `.mtx.gz` files, all of the same shape
/// - method: sum, mean or median
///
pub fn average_matrix_files<P: AsRef<Path>>(
    paths: &[P],
    method: AverageMethod,
) -> Result<ContactMatrix, MatrixError> {
    if paths.is_empty() {
        return Err(MatrixError::NoMatrices);
    }

    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let mut matrices = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        bar.set_message(path.display().to_string());
        matrices.push(read_matrix(path)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    info!("Loaded {} contact matrices", matrices.len());

    average_matrices(&matrices, method)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn matrices() -> Vec<ContactMatrix> {
        vec![
            ContactMatrix::from_triplets((3, 3), &[(0, 0, 1.0), (0, 1, 4.0), (2, 2, 3.0)]).unwrap(),
            ContactMatrix::from_triplets((3, 3), &[(0, 0, 3.0), (1, 1, 2.0), (2, 2, 5.0)]).unwrap(),
            ContactMatrix::from_triplets((3, 3), &[(0, 0, 2.0), (0, 1, 6.0), (1, 1, 4.0)]).unwrap(),
        ]
    }

    #[rstest]
    #[case("sum", AverageMethod::Sum)]
    #[case("Mean", AverageMethod::Mean)]
    #[case("MEDIAN", AverageMethod::Median)]
    fn test_method_from_str(#[case] name: &str, #[case] expected: AverageMethod) {
        let method = AverageMethod::from_str(name).unwrap();
        assert_eq!(method, expected);
        assert_eq!(method.to_string(), name.to_lowercase());
    }

    #[rstest]
    fn test_unknown_method() {
        assert!(matches!(
            AverageMethod::from_str("mode"),
            Err(MatrixError::UnknownMethod(_))
        ));
    }

    #[rstest]
    fn test_sum(matrices: Vec<ContactMatrix>) {
        let summed = compute_sum(&matrices).unwrap();
        assert_eq!(
            summed.triplets(),
            vec![(0, 0, 6.0), (0, 1, 10.0), (1, 1, 6.0), (2, 2, 8.0)]
        );
    }

    #[rstest]
    fn test_mean(matrices: Vec<ContactMatrix>) {
        let mean = compute_mean(&matrices).unwrap();
        assert_eq!(mean.get(0, 0), 2.0);
        assert_eq!(mean.get(1, 1), 2.0);
        assert_eq!(mean.get(0, 1), 10.0 / 3.0);
        assert_eq!(mean.get(1, 0), 0.0);
    }

    #[rstest]
    fn test_median(matrices: Vec<ContactMatrix>) {
        let median = compute_median(&matrices).unwrap();
        // (0,0): [1,3,2] -> 2, (0,1): [4,0,6] -> 4, (1,1): [0,2,4] -> 2, (2,2): [3,5,0] -> 3
        assert_eq!(
            median.triplets(),
            vec![(0, 0, 2.0), (0, 1, 4.0), (1, 1, 2.0), (2, 2, 3.0)]
        );
    }

    #[rstest]
    fn test_median_even_count_and_sparse_zeros() {
        let matrices = vec![
            ContactMatrix::from_triplets((2, 2), &[(0, 0, 1.0), (1, 0, 8.0)]).unwrap(),
            ContactMatrix::from_triplets((2, 2), &[(0, 0, 3.0)]).unwrap(),
        ];
        let median = compute_median(&matrices).unwrap();
        assert_eq!(median.get(0, 0), 2.0);
        assert_eq!(median.get(1, 0), 4.0);
        assert_eq!(median.nnz(), 2);

        let matrices = vec![
            ContactMatrix::from_triplets((2, 2), &[(1, 1, 9.0)]).unwrap(),
            ContactMatrix::from_triplets((2, 2), &[]).unwrap(),
            ContactMatrix::from_triplets((2, 2), &[]).unwrap(),
        ];
        let median = compute_median(&matrices).unwrap();
        assert_eq!(median.nnz(), 0);
        assert_eq!(median.shape(), (2, 2));
    }

    #[rstest]
    fn test_median_propagates_nan() {
        let matrices = vec![
            ContactMatrix::from_triplets((2, 2), &[(0, 1, f64::NAN), (1, 1, 7.0)]).unwrap(),
            ContactMatrix::from_triplets((2, 2), &[(0, 1, 1.0), (1, 1, 7.0)]).unwrap(),
            ContactMatrix::from_triplets((2, 2), &[(0, 1, 2.0)]).unwrap(),
        ];
        let median = compute_median(&matrices).unwrap();
        assert!(median.get(0, 1).is_nan());
        assert_eq!(median.get(1, 1), 7.0);

        assert!(median_of(&[f64::NAN, 1.0, 2.0]).is_nan());
        assert!(median_of(&[3.0, 1.0, f64::NAN, 2.0]).is_nan());
        assert_eq!(median_of(&[3.0, 1.0, 2.0]), 2.0);
    }

    fn median_of(values: &[f64]) -> f64 {
        median(&mut values.to_vec())
    }

    #[rstest]
    fn test_shape_mismatch(mut matrices: Vec<ContactMatrix>) {
        matrices.push(ContactMatrix::from_triplets((3, 4), &[]).unwrap());
        for method in [AverageMethod::Sum, AverageMethod::Mean, AverageMethod::Median] {
            let result = average_matrices(&matrices, method);
            assert!(matches!(
                result,
                Err(MatrixError::ShapeMismatch {
                    index: 3,
                    expected: (3, 3),
                    found: (3, 4)
                })
            ));
        }
    }

    #[rstest]
    fn test_no_matrices() {
        assert!(matches!(
            average_matrices(&[], AverageMethod::Sum),
            Err(MatrixError::NoMatrices)
        ));
        let paths: Vec<&str> = vec![];
        assert!(matches!(
            average_matrix_files(&paths, AverageMethod::Mean),
            Err(MatrixError::NoMatrices)
        ));
    }

    #[rstest]
    fn test_median_matches_dense(matrices: Vec<ContactMatrix>) {
        let dense: Vec<_> = matrices.iter().map(|m| m.to_dense()).collect();
        let median = compute_median(&matrices).unwrap().to_dense();
        for ((row, col), value) in median.indexed_iter() {
            let mut stack: Vec<f64> = dense.iter().map(|d| d[[row, col]]).collect();
            stack.sort_by(|a, b| a.total_cmp(b));
            assert_eq!(*value, stack[1]);
        }
    }
}
