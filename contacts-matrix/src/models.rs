use ndarray::Array2;
use sprs::{CsMat, TriMat};

use crate::errors::MatrixError;

///
/// A sparse contact-frequency matrix, stored column-compressed.
///
#[derive(Debug, Clone)]
pub struct ContactMatrix {
    matrix: CsMat<f64>,
}

impl ContactMatrix {
    pub fn new(matrix: CsMat<f64>) -> Self {
        let matrix = if matrix.is_csc() {
            matrix
        } else {
            matrix.to_csc()
        };
        ContactMatrix { matrix }
    }

    ///
    /// Build a matrix from 0-based `(row, col, value)` triplets.
    /// Duplicate coordinates are summed.
    ///
    pub fn from_triplets(
        shape: (usize, usize),
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self, MatrixError> {
        let (rows, cols) = shape;
        let mut tri = TriMat::with_capacity(shape, triplets.len());

        for &(row, col, value) in triplets {
            if row >= rows || col >= cols {
                return Err(MatrixError::IndexOutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
            tri.add_triplet(row, col, value);
        }

        let matrix: CsMat<f64> = tri.to_csc();
        Ok(ContactMatrix { matrix })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Value at `(row, col)`; entries that are not stored are zero.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix.get(row, col).copied().unwrap_or(0.0)
    }

    /// Stored entries as 0-based `(row, col, value)`, sorted by row then column.
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut triplets: Vec<(usize, usize, f64)> = self
            .matrix
            .iter()
            .map(|(&value, (row, col))| (row, col, value))
            .collect();
        triplets.sort_by_key(|&(r, c, _)| (r, c));
        triplets
    }

    pub fn to_dense(&self) -> Array2<f64> {
        self.matrix.to_dense()
    }

    pub fn inner(&self) -> &CsMat<f64> {
        &self.matrix
    }

    pub fn into_inner(self) -> CsMat<f64> {
        self.matrix
    }
}

impl From<CsMat<f64>> for ContactMatrix {
    fn from(matrix: CsMat<f64>) -> Self {
        ContactMatrix::new(matrix)
    }
}
