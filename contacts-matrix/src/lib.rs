//! Sparse contact-frequency matrices (e.g. Hi-C) and their aggregation.
//!
//! Matrices are read from coordinate Matrix Market files (optionally
//! gzipped) or scipy `.npz` archives, reduced element-wise with a sum, mean
//! or median, and written back as Matrix Market.
pub mod average;
pub mod consts;
pub mod errors;
pub mod matrix_market;
pub mod models;
pub mod npz;

// re-exports
pub use average::*;
pub use errors::MatrixError;
pub use matrix_market::*;
pub use models::ContactMatrix;
pub use npz::{NpzFormat, read_npz};
