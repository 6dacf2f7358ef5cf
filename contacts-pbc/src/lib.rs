//! Pairwise distances under periodic boundary conditions.
//!
//! Points live in a rectangular box that wraps around along every axis.
//! Separations follow the minimum-image convention: per axis, the shorter of
//! the direct and the wrapped-around separation is used before combining
//! axes into a euclidean (or squared euclidean) distance.
//!
//! # Example
//!
//! ```
//! use contacts_pbc::{cdist_periodic, pdist_periodic};
//! use ndarray::array;
//!
//! let points = array![[1.0, 1.0], [9.0, 9.0]];
//!
//! let condensed = pdist_periodic(points.view(), &[10.0, 10.0], true).unwrap();
//! assert_eq!(condensed.to_vec(), vec![8.0]);
//!
//! let full = cdist_periodic(points.view(), points.view(), &[10.0, 10.0], true).unwrap();
//! assert_eq!(full[[0, 1]], 8.0);
//! ```
pub mod distance;
pub mod errors;
pub mod periodic_box;

// re-exports
pub use distance::*;
pub use errors::PbcError;
pub use periodic_box::PeriodicBox;
