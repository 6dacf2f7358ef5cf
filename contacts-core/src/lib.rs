//! Shared helpers for the contacts tools.
//!
//! - [`models::GenomicCoordinates`]: `CHR:START-END` parsing and validation
//! - [`models::ScoreTransform`]: `none`, `sqrt` and `log` score transforms
//! - [`utils`]: gzip aware readers and writers, BED headers, beads, atom groups, JSON
//! - [`logging`]: the stderr `log` backend used by the command line tools
pub mod errors;
pub mod logging;
pub mod models;
pub mod utils;

// re-exports
pub use errors::CoreError;
pub use models::transform::transform_scores;
pub use models::{GenomicCoordinates, ScoreTransform};
