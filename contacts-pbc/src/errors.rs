use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PbcError {
    #[error("Dimension mismatch: box has {expected} dimensions but points have {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid box configuration: period {value} on axis {axis} must be positive")]
    InvalidDimension { axis: usize, value: f64 },

    #[error("Invalid box configuration: box must have at least one dimension")]
    EmptyBox,
}
