use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Invalid coordinates: {0}. Expected format is CHR:START-END e.g chr1:1-1000. Chromosome name cannot contain \": -\"."
    )]
    InvalidCoordinates(String),

    #[error("Start coordinate {start} not less than end coordinate {end}.")]
    InvalidCoordinateRange { start: u64, end: u64 },

    #[error("Unknown score transform: {0}. Expected one of: none, sqrt, log")]
    UnknownTransform(String),

    #[error("Bead size must be greater than zero")]
    InvalidBeadSize,

    #[error("Atom group not found: {0}")]
    UnknownAtomGroup(String),

    #[error("Can't parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
