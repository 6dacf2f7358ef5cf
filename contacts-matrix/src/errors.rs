use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Can't write file: {0}")]
    FileWriteError(String),

    #[error("Error parsing Matrix Market file at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Error reading npz archive {0}")]
    NpzError(String),

    #[error("Entry ({row}, {col}) is outside of a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Matrix {index} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("No matrices to average")]
    NoMatrices,

    #[error("Unknown average method: {0}. Expected one of: mean, median, sum")]
    UnknownMethod(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
