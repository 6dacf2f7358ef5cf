use std::io::{BufRead, Write};
use std::path::Path;

use contacts_core::utils::{get_dynamic_reader, get_dynamic_writer};
use log::debug;

use crate::consts::MTX_BANNER;
use crate::errors::MatrixError;
use crate::models::ContactMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Symmetry {
    General,
    Symmetric,
}

fn parse_error(line: usize, message: impl Into<String>) -> MatrixError {
    MatrixError::ParseError {
        line,
        message: message.into(),
    }
}

fn parse_banner(banner: &str) -> Result<(Field, Symmetry), MatrixError> {
    let tokens: Vec<String> = banner.split_whitespace().map(|t| t.to_lowercase()).collect();

    if tokens.len() != 5 || tokens[0] != MTX_BANNER.to_lowercase() {
        return Err(parse_error(1, format!("invalid header: {}", banner)));
    }
    if tokens[1] != "matrix" || tokens[2] != "coordinate" {
        return Err(parse_error(
            1,
            "only coordinate (sparse) matrices are supported",
        ));
    }

    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        other => return Err(parse_error(1, format!("unsupported field type: {}", other))),
    };

    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        other => return Err(parse_error(1, format!("unsupported symmetry: {}", other))),
    };

    Ok((field, symmetry))
}

fn parse_index(token: Option<&str>, line: usize, what: &str) -> Result<usize, MatrixError> {
    let token = token.ok_or_else(|| parse_error(line, format!("missing {}", what)))?;
    token
        .parse::<usize>()
        .map_err(|_| parse_error(line, format!("invalid {}: {}", what, token)))
}

///
/// Read a sparse matrix from a coordinate Matrix Market file.
///
/// Files ending in `.gz` are decompressed on the fly. Symmetric matrices
/// are expanded so that both triangles are stored.
///
/// # Arguments
/// - path: path to the `.mtx` or `.mtx.gz` file
///
pub fn read_matrix_market<P: AsRef<Path>>(path: P) -> Result<ContactMatrix, MatrixError> {
    let path = path.as_ref();
    let reader = get_dynamic_reader(path)
        .map_err(|e| MatrixError::FileReadError(format!("{:#}", e)))?;

    let mut lines = reader.lines().enumerate();

    let (field, symmetry) = match lines.next() {
        Some((_, banner)) => parse_banner(&banner?)?,
        None => return Err(parse_error(1, "empty file")),
    };

    let mut shape: Option<(usize, usize, usize)> = None;
    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();

    for (idx, line) in lines {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();

        let (rows, cols, nnz) = match shape {
            None => {
                let rows = parse_index(fields.next(), line_no, "row count")?;
                let cols = parse_index(fields.next(), line_no, "column count")?;
                let nnz = parse_index(fields.next(), line_no, "entry count")?;
                shape = Some((rows, cols, nnz));
                triplets.reserve(nnz);
                continue;
            }
            Some(shape) => shape,
        };

        if triplets.len() >= nnz && symmetry == Symmetry::General {
            return Err(parse_error(line_no, format!("more than {} entries", nnz)));
        }

        let row = parse_index(fields.next(), line_no, "row index")?;
        let col = parse_index(fields.next(), line_no, "column index")?;
        if row == 0 || col == 0 || row > rows || col > cols {
            return Err(parse_error(
                line_no,
                format!("entry ({}, {}) outside of a {}x{} matrix", row, col, rows, cols),
            ));
        }

        let value = match field {
            Field::Pattern => 1.0,
            Field::Real | Field::Integer => {
                let token = fields
                    .next()
                    .ok_or_else(|| parse_error(line_no, "missing value"))?;
                token
                    .parse::<f64>()
                    .map_err(|_| parse_error(line_no, format!("invalid value: {}", token)))?
            }
        };

        // Matrix Market indices are 1-based
        triplets.push((row - 1, col - 1, value));
        if symmetry == Symmetry::Symmetric && row != col {
            triplets.push((col - 1, row - 1, value));
        }
    }

    let (rows, cols, nnz) = shape.ok_or_else(|| parse_error(1, "missing size line"))?;

    let stored = match symmetry {
        Symmetry::General => triplets.len(),
        Symmetry::Symmetric => triplets.iter().filter(|(r, c, _)| r >= c).count(),
    };
    if stored != nnz {
        return Err(parse_error(
            1,
            format!("expected {} entries but found {}", nnz, stored),
        ));
    }

    debug!(
        "Read {}x{} matrix with {} entries from {}",
        rows,
        cols,
        triplets.len(),
        path.display()
    );

    ContactMatrix::from_triplets((rows, cols), &triplets)
}

///
/// Write a sparse matrix as a `real general` coordinate Matrix Market file.
///
/// Triplets are sorted by (row, col) and written 1-indexed. The output is
/// gzip compressed when `path` ends in `.gz`.
///
pub fn write_matrix_market<P: AsRef<Path>>(
    matrix: &ContactMatrix,
    path: P,
) -> Result<(), MatrixError> {
    let path = path.as_ref();
    let mut writer = get_dynamic_writer(path)
        .map_err(|e| MatrixError::FileWriteError(format!("{:#}", e)))?;

    let (rows, cols) = matrix.shape();
    let triplets = matrix.triplets();

    writeln!(writer, "{} matrix coordinate real general", MTX_BANNER)?;
    writeln!(writer, "{} {} {}", rows, cols, triplets.len())?;

    for (row, col, value) in triplets {
        writeln!(writer, "{} {} {}", row + 1, col + 1, value)?;
    }

    writer.flush()?;

    debug!("Wrote {}x{} matrix to {}", rows, cols, path.display());

    Ok(())
}
