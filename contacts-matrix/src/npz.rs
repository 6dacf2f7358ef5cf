use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::debug;
use ndarray::Array1;
use ndarray_npy::{NpzReader, ReadNpzError, ReadableElement};
use zip::ZipArchive;

use crate::consts::{NPY_MAGIC, NPZ_FORMAT_ENTRY};
use crate::errors::MatrixError;
use crate::models::ContactMatrix;

/// Sparse layouts written by `scipy.sparse.save_npz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpzFormat {
    Csc,
    Csr,
    Coo,
}

impl FromStr for NpzFormat {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csc" => Ok(NpzFormat::Csc),
            "csr" => Ok(NpzFormat::Csr),
            "coo" => Ok(NpzFormat::Coo),
            _ => Err(MatrixError::NpzError(format!(
                "unsupported sparse format {:?}, expected csc, csr or coo",
                s
            ))),
        }
    }
}

impl Display for NpzFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NpzFormat::Csc => "csc",
            NpzFormat::Csr => "csr",
            NpzFormat::Coo => "coo",
        };
        write!(f, "{}", name)
    }
}

/// Entry names of an archive; `np.savez` stores `key` as `key.npy`.
fn find_entry<'a>(names: &'a [String], key: &str) -> Option<&'a str> {
    names
        .iter()
        .map(String::as_str)
        .find(|name| name.strip_suffix(".npy").unwrap_or(name) == key)
}

fn npz_error(path: &Path, message: impl Display) -> MatrixError {
    MatrixError::NpzError(format!("{}: {}", path.display(), message))
}

///
/// Payload of a `.npy` file holding a single byte or unicode string, as
/// scipy stores the `format` entry (`|S3` or `<U3`).
///
fn npy_string_payload(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(NPY_MAGIC) || bytes.len() < 10 {
        return None;
    }

    let major = bytes[6];
    let (header_len, offset) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        _ if bytes.len() >= 12 => (
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
            12,
        ),
        _ => return None,
    };

    let payload = bytes.get(offset + header_len..)?;
    // unicode payloads are UTF-32, ascii text leaves NUL padding behind
    let text: String = payload
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| b as char)
        .collect();
    Some(text)
}

fn read_format_entry(path: &Path, name: &str) -> Result<NpzFormat, MatrixError> {
    let file = File::open(path).map_err(|e| npz_error(path, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| npz_error(path, e))?;
    let mut entry = archive.by_name(name).map_err(|e| npz_error(path, e))?;

    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;

    let format = npy_string_payload(&bytes)
        .ok_or_else(|| npz_error(path, format!("invalid {} entry", NPZ_FORMAT_ENTRY)))?;
    NpzFormat::from_str(&format)
}

struct NpzArrays<'a> {
    path: &'a Path,
    reader: NpzReader<BufReader<File>>,
    names: Vec<String>,
}

impl<'a> NpzArrays<'a> {
    fn open(path: &'a Path) -> Result<Self, MatrixError> {
        let file = File::open(path)
            .map_err(|e| MatrixError::FileReadError(format!("{}: {}", path.display(), e)))?;
        let mut reader = NpzReader::new(BufReader::new(file)).map_err(|e| npz_error(path, e))?;
        let names = reader.names().map_err(|e| npz_error(path, e))?;
        Ok(NpzArrays {
            path,
            reader,
            names,
        })
    }

    fn entry(&self, key: &str) -> Result<String, MatrixError> {
        find_entry(&self.names, key)
            .map(str::to_string)
            .ok_or_else(|| npz_error(self.path, format!("missing array {:?}", key)))
    }

    fn has(&self, key: &str) -> bool {
        find_entry(&self.names, key).is_some()
    }

    fn read<A: ReadableElement>(&mut self, name: &str) -> Result<Array1<A>, ReadNpzError> {
        self.reader.by_name(name)
    }

    /// Read a one-dimensional array of non-negative integers (int32 or int64).
    fn read_indices(&mut self, key: &str) -> Result<Vec<usize>, MatrixError> {
        let name = self.entry(key)?;

        let values: Vec<i64> = match self.read::<i64>(&name) {
            Ok(values) => values.to_vec(),
            Err(_) => self
                .read::<i32>(&name)
                .map_err(|e| npz_error(self.path, format!("array {:?}: {}", key, e)))?
                .iter()
                .map(|&v| v as i64)
                .collect(),
        };

        values
            .into_iter()
            .map(|v| {
                usize::try_from(v)
                    .map_err(|_| npz_error(self.path, format!("negative value {} in {:?}", v, key)))
            })
            .collect()
    }

    /// Read the stored values, converting integer and single precision data.
    fn read_data(&mut self) -> Result<Vec<f64>, MatrixError> {
        let name = self.entry("data")?;

        if let Ok(values) = self.read::<f64>(&name) {
            return Ok(values.to_vec());
        }
        if let Ok(values) = self.read::<f32>(&name) {
            return Ok(values.iter().map(|&v| v as f64).collect());
        }
        if let Ok(values) = self.read::<i64>(&name) {
            return Ok(values.iter().map(|&v| v as f64).collect());
        }
        match self.read::<i32>(&name) {
            Ok(values) => Ok(values.iter().map(|&v| v as f64).collect()),
            Err(e) => Err(npz_error(
                self.path,
                format!("array \"data\" must hold float64, float32, int64 or int32 values: {}", e),
            )),
        }
    }

    fn format(&self) -> Result<NpzFormat, MatrixError> {
        if self.has(NPZ_FORMAT_ENTRY) {
            return read_format_entry(self.path, &self.entry(NPZ_FORMAT_ENTRY)?);
        }
        // without a format entry the arrays present decide
        if self.has("row") && self.has("col") {
            Ok(NpzFormat::Coo)
        } else {
            Ok(NpzFormat::Csc)
        }
    }
}

///
/// Expand compressed (csc or csr) storage into 0-based `(row, col, value)` triplets.
///
fn compressed_triplets(
    format: NpzFormat,
    shape: (usize, usize),
    indptr: &[usize],
    indices: &[usize],
    data: &[f64],
) -> Result<Vec<(usize, usize, f64)>, String> {
    let outer = match format {
        NpzFormat::Csr => shape.0,
        _ => shape.1,
    };

    if indptr.len() != outer + 1 {
        return Err(format!(
            "indptr has {} entries, expected {} for a {}x{} {} matrix",
            indptr.len(),
            outer + 1,
            shape.0,
            shape.1,
            format
        ));
    }
    if indices.len() != data.len() {
        return Err(format!(
            "indices has {} entries but data has {}",
            indices.len(),
            data.len()
        ));
    }

    let mut triplets = Vec::with_capacity(data.len());
    for (major, bounds) in indptr.windows(2).enumerate() {
        let (start, stop) = (bounds[0], bounds[1]);
        if start > stop || stop > data.len() {
            return Err(format!("indptr is not a valid offset array at {}", major));
        }
        for k in start..stop {
            match format {
                NpzFormat::Csr => triplets.push((major, indices[k], data[k])),
                _ => triplets.push((indices[k], major, data[k])),
            }
        }
    }

    Ok(triplets)
}

///
/// Read a sparse matrix saved with `scipy.sparse.save_npz`.
///
/// csc, csr and coo archives are supported. Indices may be int32 or int64,
/// and values float64, float32, int64 or int32. Duplicate coordinates are
/// summed.
///
/// # Arguments
/// - path: the `.npz` archive
///
pub fn read_npz<P: AsRef<Path>>(path: P) -> Result<ContactMatrix, MatrixError> {
    let path = path.as_ref();
    let mut arrays = NpzArrays::open(path)?;

    let shape = arrays.read_indices("shape")?;
    let shape = match shape.as_slice() {
        &[rows, cols] => (rows, cols),
        other => {
            return Err(npz_error(
                path,
                format!("shape must have two entries, found {}", other.len()),
            ));
        }
    };

    let format = arrays.format()?;
    let data = arrays.read_data()?;

    let triplets = match format {
        NpzFormat::Coo => {
            let rows = arrays.read_indices("row")?;
            let cols = arrays.read_indices("col")?;
            if rows.len() != data.len() || cols.len() != data.len() {
                return Err(npz_error(
                    path,
                    "row, col and data must have the same length",
                ));
            }
            rows.into_iter()
                .zip(cols)
                .zip(data)
                .map(|((row, col), value)| (row, col, value))
                .collect()
        }
        NpzFormat::Csc | NpzFormat::Csr => {
            let indptr = arrays.read_indices("indptr")?;
            let indices = arrays.read_indices("indices")?;
            compressed_triplets(format, shape, &indptr, &indices, &data)
                .map_err(|message| npz_error(path, message))?
        }
    };

    debug!(
        "Read {}x{} {} matrix with {} entries from {}",
        shape.0,
        shape.1,
        format,
        triplets.len(),
        path.display()
    );

    ContactMatrix::from_triplets(shape, &triplets)
}
