use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs::File;
use std::hash::Hash;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::de::DeserializeOwned;

use crate::errors::CoreError;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Get a writer that gzips its output when the path ends in `.gz`.
///
/// # Arguments
///
/// - path: path to the file to create
///
pub fn get_dynamic_writer(path: &Path) -> Result<BufWriter<Box<dyn Write>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let file: Box<dyn Write> = match is_gzipped {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    Ok(BufWriter::new(file))
}

/// Check whether the file name of `path` ends with `.{extension}`.
/// Compound extensions such as `mtx.gz` are supported.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let suffix = format!(".{}", extension.trim_start_matches('.'));
            name.len() > suffix.len() && name.ends_with(&suffix)
        })
        .unwrap_or(false)
}

/// Return true for empty lines and BED header lines (`browser`, `track`, `#`).
pub fn is_bed_header(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || ["browser", "track", "#"].iter().any(|p| line.starts_with(p))
}

/// Return the bead (bin) index a genomic position falls into when
/// the genome is divided into beads of `nbases` bases.
pub fn get_bead(pos: u64, nbases: u64) -> Result<u64, CoreError> {
    if nbases == 0 {
        return Err(CoreError::InvalidBeadSize);
    }
    Ok(pos / nbases)
}

///
/// Count the unique atoms across a set of named atom groups.
///
/// # Arguments
///
/// - groups: atom group name to member atoms
/// - key: restrict the count to a single group
///
pub fn count_atoms<A>(groups: &HashMap<String, Vec<A>>, key: Option<&str>) -> Result<usize, CoreError>
where
    A: Eq + Hash,
{
    let mut unique_atoms: HashSet<&A> = HashSet::new();

    match key {
        Some(key) => {
            let atoms = groups
                .get(key)
                .ok_or_else(|| CoreError::UnknownAtomGroup(key.to_string()))?;
            unique_atoms.extend(atoms.iter());
        }
        None => {
            for atoms in groups.values() {
                unique_atoms.extend(atoms.iter());
            }
        }
    }

    Ok(unique_atoms.len())
}

/// Read a JSON encoded file into any deserializable type.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, CoreError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}

/// Read a JSON file of atom groups, e.g. `{"chr1": [0, 1, 2], "chr2": [2, 3]}`.
pub fn read_atom_groups<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Vec<u64>>, CoreError> {
    read_json(path)
}
