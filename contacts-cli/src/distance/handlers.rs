use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, info};
use ndarray::Array2;

use contacts_core::utils::{get_dynamic_reader, get_dynamic_writer, is_bed_header};
use contacts_pbc::PeriodicBox;

/// Parse a comma separated list of box periods, e.g. `10,10,12.5`.
pub fn parse_dims(dims: &str) -> Result<Vec<f64>> {
    dims.split(',')
        .map(|d| {
            d.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid box dimension: {:?}", d))
        })
        .collect()
}

///
/// Read whitespace separated coordinates, one point per line.
///
/// Blank lines and header lines (`#`, `track`, `browser`) are skipped.
/// Every point must have the same number of coordinates.
///
pub fn read_points<R: BufRead>(reader: R) -> Result<Array2<f64>> {
    let mut values: Vec<f64> = Vec::new();
    let mut ndim: Option<usize> = None;
    let mut npoints = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_bed_header(&line) {
            continue;
        }

        let point = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .with_context(|| format!("Invalid coordinate on line {}: {}", idx + 1, line))?;

        match ndim {
            None => ndim = Some(point.len()),
            Some(d) if d != point.len() => anyhow::bail!(
                "Line {} has {} coordinates, expected {}",
                idx + 1,
                point.len(),
                d
            ),
            Some(_) => {}
        }

        values.extend(point);
        npoints += 1;
    }

    let points = Array2::from_shape_vec((npoints, ndim.unwrap_or(0)), values)?;
    Ok(points)
}

fn read_points_file(path: &str) -> Result<Array2<f64>> {
    let reader = get_dynamic_reader(Path::new(path))?;
    let points = read_points(reader).with_context(|| format!("Failed to read points from {}", path))?;
    debug!("Read {} points from {}", points.nrows(), path);
    Ok(points)
}

pub fn run_distance(matches: &ArgMatches) -> Result<()> {
    let points_path = matches
        .get_one::<String>("points")
        .expect("A path to a points file is required.");
    let dims = matches
        .get_one::<String>("dims")
        .expect("Box dimensions are required.");
    let other_path = matches.get_one::<String>("other");
    let output_path = matches.get_one::<String>("output");
    let squared = matches.get_flag("squared");

    let pbc = PeriodicBox::new(&parse_dims(dims)?)?;
    let points = read_points_file(points_path)?;

    let mut out: Box<dyn Write> = match output_path {
        Some(p) => Box::new(get_dynamic_writer(Path::new(p))?),
        None => Box::new(io::stdout().lock()),
    };

    match other_path {
        Some(other_path) => {
            let other = read_points_file(other_path)?;
            let distances = pbc.cdist(points.view(), other.view(), squared)?;
            info!(
                "Computed {}x{} periodic distances",
                distances.nrows(),
                distances.ncols()
            );
            for row in distances.rows() {
                let line: Vec<String> = row.iter().map(|d| d.to_string()).collect();
                writeln!(out, "{}", line.join("\t"))?;
            }
        }
        None => {
            let distances = pbc.pdist(points.view(), squared)?;
            info!("Computed {} pairwise periodic distances", distances.len());
            for d in distances.iter() {
                writeln!(out, "{}", d)?;
            }
        }
    }

    out.flush()?;

    Ok(())
}
