use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use contacts_core::utils::has_extension;
use contacts_matrix::consts::{self, MTX_EXTENSIONS};
use contacts_matrix::{AverageMethod, average_matrix_files, write_matrix_market};

/// Require the output path to name a Matrix Market file.
pub fn validate_output_path(out: &str) -> Result<()> {
    let path = Path::new(out);
    if MTX_EXTENSIONS.iter().any(|ext| has_extension(path, ext)) {
        Ok(())
    } else {
        anyhow::bail!(
            "Output file must end in .{}: {}",
            MTX_EXTENSIONS.join(" or ."),
            out
        )
    }
}

pub fn run_average(matches: &ArgMatches) -> Result<()> {
    let matrices: Vec<&String> = matches
        .get_many::<String>("matrices")
        .expect("At least one input matrix is required.")
        .collect();

    let default_out = consts::DEFAULT_OUT.to_string();
    let out = matches.get_one::<String>("out").unwrap_or(&default_out);

    let method = match matches.get_one::<String>("method") {
        Some(method) => AverageMethod::from_str(method)?,
        None => consts::DEFAULT_METHOD,
    };

    validate_output_path(out)?;

    info!(
        "Averaging {} matrices with method {} into {}",
        matrices.len(),
        method,
        out
    );

    let averaged = average_matrix_files(&matrices, method)
        .context("Failed to average contact matrices")?;

    write_matrix_market(&averaged, out)
        .with_context(|| format!("Failed to write averaged matrix to {}", out))?;

    info!(
        "Wrote {}x{} matrix with {} entries to {}",
        averaged.shape().0,
        averaged.shape().1,
        averaged.nnz(),
        out
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use contacts_matrix::read_matrix_market;
    use rstest::rstest;
    use tempfile::tempdir;

    use crate::build_parser;

    #[rstest]
    #[case("averaged.mtx", true)]
    #[case("out/averaged.mtx.gz", true)]
    #[case("averaged.npz", false)]
    #[case("averaged", false)]
    fn test_validate_output_path(#[case] out: &str, #[case] ok: bool) {
        assert_eq!(validate_output_path(out).is_ok(), ok);
    }

    #[rstest]
    fn test_run_average_mean() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mtx");
        let b = dir.path().join("b.mtx");
        let out = dir.path().join("mean.mtx");
        fs::write(&a, "%%MatrixMarket matrix coordinate real general\n2 2 1\n1 2 3.0\n").unwrap();
        fs::write(&b, "%%MatrixMarket matrix coordinate real general\n2 2 1\n1 2 5.0\n").unwrap();

        let matches = build_parser().get_matches_from([
            "contacts",
            "average",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            "--method",
            "mean",
            "-o",
            out.to_str().unwrap(),
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        run_average(sub).unwrap();

        let averaged = read_matrix_market(&out).unwrap();
        assert_eq!(averaged.triplets(), vec![(0, 1, 4.0)]);
    }

    #[rstest]
    fn test_run_average_npz_inputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("median.mtx.gz");
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../contacts-matrix/tests/data");

        let matches = build_parser().get_matches_from([
            "contacts",
            "average",
            data.join("rep1.npz").to_str().unwrap(),
            data.join("rep2.npz").to_str().unwrap(),
            "--method",
            "median",
            "-o",
            out.to_str().unwrap(),
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        run_average(sub).unwrap();

        let averaged = read_matrix_market(&out).unwrap();
        assert_eq!(averaged.shape(), (4, 4));
        assert_eq!(
            averaged.triplets(),
            vec![(0, 0, 8.0), (0, 1, 6.0), (1, 0, 4.0), (3, 3, 1.0)]
        );
    }

    #[rstest]
    fn test_run_average_rejects_bad_output() {
        let matches = build_parser().get_matches_from([
            "contacts",
            "average",
            "a.mtx",
            "-o",
            "averaged.npz",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        assert!(run_average(sub).is_err());
    }
}
