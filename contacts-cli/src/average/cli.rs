use clap::{Arg, Command, arg};

use contacts_matrix::consts::DEFAULT_OUT;

pub const AVERAGE_CMD: &str = "average";

pub fn create_average_cli() -> Command {
    Command::new(AVERAGE_CMD)
        .about("Average contact frequency matrices (scipy .npz or Matrix Market, optionally gzipped).")
        .arg(
            Arg::new("matrices")
                .required(true)
                .num_args(1..)
                .help("Input contact matrices: .npz, .mtx or .mtx.gz"),
        )
        .arg(
            arg!(-o --out <OUT>)
                .required(false)
                .default_value(DEFAULT_OUT)
                .help("Averaged contact matrix, .mtx or .mtx.gz"),
        )
        .arg(
            arg!(--method <METHOD>)
                .required(false)
                .default_value("sum")
                .value_parser(["mean", "median", "sum"])
                .help("Method to compute average of matrices"),
        )
}
