use clap::{Arg, ArgAction, Command, arg};

pub const DISTANCE_CMD: &str = "distance";

pub fn create_distance_cli() -> Command {
    Command::new(DISTANCE_CMD)
        .about("Compute pairwise distances between points in a periodic box (minimum-image convention).")
        .arg(
            arg!(--points <POINTS>)
                .required(true)
                .help("Whitespace separated coordinates, one point per line"),
        )
        .arg(
            arg!(--other <OTHER>)
                .required(false)
                .help("Second point set; prints the full cross-distance matrix instead of condensed pairs"),
        )
        .arg(
            arg!(--dims <DIMS>)
                .required(true)
                .help("Comma separated box period along each axis, e.g. 10,10,10"),
        )
        .arg(
            Arg::new("squared")
                .long("squared")
                .action(ArgAction::SetTrue)
                .help("Report squared euclidean distances"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
}
