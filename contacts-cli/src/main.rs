mod average;
mod distance;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use contacts_core::logging::init_logger;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "contacts";
    pub const VERBOSE_ARG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Utilities for contact frequency matrices and periodic distance calculations.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::VERBOSE_ARG)
                .long(consts::VERBOSE_ARG)
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Verbose logging for debugging"),
        )
        .subcommand(average::cli::create_average_cli())
        .subcommand(distance::cli::create_distance_cli())
}

/// `--verbose` may be given before or after the subcommand name.
fn is_verbose(matches: &ArgMatches) -> bool {
    matches.get_flag(consts::VERBOSE_ARG)
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag(consts::VERBOSE_ARG))
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logger(is_verbose(&matches))?;

    match matches.subcommand() {
        //
        // AVERAGE CONTACT MATRICES
        //
        Some((average::cli::AVERAGE_CMD, matches)) => {
            average::handlers::run_average(matches)?;
        }

        //
        // PERIODIC DISTANCES
        //
        Some((distance::cli::DISTANCE_CMD, matches)) => {
            distance::handlers::run_distance(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
