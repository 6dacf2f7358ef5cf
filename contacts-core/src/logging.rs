use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Implementation of `log::Log` writing `time - LEVEL - target - message`
/// lines to stderr.
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_record(
                &chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
                record,
            );
            // nowhere left to report a failed write to stderr
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn format_record(timestamp: &str, record: &Record) -> String {
    format!(
        "{} - {} - {} - {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

/// Level used by the command line tools: `Debug` when `--verbose` is given.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

///
/// Install the stderr logger as the global `log` backend.
///
/// Fails if another logger was already installed.
///
pub fn init_logger(verbose: bool) -> Result<(), SetLoggerError> {
    let level = level_for(verbose);
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::Level;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_level_for() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }

    #[rstest]
    fn test_format_record() {
        let line = format_record(
            "2024-01-01 12:00:00,000",
            &Record::builder()
                .args(format_args!("loaded 3 matrices"))
                .level(Level::Info)
                .target("contacts_matrix::average")
                .build(),
        );
        assert_eq!(
            line,
            "2024-01-01 12:00:00,000 - INFO - contacts_matrix::average - loaded 3 matrices"
        );
    }

    #[rstest]
    fn test_logger_respects_level() {
        let logger = StderrLogger {
            level: LevelFilter::Info,
        };
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }
}
