use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::CoreError;

static COORDINATES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:-]+:[0-9]+-[0-9]+$").expect("coordinate pattern is valid"));

///
/// A genomic interval given on the command line as `CHR:START-END`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomicCoordinates {
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicCoordinates {
    ///
    /// Get length of the interval
    ///
    pub fn width(&self) -> u64 {
        self.end - self.start
    }
}

impl FromStr for GenomicCoordinates {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !COORDINATES_PATTERN.is_match(value) {
            return Err(CoreError::InvalidCoordinates(value.to_string()));
        }

        // the pattern guarantees exactly one ':' followed by exactly one '-'
        let (chr, range) = value
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidCoordinates(value.to_string()))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidCoordinates(value.to_string()))?;

        let start = start
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidCoordinates(value.to_string()))?;
        let end = end
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidCoordinates(value.to_string()))?;

        if start >= end {
            return Err(CoreError::InvalidCoordinateRange { start, end });
        }

        Ok(GenomicCoordinates {
            chr: chr.to_string(),
            start,
            end,
        })
    }
}

impl TryFrom<&str> for GenomicCoordinates {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for GenomicCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}
