use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CoreError;

/// Transformation applied to contact scores before they are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreTransform {
    #[default]
    None,
    Sqrt,
    Log,
}

impl ScoreTransform {
    /// Apply the transform to a single score. Follows IEEE semantics, so
    /// `Log` of zero is `-inf` and `Sqrt` of a negative score is `NaN`.
    pub fn apply(&self, score: f64) -> f64 {
        match self {
            ScoreTransform::None => score,
            ScoreTransform::Sqrt => score.sqrt(),
            ScoreTransform::Log => score.ln(),
        }
    }
}

impl FromStr for ScoreTransform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ScoreTransform::None),
            "sqrt" => Ok(ScoreTransform::Sqrt),
            "log" => Ok(ScoreTransform::Log),
            _ => Err(CoreError::UnknownTransform(s.to_string())),
        }
    }
}

impl Display for ScoreTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreTransform::None => "none",
            ScoreTransform::Sqrt => "sqrt",
            ScoreTransform::Log => "log",
        };
        write!(f, "{}", name)
    }
}

/// Transform a slice of scores in place.
pub fn transform_scores(scores: &mut [f64], transform: ScoreTransform) {
    if transform == ScoreTransform::None {
        return;
    }
    scores
        .iter_mut()
        .for_each(|score| *score = transform.apply(*score));
}
