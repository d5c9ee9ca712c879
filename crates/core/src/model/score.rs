use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("score must be an integer between 1 and 5, got {0}")]
    OutOfRange(ProposedScore),
}

//
// ─── SCORE ────────────────────────────────────────────────────────────────────
//

/// A validated 1–5 rating for a single question.
///
/// The only way to obtain a `Score` is through [`Score::new`] or
/// [`Score::try_from`], so every stored rating is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Builds a score from an integer rating.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::OutOfRange` if `value` is outside 1..=5.
    pub fn new(value: i64) -> Result<Self, ScoreError> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(ScoreError::OutOfRange(ProposedScore::Integer(value))),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&ProposedScore> for Score {
    type Error = ScoreError;

    fn try_from(value: &ProposedScore) -> Result<Self, Self::Error> {
        match value {
            ProposedScore::Integer(v) => Self::new(*v),
            other => Err(ScoreError::OutOfRange(other.clone())),
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl From<Score> for u32 {
    fn from(score: Score) -> Self {
        u32::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── PROPOSED SCORE ───────────────────────────────────────────────────────────
//

/// An unvalidated rating as submitted by a caller.
///
/// JSON callers may send anything; only `Integer` values in 1..=5 survive
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposedScore {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<i64> for ProposedScore {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ProposedScore {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for ProposedScore {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ProposedScore {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<Score> for ProposedScore {
    fn from(value: Score) -> Self {
        Self::Integer(i64::from(value.0))
    }
}

impl From<&str> for ProposedScore {
    fn from(value: &str) -> Self {
        value
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Text(value.to_owned()), Self::Integer)
    }
}

impl fmt::Display for ProposedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposedScore::Integer(v) => write!(f, "{v}"),
            ProposedScore::Decimal(v) => write!(f, "{v}"),
            ProposedScore::Text(v) => write!(f, "{v:?}"),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
