use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("industry must be one of: {}, got {raw:?}", Industry::names().join(", "))]
pub struct IndustryError {
    pub raw: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BusinessNameError {
    #[error("business name cannot be empty")]
    Empty,

    #[error("business name must be at most {max} characters, got {len}")]
    TooLong { len: usize, max: usize },
}

//
// ─── INDUSTRY ──────────────────────────────────────────────────────────────────
//

/// Industry sector of the assessed business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Industry {
    Agriculture,
    Manufacturing,
    Technology,
    Finance,
    Healthcare,
    Education,
    Retail,
    Transportation,
    Construction,
    Tourism,
    Energy,
    Telecommunications,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 13] = [
        Industry::Agriculture,
        Industry::Manufacturing,
        Industry::Technology,
        Industry::Finance,
        Industry::Healthcare,
        Industry::Education,
        Industry::Retail,
        Industry::Transportation,
        Industry::Construction,
        Industry::Tourism,
        Industry::Energy,
        Industry::Telecommunications,
        Industry::Other,
    ];

    /// Canonical display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Agriculture => "Agriculture",
            Industry::Manufacturing => "Manufacturing",
            Industry::Technology => "Technology",
            Industry::Finance => "Finance",
            Industry::Healthcare => "Healthcare",
            Industry::Education => "Education",
            Industry::Retail => "Retail",
            Industry::Transportation => "Transportation",
            Industry::Construction => "Construction",
            Industry::Tourism => "Tourism",
            Industry::Energy => "Energy",
            Industry::Telecommunications => "Telecommunications",
            Industry::Other => "Other",
        }
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|i| i.as_str()).collect()
    }

    /// Resolves user input to an industry, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IndustryError` if the input matches no known industry.
    pub fn parse(raw: &str) -> Result<Self, IndustryError> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| IndustryError {
                raw: raw.to_owned(),
            })
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = IndustryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Industry {
    type Error = IndustryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Industry> for String {
    fn from(value: Industry) -> Self {
        value.as_str().to_owned()
    }
}

//
// ─── BUSINESS NAME ─────────────────────────────────────────────────────────────
//

/// Trimmed, non-empty business name of at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessName(String);

impl BusinessName {
    pub const MAX_CHARS: usize = 100;

    /// Validates and normalises a business name.
    ///
    /// # Errors
    ///
    /// Returns `BusinessNameError::Empty` for blank input and
    /// `BusinessNameError::TooLong` above `MAX_CHARS` characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BusinessNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BusinessNameError::Empty);
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_CHARS {
            return Err(BusinessNameError::TooLong {
                len,
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BusinessName {
    type Error = BusinessNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusinessName> for String {
    fn from(value: BusinessName) -> Self {
        value.0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industry_parse_is_case_insensitive_and_canonical() {
        assert_eq!(Industry::parse("agriculture").unwrap(), Industry::Agriculture);
        assert_eq!(
            Industry::parse("  TELECOMMUNICATIONS ").unwrap().as_str(),
            "Telecommunications"
        );
        assert_eq!(Industry::parse("oThEr").unwrap().to_string(), "Other");
    }

    #[test]
    fn industry_parse_rejects_unknown() {
        let err = Industry::parse("General").unwrap_err();
        assert_eq!(err.raw, "General");
        assert!(err.to_string().contains("Agriculture"));
    }

    #[test]
    fn industry_list_has_thirteen_entries() {
        assert_eq!(Industry::names().len(), 13);
    }

    #[test]
    fn business_name_trims_and_bounds() {
        assert_eq!(BusinessName::new("  Acme Ltd ").unwrap().as_str(), "Acme Ltd");
        assert_eq!(BusinessName::new("   ").unwrap_err(), BusinessNameError::Empty);

        let exactly = "a".repeat(100);
        assert!(BusinessName::new(&exactly).is_ok());

        let too_long = "a".repeat(101);
        assert_eq!(
            BusinessName::new(too_long).unwrap_err(),
            BusinessNameError::TooLong { len: 101, max: 100 }
        );
    }
}
