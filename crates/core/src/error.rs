use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{
    AssessmentStateError, BusinessNameError, IndustryError, ScoreError, SectionScoreError,
};
use crate::validation::{ResponseError, ValidationError};

/// Any error raised by the core crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Industry(#[from] IndustryError),
    #[error(transparent)]
    BusinessName(#[from] BusinessNameError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    SectionScore(#[from] SectionScoreError),
    #[error(transparent)]
    AssessmentState(#[from] AssessmentStateError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BusinessName, Industry, Score};

    fn parse_inputs(name: &str, industry: &str, score: i64) -> Result<Score, Error> {
        BusinessName::new(name)?;
        Industry::parse(industry)?;
        Ok(Score::new(score)?)
    }

    #[test]
    fn component_errors_convert_into_the_umbrella() {
        assert!(parse_inputs("Acme", "Retail", 4).is_ok());
        assert!(matches!(parse_inputs("", "Retail", 4), Err(Error::BusinessName(_))));
        assert!(matches!(parse_inputs("Acme", "Mining", 4), Err(Error::Industry(_))));
        assert!(matches!(parse_inputs("Acme", "Retail", 9), Err(Error::Score(_))));
    }
}
