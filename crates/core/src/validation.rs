//! Boundary checks for submitted ratings and business details.
//!
//! Validation happens once, before any mutation: a caller gets back either
//! the typed `Score`s or the full list of problems.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{CatalogError, ContentCatalog, Section};
use crate::model::{
    BusinessName, BusinessNameError, Industry, IndustryError, ProposedScore, QuestionId, Score,
    SectionId,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// One field-level problem.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationIssue {
    MissingQuestion {
        section_id: SectionId,
        question_id: QuestionId,
    },
    UnexpectedQuestion {
        section_id: SectionId,
        question_id: QuestionId,
    },
    InvalidScore {
        question_id: QuestionId,
        value: ProposedScore,
    },
    BusinessName(BusinessNameError),
    Industry(IndustryError),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingQuestion {
                section_id,
                question_id,
            } => write!(f, "missing response for question {question_id} in {section_id}"),
            ValidationIssue::UnexpectedQuestion {
                section_id,
                question_id,
            } => write!(f, "question {question_id} does not belong to {section_id}"),
            ValidationIssue::InvalidScore { question_id, value } => write!(
                f,
                "invalid score for question {question_id}: {value} (must be an integer from {} to {})",
                Score::MIN,
                Score::MAX
            ),
            ValidationIssue::BusinessName(err) => write!(f, "{err}"),
            ValidationIssue::Industry(err) => write!(f, "{err}"),
        }
    }
}

/// Every problem found in one submission.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    fn check(issues: Vec<ValidationIssue>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::new(issues))
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of a failed response check: unknown catalog id or bad content.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResponseError {
    #[error(transparent)]
    NotFound(#[from] CatalogError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

//
// ─── VALIDATOR ─────────────────────────────────────────────────────────────────
//

/// Checks proposed responses against the catalog.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    catalog: Arc<ContentCatalog>,
}

impl ResponseValidator {
    #[must_use]
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }

    /// Full-submission mode: the mapping must cover the section exactly.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::NotFound` for an unknown section, and
    /// `ResponseError::Invalid` listing every missing id, every foreign id
    /// and every bad score.
    pub fn validate_full(
        &self,
        section_id: &SectionId,
        responses: &IndexMap<QuestionId, ProposedScore>,
    ) -> Result<IndexMap<QuestionId, Score>, ResponseError> {
        let section = self.catalog.section(section_id)?;
        let mut issues: Vec<ValidationIssue> = section
            .question_ids()
            .filter(|q| !responses.contains_key(*q))
            .map(|q| ValidationIssue::MissingQuestion {
                section_id: section.id.clone(),
                question_id: q.clone(),
            })
            .collect();

        let scores = collect_scores(section, responses, &mut issues);
        ValidationError::check(issues)?;
        Ok(scores)
    }

    /// Partial-submission mode: any subset of the section's questions.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::NotFound` for an unknown section, and
    /// `ResponseError::Invalid` for foreign ids or bad scores.
    pub fn validate_partial(
        &self,
        section_id: &SectionId,
        responses: &IndexMap<QuestionId, ProposedScore>,
    ) -> Result<IndexMap<QuestionId, Score>, ResponseError> {
        let section = self.catalog.section(section_id)?;
        let mut issues = Vec::new();
        let scores = collect_scores(section, responses, &mut issues);
        ValidationError::check(issues)?;
        Ok(scores)
    }

    /// Validates a single rating for a question.
    ///
    /// # Errors
    ///
    /// Returns `ValidationIssue::InvalidScore` naming the question and the
    /// rejected value.
    pub fn validate_score(
        question_id: &QuestionId,
        proposed: &ProposedScore,
    ) -> Result<Score, ValidationIssue> {
        Score::try_from(proposed).map_err(|_| ValidationIssue::InvalidScore {
            question_id: question_id.clone(),
            value: proposed.clone(),
        })
    }

    /// Validates the details captured when an assessment starts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` carrying every failing field.
    pub fn validate_business(
        business_name: &str,
        industry: &str,
    ) -> Result<(BusinessName, Industry), ValidationError> {
        match (BusinessName::new(business_name), Industry::parse(industry)) {
            (Ok(name), Ok(industry)) => Ok((name, industry)),
            (name, industry) => {
                let mut issues = Vec::new();
                if let Err(err) = name {
                    issues.push(ValidationIssue::BusinessName(err));
                }
                if let Err(err) = industry {
                    issues.push(ValidationIssue::Industry(err));
                }
                Err(ValidationError::new(issues))
            }
        }
    }
}

fn collect_scores(
    section: &Section,
    responses: &IndexMap<QuestionId, ProposedScore>,
    issues: &mut Vec<ValidationIssue>,
) -> IndexMap<QuestionId, Score> {
    let mut scores = IndexMap::with_capacity(responses.len());
    for (question_id, proposed) in responses {
        if !section.contains(question_id) {
            issues.push(ValidationIssue::UnexpectedQuestion {
                section_id: section.id.clone(),
                question_id: question_id.clone(),
            });
        }
        match ResponseValidator::validate_score(question_id, proposed) {
            Ok(score) => {
                scores.insert(question_id.clone(), score);
            }
            Err(issue) => issues.push(issue),
        }
    }
    scores
}
