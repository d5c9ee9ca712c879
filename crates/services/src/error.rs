//! Shared error types for the services crate.

use serde::Serialize;
use thiserror::Error;

use readiness_core::model::{AssessmentId, SectionScoreError};
use readiness_core::{CatalogError, ResponseError, ValidationError, ValidationIssue};
use readiness_storage::repository::StorageError;
use readiness_storage::sqlite::SqliteInitError;

/// Stable machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Persistence => "persistence",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundError {
    #[error("assessment not found: {0}")]
    Assessment(AssessmentId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors emitted by `AssessmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("{operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AssessmentError {
    pub(crate) fn persistence(operation: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| AssessmentError::Persistence { operation, source }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessmentError::Validation(_) => ErrorKind::Validation,
            AssessmentError::NotFound(_) => ErrorKind::NotFound,
            AssessmentError::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Human-readable messages, one per problem.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            AssessmentError::Validation(err) => err.messages(),
            other => vec![other.to_string()],
        }
    }
}

impl From<CatalogError> for AssessmentError {
    fn from(err: CatalogError) -> Self {
        AssessmentError::NotFound(NotFoundError::Catalog(err))
    }
}

impl From<ResponseError> for AssessmentError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::NotFound(err) => err.into(),
            ResponseError::Invalid(err) => err.into(),
        }
    }
}

impl From<SectionScoreError> for AssessmentError {
    fn from(err: SectionScoreError) -> Self {
        match err {
            SectionScoreError::ForeignQuestion { section, question } => {
                ValidationError::new(vec![ValidationIssue::UnexpectedQuestion {
                    section_id: section,
                    question_id: question,
                }])
                .into()
            }
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
