#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod scoring;
pub mod time;
pub mod validation;

pub use catalog::{CatalogError, CatalogOverview, ContentCatalog, Question, Section};
pub use error::Error;
pub use scoring::{ReadinessResults, ScoreReport, ScoringEngine};
pub use time::Clock;
pub use validation::{ResponseError, ResponseValidator, ValidationError, ValidationIssue};
