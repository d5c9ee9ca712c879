#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessments;
pub mod error;
pub mod error_tracker;

pub use readiness_core::Clock;

pub use app_services::AppServices;
pub use assessments::{
    AnswerResult, AssessmentService, AssessmentSession, NextQuestion, PendingQuestion, ResumeInfo,
    SectionRef, SectionSummary, SessionResult, StartedAssessment, StatusReport,
};
pub use error::{AppServicesError, AssessmentError, ErrorKind, NotFoundError};
pub use error_tracker::{ErrorTracker, MAX_CONSECUTIVE_ERRORS, TrackedFailure};
