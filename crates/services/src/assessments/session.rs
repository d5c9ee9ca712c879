use indexmap::IndexMap;

use readiness_core::model::{AssessmentId, ProposedScore, QuestionId, SectionId};
use readiness_core::scoring::ScoreReport;

use super::view::{AnswerResult, NextQuestion, StatusReport};
use super::workflow::AssessmentService;
use crate::error::AssessmentError;
use crate::error_tracker::{ErrorTracker, TrackedFailure};

pub type SessionResult<T> = Result<T, TrackedFailure<AssessmentError>>;

/// One caller's walk through a single assessment.
///
/// Wraps `AssessmentService` calls with a consecutive-failure counter so a
/// front end can decide when to offer a fallback and when to give up.
pub struct AssessmentSession {
    service: AssessmentService,
    assessment_id: AssessmentId,
    tracker: ErrorTracker,
}

impl AssessmentSession {
    #[must_use]
    pub fn new(service: AssessmentService, assessment_id: AssessmentId) -> Self {
        Self::with_tracker(service, assessment_id, ErrorTracker::new())
    }

    #[must_use]
    pub fn with_tracker(
        service: AssessmentService,
        assessment_id: AssessmentId,
        tracker: ErrorTracker,
    ) -> Self {
        Self {
            service,
            assessment_id,
            tracker,
        }
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn tracker(&self) -> &ErrorTracker {
        &self.tracker
    }

    /// # Errors
    ///
    /// Returns the service error annotated with the failure count.
    pub async fn next(&mut self) -> SessionResult<NextQuestion> {
        let result = self.service.next_question(self.assessment_id).await;
        self.tracker.observe(result)
    }

    /// # Errors
    ///
    /// Returns the service error annotated with the failure count.
    pub async fn answer(
        &mut self,
        section_id: &SectionId,
        question_id: &QuestionId,
        score: impl Into<ProposedScore>,
    ) -> SessionResult<AnswerResult> {
        let result = self
            .service
            .record_response(self.assessment_id, section_id, question_id, score.into())
            .await;
        self.tracker.observe(result)
    }

    /// # Errors
    ///
    /// Returns the service error annotated with the failure count.
    pub async fn submit(
        &mut self,
        section_id: &SectionId,
        responses: &IndexMap<QuestionId, ProposedScore>,
    ) -> SessionResult<AnswerResult> {
        let result = self
            .service
            .submit_section(self.assessment_id, section_id, responses)
            .await;
        self.tracker.observe(result)
    }

    /// # Errors
    ///
    /// Returns the service error annotated with the failure count.
    pub async fn scores(&mut self) -> SessionResult<ScoreReport> {
        let result = self.service.scores(self.assessment_id).await;
        self.tracker.observe(result)
    }

    /// # Errors
    ///
    /// Returns the service error annotated with the failure count.
    pub async fn status(&mut self) -> SessionResult<StatusReport> {
        let result = self.service.status(self.assessment_id).await;
        self.tracker.observe(result)
    }
}
