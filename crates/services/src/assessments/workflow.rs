use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use readiness_core::catalog::{CatalogError, CatalogOverview, ContentCatalog, Section};
use readiness_core::model::{
    AssessmentId, AssessmentState, ProposedScore, QuestionId, Score, SectionId, UserId,
};
use readiness_core::scoring::{ReadinessResults, ScoreReport, ScoringEngine};
use readiness_core::validation::ResponseValidator;
use readiness_storage::repository::{
    AssessmentArea, AssessmentRepository, HistoryEntry, HistoryRepository, Storage, StorageError,
};

use super::progress::SectionSummary;
use super::traversal::{self, Step};
use super::view::{
    AnswerResult, NextQuestion, PendingQuestion, ResumeInfo, SectionRef, StartedAssessment,
    StatusReport,
};
use crate::Clock;
use crate::error::{AssessmentError, NotFoundError};

/// Drives an assessment from start to completion.
///
/// Every operation loads the state, mutates it in memory, and saves it back
/// within a single call. Calls for the same assessment id must come from a
/// single writer: there is no locking or version check on save, so two
/// concurrent writers for one id race and the last save wins.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    catalog: Arc<ContentCatalog>,
    validator: ResponseValidator,
    scoring: ScoringEngine,
    assessments: Arc<dyn AssessmentRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<ContentCatalog>,
        assessments: Arc<dyn AssessmentRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            clock,
            validator: ResponseValidator::new(Arc::clone(&catalog)),
            scoring: ScoringEngine::new(Arc::clone(&catalog)),
            catalog,
            assessments,
            history,
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, catalog: Arc<ContentCatalog>, storage: &Storage) -> Self {
        Self::new(
            clock,
            catalog,
            Arc::clone(&storage.assessments),
            Arc::clone(&storage.history),
        )
    }

    #[must_use]
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn overview(&self) -> CatalogOverview {
        self.catalog.overview()
    }

    /// Questions of one section, in order.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown section.
    pub fn section_questions(&self, section_id: &SectionId) -> Result<&Section, AssessmentError> {
        Ok(self.catalog.section(section_id)?)
    }

    /// Validate business details, create a fresh assessment and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Validation` for a bad business name or
    /// industry and `AssessmentError::Persistence` if the save fails.
    #[tracing::instrument(skip(self))]
    pub async fn start(
        &self,
        user_id: &UserId,
        business_name: &str,
        industry: &str,
    ) -> Result<StartedAssessment, AssessmentError> {
        let (business_name, industry) =
            ResponseValidator::validate_business(business_name, industry)?;
        let started_at = self.clock.now();
        let state = AssessmentState::new(
            AssessmentId::generate(),
            user_id.clone(),
            business_name,
            industry,
            self.catalog.section_count(),
            started_at,
        );
        self.save(&state, "start").await?;

        info!(assessment_id = %state.id(), %industry, "assessment started");
        Ok(StartedAssessment {
            assessment_id: state.id(),
            business_name: state.business_name().clone(),
            industry,
            started_at,
            overview: self.catalog.overview(),
        })
    }

    /// Record one answer, overwriting any earlier score for the question.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown assessment, section
    /// or question, `AssessmentError::Validation` for a bad score or a
    /// question outside the section, and `AssessmentError::Persistence` on
    /// storage failures. Nothing is written when validation fails.
    #[tracing::instrument(skip(self, score), fields(%score))]
    pub async fn record_response(
        &self,
        id: AssessmentId,
        section_id: &SectionId,
        question_id: &QuestionId,
        score: ProposedScore,
    ) -> Result<AnswerResult, AssessmentError> {
        let mut state = self.load(id, "record_response").await?;
        self.catalog.question(question_id)?;

        let responses = IndexMap::from([(question_id.clone(), score)]);
        let validated = self.validator.validate_partial(section_id, &responses)?;
        let section = self.catalog.section(section_id)?;

        let mut previous = None;
        for (question_id, score) in validated {
            previous = state.record_score(section, question_id, score)?;
        }
        self.save(&state, "record_response").await?;

        debug!(assessment_id = %id, %section_id, %question_id, "response recorded");
        self.answer_result(&state, section_id, previous)
    }

    /// Record a whole section at once. Every question of the section must be
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Validation` listing every missing, foreign or
    /// badly scored entry, `AssessmentError::NotFound` for unknown ids, and
    /// `AssessmentError::Persistence` on storage failures.
    #[tracing::instrument(skip(self, responses), fields(responses = responses.len()))]
    pub async fn submit_section(
        &self,
        id: AssessmentId,
        section_id: &SectionId,
        responses: &IndexMap<QuestionId, ProposedScore>,
    ) -> Result<AnswerResult, AssessmentError> {
        let mut state = self.load(id, "submit_section").await?;
        let validated = self.validator.validate_full(section_id, responses)?;
        let section = self.catalog.section(section_id)?;

        state.record_scores(section, validated)?;
        self.save(&state, "submit_section").await?;

        info!(assessment_id = %id, %section_id, "section submitted");
        self.answer_result(&state, section_id, None)
    }

    /// Next unanswered question, advancing past finished sections.
    ///
    /// Returns the same question on repeated calls without writing anything
    /// until it is answered. Once every section is done the result is
    /// `Completed` and stays so.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown assessment and
    /// `AssessmentError::Persistence` on storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn next_question(&self, id: AssessmentId) -> Result<NextQuestion, AssessmentError> {
        let mut state = self.load(id, "next_question").await?;
        let traversal = traversal::advance(&mut state, &self.catalog);

        let newly_completed = traversal.step == Step::Completed && state.completed_at().is_none();
        if newly_completed {
            state.mark_completed(self.clock.now());
        }
        if traversal.advanced > 0 || newly_completed {
            self.save(&state, "next_question").await?;
            info!(
                assessment_id = %id,
                current_section = state.current_section(),
                advanced = traversal.advanced,
                "advanced section"
            );
        }
        if newly_completed {
            info!(
                assessment_id = %id,
                total_score = state.total_score(),
                readiness_level = %state.readiness_level(),
                "assessment completed"
            );
        }

        Ok(match traversal.step {
            Step::Pending {
                section_index,
                section,
                question,
            } => {
                let answered = state
                    .section_score(&section.id)
                    .map(|sheet| {
                        section
                            .question_ids()
                            .filter(|q| sheet.is_answered(q))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                NextQuestion::Pending(PendingQuestion {
                    assessment_id: id,
                    section_index,
                    section_id: section.id.clone(),
                    section_name: section.name.clone(),
                    section_description: section.description.clone(),
                    question: question.clone(),
                    answered,
                    summary: SectionSummary::from_state(&state),
                })
            }
            Step::Completed => NextQuestion::Completed(Box::new(state)),
        })
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    pub async fn section_summary(&self, id: AssessmentId) -> Result<SectionSummary, AssessmentError> {
        let state = self.load(id, "section_summary").await?;
        Ok(SectionSummary::from_state(&state))
    }

    /// Totals over the whole catalog plus a per-section breakdown.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    pub async fn scores(&self, id: AssessmentId) -> Result<ScoreReport, AssessmentError> {
        let state = self.load(id, "scores").await?;
        Ok(self.scoring.report(&state))
    }

    /// Shape handed to report and recommendation generators.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    pub async fn results(&self, id: AssessmentId) -> Result<ReadinessResults, AssessmentError> {
        let state = self.load(id, "results").await?;
        Ok(ScoringEngine::results(&state))
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    pub async fn status(&self, id: AssessmentId) -> Result<StatusReport, AssessmentError> {
        let state = self.load(id, "status").await?;
        let area = self
            .assessments
            .locate(id)
            .await
            .map_err(AssessmentError::persistence("status"))?;
        Ok(StatusReport {
            assessment_id: id,
            summary: SectionSummary::from_state(&state),
            phase: state.status(),
            area,
        })
    }

    /// Which sections are done, which remain, and where to pick up.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    #[tracing::instrument(skip(self))]
    pub async fn resume(&self, id: AssessmentId) -> Result<ResumeInfo, AssessmentError> {
        let state = self.load(id, "resume").await?;
        let last_saved_at = match self.history.history_entry(id).await {
            Ok(entry) => Some(entry.last_saved_at),
            Err(StorageError::NotFound) => None,
            Err(err) => return Err(AssessmentError::persistence("resume")(err)),
        };

        let (completed, incomplete): (Vec<_>, Vec<_>) = self
            .catalog
            .sections()
            .iter()
            .partition(|section| {
                state
                    .section_score(&section.id)
                    .is_some_and(|sheet| sheet.completed())
            });
        let to_ref = |section: &&Section| SectionRef {
            id: section.id.clone(),
            name: section.name.clone(),
        };

        Ok(ResumeInfo {
            assessment_id: id,
            business_name: state.business_name().clone(),
            industry: state.industry(),
            summary: SectionSummary::from_state(&state),
            completed_sections: completed.iter().map(to_ref).collect(),
            next_section: incomplete.first().map(to_ref),
            incomplete_sections: incomplete.iter().map(to_ref).collect(),
            is_complete: state.is_complete(),
            last_saved_at,
        })
    }

    /// A user's assessments, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Persistence` on storage failures.
    pub async fn history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, AssessmentError> {
        self.history
            .list_history(user_id, limit)
            .await
            .map_err(AssessmentError::persistence("history"))
    }

    /// Storage area currently holding the assessment.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` or `AssessmentError::Persistence`.
    pub async fn area(&self, id: AssessmentId) -> Result<AssessmentArea, AssessmentError> {
        self.assessments
            .locate(id)
            .await
            .map_err(|err| not_found_or(id, "area", err))
    }

    async fn load(
        &self,
        id: AssessmentId,
        operation: &'static str,
    ) -> Result<AssessmentState, AssessmentError> {
        let state = self
            .assessments
            .load(id)
            .await
            .map_err(|err| not_found_or(id, operation, err))?;
        debug!(assessment_id = %id, operation, "loaded assessment");
        Ok(state)
    }

    async fn save(
        &self,
        state: &AssessmentState,
        operation: &'static str,
    ) -> Result<AssessmentArea, AssessmentError> {
        self.assessments
            .save(state, self.clock.now())
            .await
            .map_err(AssessmentError::persistence(operation))
    }

    fn answer_result(
        &self,
        state: &AssessmentState,
        section_id: &SectionId,
        previous: Option<Score>,
    ) -> Result<AnswerResult, AssessmentError> {
        let section_score = state
            .section_score(section_id)
            .cloned()
            .ok_or_else(|| NotFoundError::Catalog(CatalogError::SectionNotFound(section_id.clone())))?;
        Ok(AnswerResult {
            totals: ScoringEngine::section_total(&section_score),
            section_score,
            previous,
            summary: SectionSummary::from_state(state),
        })
    }
}

fn not_found_or(id: AssessmentId, operation: &'static str, err: StorageError) -> AssessmentError {
    match err {
        StorageError::NotFound => NotFoundError::Assessment(id).into(),
        other => AssessmentError::persistence(operation)(other),
    }
}
