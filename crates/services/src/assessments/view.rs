use chrono::{DateTime, Utc};
use serde::Serialize;

use readiness_core::catalog::{CatalogOverview, Question};
use readiness_core::model::{
    AssessmentId, AssessmentPhase, AssessmentState, BusinessName, Industry, QuestionId, Score,
    SectionId, SectionScore,
};
use readiness_core::scoring::SectionTotals;
use readiness_storage::repository::AssessmentArea;

use super::progress::SectionSummary;

/// Returned by `start`: the new id plus the shape of the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedAssessment {
    pub assessment_id: AssessmentId,
    pub business_name: BusinessName,
    pub industry: Industry,
    pub started_at: DateTime<Utc>,
    pub overview: CatalogOverview,
}

/// The next unanswered question with its section context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingQuestion {
    pub assessment_id: AssessmentId,
    pub section_index: usize,
    pub section_id: SectionId,
    pub section_name: String,
    pub section_description: String,
    pub question: Question,
    /// Already answered questions of this section, in catalog order.
    pub answered: Vec<QuestionId>,
    pub summary: SectionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextQuestion {
    Pending(PendingQuestion),
    Completed(Box<AssessmentState>),
}

impl NextQuestion {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, NextQuestion::Completed(_))
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingQuestion> {
        match self {
            NextQuestion::Pending(p) => Some(p),
            NextQuestion::Completed(_) => None,
        }
    }
}

/// Returned by `answer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub section_score: SectionScore,
    pub totals: SectionTotals,
    /// Score this answer replaced, if the question was already answered.
    pub previous: Option<Score>,
    pub summary: SectionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub assessment_id: AssessmentId,
    pub summary: SectionSummary,
    pub phase: AssessmentPhase,
    pub area: AssessmentArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRef {
    pub id: SectionId,
    pub name: String,
}

/// Structural part of resuming a paused assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeInfo {
    pub assessment_id: AssessmentId,
    pub business_name: BusinessName,
    pub industry: Industry,
    pub summary: SectionSummary,
    pub completed_sections: Vec<SectionRef>,
    pub incomplete_sections: Vec<SectionRef>,
    pub next_section: Option<SectionRef>,
    pub is_complete: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
}
