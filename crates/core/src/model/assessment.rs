use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Section;
use crate::model::{
    AssessmentId, BusinessName, Industry, QuestionId, ReadinessLevel, Score, SectionId,
    SectionScore, SectionScoreError, UserId,
};

/// Where an assessment sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssessmentPhase {
    NotStarted,
    InProgress { section_index: usize },
    Completed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssessmentStateError {
    #[error("cursor at section {current_section} is past the last of {section_count} sections")]
    CursorOutOfRange {
        current_section: usize,
        section_count: usize,
    },
}

/// The persisted record of one assessment run.
///
/// `sections` only holds sections that have been touched, in the order they
/// were first answered. `progress` is recomputed after every mutation and
/// again when a stored record is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssessmentStateRecord")]
pub struct AssessmentState {
    id: AssessmentId,
    user_id: UserId,
    business_name: BusinessName,
    industry: Industry,
    sections: IndexMap<SectionId, SectionScore>,
    current_section: usize,
    section_count: usize,
    progress: f64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

// Wire shape. `progress` is not read back; it is derived from the sheets.
#[derive(Deserialize)]
struct AssessmentStateRecord {
    id: AssessmentId,
    user_id: UserId,
    business_name: BusinessName,
    industry: Industry,
    sections: IndexMap<SectionId, SectionScore>,
    current_section: usize,
    section_count: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<AssessmentStateRecord> for AssessmentState {
    type Error = AssessmentStateError;

    fn try_from(raw: AssessmentStateRecord) -> Result<Self, Self::Error> {
        if raw.current_section > raw.section_count {
            return Err(AssessmentStateError::CursorOutOfRange {
                current_section: raw.current_section,
                section_count: raw.section_count,
            });
        }
        let mut state = Self {
            id: raw.id,
            user_id: raw.user_id,
            business_name: raw.business_name,
            industry: raw.industry,
            sections: raw.sections,
            current_section: raw.current_section,
            section_count: raw.section_count,
            progress: 0.0,
            started_at: raw.started_at,
            completed_at: raw.completed_at,
        };
        state.refresh_progress();
        Ok(state)
    }
}

impl AssessmentState {
    /// Fresh assessment positioned at the first section.
    #[must_use]
    pub fn new(
        id: AssessmentId,
        user_id: UserId,
        business_name: BusinessName,
        industry: Industry,
        section_count: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut state = Self {
            id,
            user_id,
            business_name,
            industry,
            sections: IndexMap::new(),
            current_section: 0,
            section_count,
            progress: 0.0,
            started_at,
            completed_at: None,
        };
        state.refresh_progress();
        state
    }

    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn business_name(&self) -> &BusinessName {
        &self.business_name
    }

    #[must_use]
    pub fn industry(&self) -> Industry {
        self.industry
    }

    #[must_use]
    pub fn section_scores(&self) -> &IndexMap<SectionId, SectionScore> {
        &self.sections
    }

    #[must_use]
    pub fn section_score(&self, id: &SectionId) -> Option<&SectionScore> {
        self.sections.get(id)
    }

    /// Index of the section being worked on; equals `section_count` once
    /// every section has been passed.
    #[must_use]
    pub fn current_section(&self) -> usize {
        self.current_section
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Fraction of sections fully answered, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn completion_percentage(&self) -> f64 {
        self.progress * 100.0
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn completed_section_count(&self) -> usize {
        self.sections.values().filter(|s| s.completed()).count()
    }

    /// True iff every section of the catalog has a completed score sheet.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_section_count() >= self.section_count
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.sections.values().map(SectionScore::total).sum()
    }

    #[must_use]
    pub fn readiness_level(&self) -> ReadinessLevel {
        ReadinessLevel::from_total(self.total_score())
    }

    #[must_use]
    pub fn status(&self) -> AssessmentPhase {
        if self.current_section >= self.section_count {
            AssessmentPhase::Completed
        } else if self.current_section == 0 && self.sections.is_empty() {
            AssessmentPhase::NotStarted
        } else {
            AssessmentPhase::InProgress {
                section_index: self.current_section,
            }
        }
    }

    /// Records one score, creating the section's sheet on first touch.
    ///
    /// Returns the score it replaced, if any.
    ///
    /// # Errors
    ///
    /// Returns `SectionScoreError::ForeignQuestion` if `question_id` is not
    /// part of `section`. The state is left untouched in that case.
    pub fn record_score(
        &mut self,
        section: &Section,
        question_id: QuestionId,
        score: Score,
    ) -> Result<Option<Score>, SectionScoreError> {
        if !section.contains(&question_id) {
            return Err(SectionScoreError::ForeignQuestion {
                section: section.id.clone(),
                question: question_id,
            });
        }
        let previous = self
            .sections
            .entry(section.id.clone())
            .or_insert_with(|| SectionScore::for_section(section))
            .record(question_id, score)?;
        self.refresh_progress();
        Ok(previous)
    }

    /// Records a batch of scores for one section, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `SectionScoreError::ForeignQuestion` for the first entry that
    /// is not part of `section`; no score is written in that case.
    pub fn record_scores<I>(&mut self, section: &Section, scores: I) -> Result<(), SectionScoreError>
    where
        I: IntoIterator<Item = (QuestionId, Score)>,
    {
        let scores: Vec<_> = scores.into_iter().collect();
        if let Some((foreign, _)) = scores.iter().find(|(q, _)| !section.contains(q)) {
            return Err(SectionScoreError::ForeignQuestion {
                section: section.id.clone(),
                question: foreign.clone(),
            });
        }
        for (question_id, score) in scores {
            self.record_score(section, question_id, score)?;
        }
        Ok(())
    }

    /// Moves past the current section. Returns `false` if already past the
    /// last one.
    pub fn advance_section(&mut self) -> bool {
        if self.current_section >= self.section_count {
            return false;
        }
        self.current_section += 1;
        self.refresh_progress();
        true
    }

    /// Stamps the completion time once; later calls keep the first stamp.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(at);
        }
        self.refresh_progress();
    }

    fn refresh_progress(&mut self) {
        self.progress = if self.section_count == 0 || self.current_section >= self.section_count
        {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = self.completed_section_count() as f64 / self.section_count as f64;
            ratio.clamp(0.0, 1.0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::two_by_two;
    use crate::time::fixed_now;

    fn fresh() -> AssessmentState {
        AssessmentState::new(
            AssessmentId::generate(),
            UserId::new("u1"),
            BusinessName::new("Acme").unwrap(),
            Industry::Retail,
            2,
            fixed_now(),
        )
    }

    fn score(v: i64) -> Score {
        Score::new(v).unwrap()
    }

    #[test]
    fn fresh_state_is_not_started() {
        let state = fresh();
        assert_eq!(state.status(), AssessmentPhase::NotStarted);
        assert_eq!(state.current_section(), 0);
        assert!((state.progress() - 0.0).abs() < f64::EPSILON);
        assert!(!state.is_complete());
        assert_eq!(state.readiness_level(), ReadinessLevel::NotReady);
    }

    #[test]
    fn recording_creates_section_and_updates_progress() {
        let catalog = two_by_two();
        let s1 = catalog.section_at(0).unwrap();
        let mut state = fresh();

        state.record_score(s1, "a".into(), score(3)).unwrap();
        assert_eq!(state.status(), AssessmentPhase::InProgress { section_index: 0 });
        assert_eq!(state.completed_section_count(), 0);

        state.record_score(s1, "b".into(), score(4)).unwrap();
        assert_eq!(state.completed_section_count(), 1);
        assert!((state.progress() - 0.5).abs() < f64::EPSILON);
        assert_eq!(state.total_score(), 7);
    }

    #[test]
    fn foreign_question_leaves_state_unchanged() {
        let catalog = two_by_two();
        let s1 = catalog.section_at(0).unwrap();
        let mut state = fresh();
        let before = state.clone();

        assert!(state.record_score(s1, "c".into(), score(3)).is_err());
        assert!(
            state
                .record_scores(s1, vec![("a".into(), score(2)), ("d".into(), score(2))])
                .is_err()
        );
        assert_eq!(state, before);
    }

    #[test]
    fn advancing_past_last_section_completes() {
        let catalog = two_by_two();
        let mut state = fresh();
        for section in catalog.sections() {
            let scores = section.question_ids().map(|q| (q.clone(), score(5)));
            state.record_scores(section, scores).unwrap();
        }
        assert!(state.is_complete());

        assert!(state.advance_section());
        assert!(state.advance_section());
        assert!(!state.advance_section());
        assert_eq!(state.status(), AssessmentPhase::Completed);
        assert!((state.progress() - 1.0).abs() < f64::EPSILON);

        let at = fixed_now();
        state.mark_completed(at);
        state.mark_completed(at + chrono::Duration::hours(1));
        assert_eq!(state.completed_at(), Some(at));
    }

    #[test]
    fn serde_roundtrip_preserves_every_field() {
        let catalog = two_by_two();
        let mut state = fresh();
        state
            .record_score(catalog.section_at(1).unwrap(), "d".into(), score(2))
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let back: AssessmentState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn stored_cursor_past_the_end_is_rejected() {
        let mut value = serde_json::to_value(fresh()).unwrap();
        value["current_section"] = serde_json::json!(3);

        let err = serde_json::from_value::<AssessmentState>(value).unwrap_err();
        assert!(err.to_string().contains("past the last of 2 sections"));
    }

    #[test]
    fn stale_stored_progress_is_recomputed() {
        let catalog = two_by_two();
        let mut state = fresh();
        let scores = catalog
            .section_at(0)
            .unwrap()
            .question_ids()
            .map(|q| (q.clone(), score(4)));
        state
            .record_scores(catalog.section_at(0).unwrap(), scores)
            .unwrap();

        let mut value = serde_json::to_value(&state).unwrap();
        value["progress"] = serde_json::json!(1.0);
        let back: AssessmentState = serde_json::from_value(value).unwrap();
        assert!((back.progress() - 0.5).abs() < f64::EPSILON);
        assert_eq!(back, state);
    }
}
