//! Aggregation of recorded answers into totals, percentages and a readiness
//! level. Everything here is a pure function of the catalog and a state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::model::{
    AssessmentState, QuestionId, ReadinessLevel, Score, SectionId, SectionScore, SectionStatus,
};

/// Per-section figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionTotals {
    pub total: u32,
    pub max_possible: u32,
    pub percentage: f64,
    pub status: SectionStatus,
}

/// Whole-assessment figures over the full catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateScore {
    pub total_score: u32,
    pub total_possible: u32,
    pub overall_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBreakdown {
    pub section_id: SectionId,
    pub section_name: String,
    pub total: u32,
    pub max_possible: u32,
    pub percentage: f64,
    pub status: SectionStatus,
    pub answered_questions: usize,
    pub question_count: usize,
    pub completed: bool,
}

/// Payload of the `scores` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub total_score: u32,
    pub total_possible: u32,
    pub overall_percentage: f64,
    pub readiness_level: ReadinessLevel,
    pub readiness_description: &'static str,
    pub sections: Vec<SectionBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section_total: u32,
    pub max_possible: u32,
    pub responses: IndexMap<QuestionId, Score>,
}

/// Read-only shape handed to report and recommendation generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResults {
    pub total_score: u32,
    pub readiness_level: ReadinessLevel,
    pub section_scores: IndexMap<SectionId, SectionResult>,
}

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<ContentCatalog>,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn section_total(score: &SectionScore) -> SectionTotals {
        let total = score.total();
        let max_possible = score.max_possible();
        let percentage = percentage(total, max_possible);
        SectionTotals {
            total,
            max_possible,
            percentage,
            status: Self::section_status_label(percentage),
        }
    }

    /// Totals over every catalog section, answered or not.
    #[must_use]
    pub fn aggregate(&self, state: &AssessmentState) -> AggregateScore {
        let total_score = state.total_score();
        let total_possible = self.catalog.total_possible_score();
        AggregateScore {
            total_score,
            total_possible,
            overall_percentage: percentage(total_score, total_possible),
        }
    }

    #[must_use]
    pub fn classify_readiness(total_score: u32) -> ReadinessLevel {
        ReadinessLevel::from_total(total_score)
    }

    #[must_use]
    pub fn section_status_label(percentage: f64) -> SectionStatus {
        SectionStatus::from_percentage(percentage)
    }

    #[must_use]
    pub fn report(&self, state: &AssessmentState) -> ScoreReport {
        let aggregate = self.aggregate(state);
        let readiness_level = Self::classify_readiness(aggregate.total_score);

        let sections = self
            .catalog
            .sections()
            .iter()
            .map(|section| match state.section_score(&section.id) {
                Some(score) => {
                    let totals = Self::section_total(score);
                    SectionBreakdown {
                        section_id: section.id.clone(),
                        section_name: section.name.clone(),
                        total: totals.total,
                        max_possible: totals.max_possible,
                        percentage: totals.percentage,
                        status: totals.status,
                        answered_questions: score.answered_count(),
                        question_count: section.question_count(),
                        completed: score.completed(),
                    }
                }
                None => SectionBreakdown {
                    section_id: section.id.clone(),
                    section_name: section.name.clone(),
                    total: 0,
                    max_possible: section.max_points(),
                    percentage: 0.0,
                    status: Self::section_status_label(0.0),
                    answered_questions: 0,
                    question_count: section.question_count(),
                    completed: false,
                },
            })
            .collect();

        ScoreReport {
            total_score: aggregate.total_score,
            total_possible: aggregate.total_possible,
            overall_percentage: aggregate.overall_percentage,
            readiness_level,
            readiness_description: readiness_level.description(),
            sections,
        }
    }

    #[must_use]
    pub fn results(state: &AssessmentState) -> ReadinessResults {
        ReadinessResults {
            total_score: state.total_score(),
            readiness_level: state.readiness_level(),
            section_scores: state
                .section_scores()
                .iter()
                .map(|(id, score)| {
                    (
                        id.clone(),
                        SectionResult {
                            section_total: score.total(),
                            max_possible: score.max_possible(),
                            responses: score.responses().clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

// Zero when there is nothing to score against.
fn percentage(total: u32, max_possible: u32) -> f64 {
    if max_possible == 0 {
        0.0
    } else {
        f64::from(total) * 100.0 / f64::from(max_possible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::two_by_two;
    use crate::model::{AssessmentId, BusinessName, Industry, UserId};
    use crate::time::fixed_now;

    fn state_for(catalog: &ContentCatalog) -> AssessmentState {
        AssessmentState::new(
            AssessmentId::generate(),
            UserId::new("u"),
            BusinessName::new("Acme").unwrap(),
            Industry::Finance,
            catalog.section_count(),
            fixed_now(),
        )
    }

    fn answer(state: &mut AssessmentState, catalog: &ContentCatalog, q: &str, v: i64) {
        let question = catalog.question(&q.into()).unwrap();
        let section = catalog.section(&question.section_id).unwrap();
        state
            .record_score(section, q.into(), Score::new(v).unwrap())
            .unwrap();
    }

    #[test]
    fn overall_percentage_uses_whole_catalog() {
        let catalog = Arc::new(two_by_two());
        let engine = ScoringEngine::new(Arc::clone(&catalog));
        let mut state = state_for(&catalog);

        answer(&mut state, &catalog, "a", 3);
        answer(&mut state, &catalog, "b", 4);
        let aggregate = engine.aggregate(&state);
        assert_eq!(aggregate.total_score, 7);
        assert_eq!(aggregate.total_possible, 20);
        assert!((aggregate.overall_percentage - 35.0).abs() < f64::EPSILON);

        answer(&mut state, &catalog, "c", 5);
        answer(&mut state, &catalog, "d", 5);
        let aggregate = engine.aggregate(&state);
        assert_eq!(aggregate.total_score, 17);
        assert!((aggregate.overall_percentage - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_lists_unanswered_sections() {
        let catalog = Arc::new(two_by_two());
        let engine = ScoringEngine::new(Arc::clone(&catalog));
        let mut state = state_for(&catalog);
        answer(&mut state, &catalog, "c", 4);

        let report = engine.report(&state);
        assert_eq!(report.sections.len(), 2);

        let first = &report.sections[0];
        assert_eq!(first.section_id.as_str(), "s1");
        assert_eq!(first.total, 0);
        assert_eq!(first.max_possible, 10);
        assert_eq!(first.status, SectionStatus::CriticalGap);

        let second = &report.sections[1];
        assert_eq!(second.total, 4);
        assert_eq!(second.answered_questions, 1);
        assert!(!second.completed);
        assert!((second.percentage - 40.0).abs() < f64::EPSILON);
        assert_eq!(second.status, SectionStatus::NeedsImprovement);
        assert_eq!(report.readiness_level, ReadinessLevel::NotReady);
    }

    #[test]
    fn section_total_reports_status() {
        let catalog = two_by_two();
        let mut sheet = SectionScore::for_section(catalog.section_at(0).unwrap());
        sheet.record("a".into(), Score::new(4).unwrap()).unwrap();
        sheet.record("b".into(), Score::new(4).unwrap()).unwrap();

        let totals = ScoringEngine::section_total(&sheet);
        assert_eq!(totals.total, 8);
        assert_eq!(totals.max_possible, 10);
        assert!((totals.percentage - 80.0).abs() < f64::EPSILON);
        assert_eq!(totals.status, SectionStatus::Strong);
    }

    #[test]
    fn zero_maximum_reports_zero_percent() {
        assert!((percentage(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn results_use_stable_downstream_keys() {
        let catalog = two_by_two();
        let mut state = state_for(&catalog);
        answer(&mut state, &catalog, "a", 2);

        let value = serde_json::to_value(ScoringEngine::results(&state)).unwrap();
        assert_eq!(value["total_score"], 2);
        assert_eq!(value["readiness_level"], "Not Ready");
        assert_eq!(value["section_scores"]["s1"]["section_total"], 2);
        assert_eq!(value["section_scores"]["s1"]["max_possible"], 10);
        assert_eq!(value["section_scores"]["s1"]["responses"]["a"], 2);
    }

    #[test]
    fn classification_boundaries() {
        for (total, label) in [
            (40, "Not Ready"),
            (41, "Foundation Building"),
            (60, "Foundation Building"),
            (61, "Ready for Pilots"),
            (75, "Ready for Pilots"),
            (76, "AI Ready"),
            (85, "AI Ready"),
            (86, "AI Advanced"),
        ] {
            assert_eq!(ScoringEngine::classify_readiness(total).label(), label);
        }
    }
}
