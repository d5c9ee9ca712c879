use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Section;
use crate::model::{QuestionId, Score, SectionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SectionScoreError {
    #[error("question {question} does not belong to section {section}")]
    ForeignQuestion {
        section: SectionId,
        question: QuestionId,
    },
}

/// Recorded answers for one section within one assessment.
///
/// Totals are always derived from `responses`; nothing else is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SectionScoreRecord")]
pub struct SectionScore {
    section_id: SectionId,
    section_name: String,
    question_ids: Vec<QuestionId>,
    responses: IndexMap<QuestionId, Score>,
}

// Wire shape, checked on the way in so a stored record cannot carry answers
// for questions outside its section.
#[derive(Deserialize)]
struct SectionScoreRecord {
    section_id: SectionId,
    section_name: String,
    question_ids: Vec<QuestionId>,
    responses: IndexMap<QuestionId, Score>,
}

impl TryFrom<SectionScoreRecord> for SectionScore {
    type Error = SectionScoreError;

    fn try_from(raw: SectionScoreRecord) -> Result<Self, Self::Error> {
        if let Some(foreign) = raw
            .responses
            .keys()
            .find(|q| !raw.question_ids.contains(q))
        {
            return Err(SectionScoreError::ForeignQuestion {
                section: raw.section_id.clone(),
                question: foreign.clone(),
            });
        }
        Ok(Self {
            section_id: raw.section_id,
            section_name: raw.section_name,
            question_ids: raw.question_ids,
            responses: raw.responses,
        })
    }
}

impl SectionScore {
    /// Empty score sheet for `section`.
    #[must_use]
    pub fn for_section(section: &Section) -> Self {
        Self {
            section_id: section.id.clone(),
            section_name: section.name.clone(),
            question_ids: section.question_ids().cloned().collect(),
            responses: IndexMap::new(),
        }
    }

    /// Inserts or overwrites the score for one question, returning the
    /// previous score if there was one.
    ///
    /// # Errors
    ///
    /// Returns `SectionScoreError::ForeignQuestion` if the question is not
    /// part of this section.
    pub fn record(
        &mut self,
        question_id: QuestionId,
        score: Score,
    ) -> Result<Option<Score>, SectionScoreError> {
        if !self.question_ids.contains(&question_id) {
            return Err(SectionScoreError::ForeignQuestion {
                section: self.section_id.clone(),
                question: question_id,
            });
        }
        Ok(self.responses.insert(question_id, score))
    }

    #[must_use]
    pub fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    #[must_use]
    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Question ids of the owning section, in catalog order.
    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn responses(&self) -> &IndexMap<QuestionId, Score> {
        &self.responses
    }

    #[must_use]
    pub fn score(&self, question_id: &QuestionId) -> Option<Score> {
        self.responses.get(question_id).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.responses.contains_key(question_id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.responses.values().copied().map(u32::from).sum()
    }

    /// Five points per question of the owning section, answered or not.
    #[must_use]
    pub fn max_possible(&self) -> u32 {
        u32::try_from(self.question_ids.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(u32::from(Score::MAX))
    }

    /// True once every question of the owning section has a score.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.question_ids.iter().all(|q| self.responses.contains_key(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Question, Section};

    const RUBRIC: [&str; 5] = ["1", "2", "3", "4", "5"];

    fn five_question_section() -> Section {
        Section::new(
            "s",
            "Five",
            "",
            (1..=5)
                .map(|i| Question::new(format!("q{i}"), "s", "", "", RUBRIC))
                .collect(),
        )
    }

    fn score(v: i64) -> Score {
        Score::new(v).unwrap()
    }

    #[test]
    fn totals_are_sum_of_scores_for_every_combination() {
        let section = five_question_section();
        // Walk all 5^5 score vectors.
        for n in 0..5u32.pow(5) {
            let mut sheet = SectionScore::for_section(&section);
            let mut expected = 0;
            let mut rest = n;
            for q in section.question_ids() {
                let v = i64::from(rest % 5) + 1;
                rest /= 5;
                expected += u32::try_from(v).unwrap();
                sheet.record(q.clone(), score(v)).unwrap();
            }
            assert_eq!(sheet.total(), expected);
            assert_eq!(sheet.max_possible(), 25);
            assert!(sheet.completed());
        }
    }

    #[test]
    fn overwrite_replaces_previous_value() {
        let section = five_question_section();
        let mut sheet = SectionScore::for_section(&section);

        assert_eq!(sheet.record("q1".into(), score(2)).unwrap(), None);
        assert_eq!(sheet.record("q1".into(), score(5)).unwrap(), Some(score(2)));
        assert_eq!(sheet.total(), 5);
        assert_eq!(sheet.answered_count(), 1);
        assert!(!sheet.completed());
    }

    #[test]
    fn partly_answered_section_reports_full_maximum() {
        let section = five_question_section();
        let mut sheet = SectionScore::for_section(&section);
        sheet.record("q3".into(), score(4)).unwrap();
        assert_eq!(sheet.max_possible(), 25);
        assert_eq!(sheet.total(), 4);
    }

    #[test]
    fn rejects_foreign_question() {
        let section = five_question_section();
        let mut sheet = SectionScore::for_section(&section);
        let err = sheet.record("zz".into(), score(3)).unwrap_err();
        assert_eq!(
            err,
            SectionScoreError::ForeignQuestion {
                section: "s".into(),
                question: "zz".into()
            }
        );
        assert_eq!(sheet.answered_count(), 0);
    }

    #[test]
    fn deserialize_rejects_foreign_answers_and_bad_scores() {
        let ok = r#"{"section_id":"s","section_name":"S","question_ids":["a"],"responses":{"a":4}}"#;
        let sheet: SectionScore = serde_json::from_str(ok).unwrap();
        assert_eq!(sheet.total(), 4);

        let foreign = r#"{"section_id":"s","section_name":"S","question_ids":["a"],"responses":{"b":4}}"#;
        assert!(serde_json::from_str::<SectionScore>(foreign).is_err());

        let out_of_range = r#"{"section_id":"s","section_name":"S","question_ids":["a"],"responses":{"a":9}}"#;
        assert!(serde_json::from_str::<SectionScore>(out_of_range).is_err());
    }
}
