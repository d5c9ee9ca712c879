//! Immutable definition of what an assessment asks.
//!
//! A [`ContentCatalog`] is built once, validated, and then shared by
//! reference between the validator, the scoring engine and the services.

mod reference;

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

use crate::model::{QuestionId, Score, SectionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    #[error("catalog must contain at least one section")]
    Empty,

    #[error("section {0} has no questions")]
    EmptySection(SectionId),

    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question {question} declares section {declared} but is listed under {owner}")]
    SectionMismatch {
        question: QuestionId,
        declared: SectionId,
        owner: SectionId,
    },

    #[error("question {question} has a rubric entry for {key}, outside 1..=5")]
    InvalidRubricKey { question: QuestionId, key: u8 },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single rated item with its 1–5 rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub description: String,
    pub rubric: BTreeMap<u8, String>,
    pub section_id: SectionId,
}

impl Question {
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        section_id: impl Into<SectionId>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        rubric: [&str; 5],
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            description: description.into(),
            rubric: (Score::MIN..=Score::MAX)
                .zip(rubric)
                .map(|(k, v)| (k, v.to_owned()))
                .collect(),
            section_id: section_id.into(),
        }
    }

    /// Rubric line describing what the given score means for this question.
    #[must_use]
    pub fn rubric_for(&self, score: Score) -> Option<&str> {
        self.rubric.get(&score.value()).map(String::as_str)
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Section {
    #[must_use]
    pub fn new(
        id: impl Into<SectionId>,
        name: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            questions,
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Maximum points for this section: five per question.
    #[must_use]
    pub fn max_points(&self) -> u32 {
        u32::try_from(self.questions.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(u32::from(Score::MAX))
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.question(id).is_some()
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|q| &q.id)
    }
}

//
// ─── OVERVIEW ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOverview {
    pub id: SectionId,
    pub name: String,
    pub description: String,
    pub max_points: u32,
    pub question_count: usize,
}

/// Shape of the catalog handed to callers when an assessment starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOverview {
    pub total_sections: usize,
    pub total_questions: usize,
    pub total_possible_score: u32,
    pub sections: Vec<SectionOverview>,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered sections plus a reverse index of questions by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCatalog {
    sections: Vec<Section>,
    // question id -> (section index, question index)
    question_index: HashMap<QuestionId, (usize, usize)>,
}

impl ContentCatalog {
    /// Builds a catalog from ordered sections.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the catalog is empty, a section has no
    /// questions, ids collide, a question names a different owner, or a
    /// rubric key falls outside 1..=5.
    pub fn new(sections: Vec<Section>) -> Result<Self, CatalogError> {
        if sections.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_sections = HashSet::new();
        let mut question_index = HashMap::new();

        for (s_idx, section) in sections.iter().enumerate() {
            if !seen_sections.insert(section.id.clone()) {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
            if section.questions.is_empty() {
                return Err(CatalogError::EmptySection(section.id.clone()));
            }
            for (q_idx, question) in section.questions.iter().enumerate() {
                if question.section_id != section.id {
                    return Err(CatalogError::SectionMismatch {
                        question: question.id.clone(),
                        declared: question.section_id.clone(),
                        owner: section.id.clone(),
                    });
                }
                if let Some(&key) = question
                    .rubric
                    .keys()
                    .find(|k| !(Score::MIN..=Score::MAX).contains(*k))
                {
                    return Err(CatalogError::InvalidRubricKey {
                        question: question.id.clone(),
                        key,
                    });
                }
                if question_index
                    .insert(question.id.clone(), (s_idx, q_idx))
                    .is_some()
                {
                    return Err(CatalogError::DuplicateQuestion(question.id.clone()));
                }
            }
        }

        Ok(Self {
            sections,
            question_index,
        })
    }

    /// Looks up a section by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SectionNotFound` for unknown ids.
    pub fn section(&self, id: &SectionId) -> Result<&Section, CatalogError> {
        self.sections
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| CatalogError::SectionNotFound(id.clone()))
    }

    /// Looks up a question by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::QuestionNotFound` for unknown ids.
    pub fn question(&self, id: &QuestionId) -> Result<&Question, CatalogError> {
        self.question_index
            .get(id)
            .map(|&(s, q)| &self.sections[s].questions[q])
            .ok_or_else(|| CatalogError::QuestionNotFound(id.clone()))
    }

    /// All sections in their fixed order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    pub fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_index.len()
    }

    /// Sum of every section's maximum points.
    #[must_use]
    pub fn total_possible_score(&self) -> u32 {
        self.sections.iter().map(Section::max_points).sum()
    }

    #[must_use]
    pub fn overview(&self) -> CatalogOverview {
        CatalogOverview {
            total_sections: self.section_count(),
            total_questions: self.question_count(),
            total_possible_score: self.total_possible_score(),
            sections: self
                .sections
                .iter()
                .map(|s| SectionOverview {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    description: s.description.clone(),
                    max_points: s.max_points(),
                    question_count: s.question_count(),
                })
                .collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const RUBRIC: [&str; 5] = ["one", "two", "three", "four", "five"];

    /// Two sections of two questions each (max 10 each, 20 total).
    pub(crate) fn two_by_two() -> ContentCatalog {
        ContentCatalog::new(vec![
            Section::new(
                "s1",
                "First",
                "first section",
                vec![
                    Question::new("a", "s1", "A", "Question A?", RUBRIC),
                    Question::new("b", "s1", "B", "Question B?", RUBRIC),
                ],
            ),
            Section::new(
                "s2",
                "Second",
                "second section",
                vec![
                    Question::new("c", "s2", "C", "Question C?", RUBRIC),
                    Question::new("d", "s2", "D", "Question D?", RUBRIC),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn lookups_resolve_sections_and_questions() {
        let catalog = two_by_two();
        assert_eq!(catalog.section(&"s2".into()).unwrap().name, "Second");
        assert_eq!(catalog.question(&"c".into()).unwrap().section_id.as_str(), "s2");
        assert_eq!(catalog.section_index(&"s2".into()), Some(1));
        assert_eq!(catalog.section_at(0).unwrap().id.as_str(), "s1");
        assert!(catalog.section_at(2).is_none());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let catalog = two_by_two();
        assert_eq!(
            catalog.section(&"nope".into()).unwrap_err(),
            CatalogError::SectionNotFound("nope".into())
        );
        assert_eq!(
            catalog.question(&"z".into()).unwrap_err(),
            CatalogError::QuestionNotFound("z".into())
        );
    }

    #[test]
    fn max_points_follow_question_count() {
        let catalog = two_by_two();
        assert_eq!(catalog.sections()[0].max_points(), 10);
        assert_eq!(catalog.total_possible_score(), 20);

        let overview = catalog.overview();
        assert_eq!(overview.total_sections, 2);
        assert_eq!(overview.total_questions, 4);
        assert_eq!(overview.total_possible_score, 20);
        assert_eq!(overview.sections[1].question_count, 2);
    }

    #[test]
    fn rejects_duplicate_question_ids_across_sections() {
        let err = ContentCatalog::new(vec![
            Section::new("s1", "One", "", vec![Question::new("q", "s1", "", "", RUBRIC)]),
            Section::new("s2", "Two", "", vec![Question::new("q", "s2", "", "", RUBRIC)]),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateQuestion("q".into()));
    }

    #[test]
    fn rejects_structural_problems() {
        assert_eq!(ContentCatalog::new(vec![]).unwrap_err(), CatalogError::Empty);

        let err = ContentCatalog::new(vec![Section::new("s1", "One", "", vec![])]).unwrap_err();
        assert_eq!(err, CatalogError::EmptySection("s1".into()));

        let err = ContentCatalog::new(vec![
            Section::new("s1", "One", "", vec![Question::new("a", "s1", "", "", RUBRIC)]),
            Section::new("s1", "Dup", "", vec![Question::new("b", "s1", "", "", RUBRIC)]),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateSection("s1".into()));

        let err = ContentCatalog::new(vec![Section::new(
            "s1",
            "One",
            "",
            vec![Question::new("a", "other", "", "", RUBRIC)],
        )])
        .unwrap_err();
        assert!(matches!(err, CatalogError::SectionMismatch { .. }));
    }

    #[test]
    fn rejects_rubric_keys_outside_range() {
        let mut question = Question::new("a", "s1", "", "", RUBRIC);
        question.rubric.insert(6, "too high".into());
        let err =
            ContentCatalog::new(vec![Section::new("s1", "One", "", vec![question])]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidRubricKey {
                question: "a".into(),
                key: 6
            }
        );
    }
}
