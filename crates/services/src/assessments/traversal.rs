use readiness_core::catalog::{ContentCatalog, Question, Section};
use readiness_core::model::AssessmentState;

/// Where the cursor landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<'c> {
    Pending {
        section_index: usize,
        section: &'c Section,
        question: &'c Question,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Traversal<'c> {
    pub step: Step<'c>,
    /// Sections passed during this call; non-zero means `state` changed.
    pub advanced: usize,
}

/// Moves `state.current_section` forward over fully answered sections and
/// stops at the first unanswered question.
///
/// Each iteration either returns or advances the cursor by one, so the loop
/// runs at most `section_count` times. When a question is pending on entry
/// the state is left untouched.
pub(crate) fn advance<'c>(state: &mut AssessmentState, catalog: &'c ContentCatalog) -> Traversal<'c> {
    let mut advanced = 0;
    while state.current_section() < state.section_count() {
        let section_index = state.current_section();
        let Some(section) = catalog.section_at(section_index) else {
            break;
        };

        let sheet = state.section_score(&section.id);
        let pending = section
            .questions
            .iter()
            .find(|q| !sheet.is_some_and(|s| s.is_answered(&q.id)));
        if let Some(question) = pending {
            return Traversal {
                step: Step::Pending {
                    section_index,
                    section,
                    question,
                },
                advanced,
            };
        }

        if !state.advance_section() {
            break;
        }
        advanced += 1;
    }

    Traversal {
        step: Step::Completed,
        advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::catalog::Section;
    use readiness_core::model::{AssessmentId, BusinessName, Industry, Score, UserId};
    use readiness_core::time::fixed_now;

    const RUBRIC: [&str; 5] = ["1", "2", "3", "4", "5"];

    fn catalog() -> ContentCatalog {
        ContentCatalog::new(vec![
            Section::new(
                "s1",
                "One",
                "",
                vec![
                    Question::new("a", "s1", "", "", RUBRIC),
                    Question::new("b", "s1", "", "", RUBRIC),
                ],
            ),
            Section::new("s2", "Two", "", vec![Question::new("c", "s2", "", "", RUBRIC)]),
            Section::new("s3", "Three", "", vec![Question::new("d", "s3", "", "", RUBRIC)]),
        ])
        .unwrap()
    }

    fn state(catalog: &ContentCatalog) -> AssessmentState {
        AssessmentState::new(
            AssessmentId::generate(),
            UserId::new("u"),
            BusinessName::new("Acme").unwrap(),
            Industry::Other,
            catalog.section_count(),
            fixed_now(),
        )
    }

    fn answer(state: &mut AssessmentState, catalog: &ContentCatalog, section: usize, q: &str) {
        state
            .record_score(
                catalog.section_at(section).unwrap(),
                q.into(),
                Score::new(3).unwrap(),
            )
            .unwrap();
    }

    fn pending_id(traversal: &Traversal<'_>) -> Option<String> {
        match traversal.step {
            Step::Pending { question, .. } => Some(question.id.to_string()),
            Step::Completed => None,
        }
    }

    #[test]
    fn pending_question_leaves_state_untouched() {
        let catalog = catalog();
        let mut state = state(&catalog);
        answer(&mut state, &catalog, 0, "a");
        let before = state.clone();

        let first = advance(&mut state, &catalog);
        let second = advance(&mut state, &catalog);
        assert_eq!(pending_id(&first).as_deref(), Some("b"));
        assert_eq!(first, second);
        assert_eq!(first.advanced, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn skips_sections_answered_out_of_order() {
        let catalog = catalog();
        let mut state = state(&catalog);
        answer(&mut state, &catalog, 1, "c");
        answer(&mut state, &catalog, 0, "a");
        answer(&mut state, &catalog, 0, "b");

        let traversal = advance(&mut state, &catalog);
        assert_eq!(pending_id(&traversal).as_deref(), Some("d"));
        assert_eq!(traversal.advanced, 2);
        assert_eq!(state.current_section(), 2);
    }

    #[test]
    fn completes_once_every_section_is_answered() {
        let catalog = catalog();
        let mut state = state(&catalog);
        for (section, q) in [(0, "a"), (0, "b"), (1, "c"), (2, "d")] {
            answer(&mut state, &catalog, section, q);
        }

        let traversal = advance(&mut state, &catalog);
        assert_eq!(traversal.step, Step::Completed);
        assert_eq!(traversal.advanced, 3);
        assert_eq!(state.current_section(), 3);
        assert!((state.progress() - 1.0).abs() < f64::EPSILON);

        let again = advance(&mut state, &catalog);
        assert_eq!(again.step, Step::Completed);
        assert_eq!(again.advanced, 0);
    }
}
