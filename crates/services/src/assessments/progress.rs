use readiness_core::model::AssessmentState;
use serde::Serialize;

/// Aggregated view of assessment progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub completed_sections: usize,
    pub total_sections: usize,
    pub current_section: usize,
    pub completion_percentage: f64,
}

impl SectionSummary {
    #[must_use]
    pub fn from_state(state: &AssessmentState) -> Self {
        Self {
            completed_sections: state.completed_section_count(),
            total_sections: state.section_count(),
            current_section: state.current_section(),
            completion_percentage: state.completion_percentage(),
        }
    }
}
