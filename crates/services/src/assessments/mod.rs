mod progress;
mod session;
mod traversal;
mod view;
mod workflow;

pub use progress::SectionSummary;
pub use session::{AssessmentSession, SessionResult};
pub use view::{
    AnswerResult, NextQuestion, PendingQuestion, ResumeInfo, SectionRef, StartedAssessment,
    StatusReport,
};
pub use workflow::AssessmentService;
