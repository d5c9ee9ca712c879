mod assessment;
mod ids;
mod industry;
mod readiness;
mod score;
mod section_score;

pub use ids::{AssessmentId, ParseIdError, QuestionId, SectionId, UserId};

pub use assessment::{AssessmentPhase, AssessmentState, AssessmentStateError};
pub use industry::{BusinessName, BusinessNameError, Industry, IndustryError};
pub use readiness::{ReadinessLevel, SectionStatus};
pub use score::{ProposedScore, Score, ScoreError};
pub use section_score::{SectionScore, SectionScoreError};
