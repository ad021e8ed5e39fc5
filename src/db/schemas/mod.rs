//! Database schemas for Lectern
//!
//! One document type per collection: modules, assessments, submissions,
//! progress, achievements, and users.

mod achievement;
mod assessment;
mod metadata;
mod module;
mod progress;
mod submission;
mod user;

pub use achievement::{AchievementCriteria, AchievementDoc, ACHIEVEMENT_COLLECTION};
pub use assessment::{AssessmentDoc, AssessmentQuestion, ASSESSMENT_COLLECTION};
pub use metadata::Metadata;
pub use module::{ModuleDoc, ModuleLevel, MODULE_COLLECTION};
pub use progress::{ProgressDoc, ProgressStatus, PROGRESS_COLLECTION};
pub use submission::{AnswerFeedback, SubmissionDoc, SubmittedAnswer, SUBMISSION_COLLECTION};
pub use user::{UserDoc, USER_COLLECTION};
