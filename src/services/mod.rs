//! Domain services
//!
//! The grading engine is the core: it turns a raw answer submission into a
//! score, a persisted submission record, and (on a pass) a completed
//! progress record. Achievements and path recommendations are pure
//! read-side derivations over the same state.

pub mod achievements;
pub mod grading;
pub mod paths;
pub mod progress;
pub mod stats;

pub use achievements::unlocked_for;
pub use grading::{grade_and_record, score_answers, GradeOutcome, GradeReport, PASS_THRESHOLD_PERCENT};
pub use paths::{next_steps, recommend, Tier};
pub use stats::{stats_for_user, UserStats};
