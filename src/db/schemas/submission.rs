//! Submission document schema
//!
//! One graded attempt at an assessment. Submissions are append-only: a
//! retake creates a new document, nothing is ever updated in place.

use bson::oid::ObjectId;
use bson::{DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for submissions
pub const SUBMISSION_COLLECTION: &str = "submissions";

/// One answer within a submission, keyed by question id
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub selected_answer: String,
}

/// Per-question grading feedback, snapshotted onto the submission
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AnswerFeedback {
    pub question_text: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Submission document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SubmissionDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    pub user_id: ObjectId,
    pub module_id: ObjectId,

    /// The answers exactly as submitted
    pub answers: Vec<SubmittedAnswer>,

    /// Count of correctly answered questions
    pub score: u32,

    /// Full question count of the assessment at grading time
    pub total: u32,

    /// round(100 * score / total)
    pub percentage: u32,

    /// Grading feedback for the matched questions
    pub feedback: Vec<AnswerFeedback>,

    pub submitted_at: DateTime,
}

// bson::DateTime has no Default, so this cannot be derived
impl Default for SubmissionDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            user_id: ObjectId::new(),
            module_id: ObjectId::new(),
            answers: Vec::new(),
            score: 0,
            total: 0,
            percentage: 0,
            feedback: Vec::new(),
            submitted_at: DateTime::now(),
        }
    }
}

impl IntoIndexes for SubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Per-user-per-module history lookups
            (
                bson::doc! { "user_id": 1, "module_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_module_index".to_string())
                        .build(),
                ),
            ),
            (
                bson::doc! { "submitted_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("submitted_at_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for SubmissionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_submission_is_empty_and_ungraded() {
        let doc = SubmissionDoc::default();
        assert!(doc._id.is_none());
        assert!(doc.answers.is_empty());
        assert_eq!(doc.score, 0);
        assert_eq!(doc.percentage, 0);
    }
}
