//! Assessment document schema
//!
//! Exactly one assessment per module (enforced by a unique index on
//! `module_id`). Questions are ordered; options are ordered because index
//! answer keys reference them positionally.

use bson::oid::ObjectId;
use bson::Document;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::config::AnswerKeyFormat;
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::types::{LecternError, Result};

/// Collection name for assessments
pub const ASSESSMENT_COLLECTION: &str = "assessments";

/// One multiple-choice question within an assessment
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AssessmentQuestion {
    /// Stable question identifier, referenced by submissions
    pub question_id: String,

    /// Question text shown to the learner
    pub text: String,

    /// Ordered answer choices
    pub options: Vec<String>,

    /// The answer key: either the literal correct option text or its
    /// zero-based index rendered as digits, depending on the deployment's
    /// ANSWER_KEY_FORMAT. Validated before any grading happens.
    pub correct_answer: String,
}

/// Assessment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AssessmentDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// The module this assessment belongs to
    pub module_id: ObjectId,

    /// Ordered question list
    pub questions: Vec<AssessmentQuestion>,
}

impl AssessmentDoc {
    pub fn new(module_id: ObjectId, questions: Vec<AssessmentQuestion>) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            module_id,
            questions,
        }
    }

    /// Find a question by its stable identifier
    pub fn question(&self, question_id: &str) -> Option<&AssessmentQuestion> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }

    /// Validate the answer key against the deployment's canonical format.
    ///
    /// In `Index` format every `correct_answer` must parse as a zero-based
    /// index within the question's options. In `Text` format every
    /// `correct_answer` must match one of the options (case-insensitively).
    /// A question that does not fit fails the whole assessment: grading
    /// against an inconsistent key would silently mis-grade.
    pub fn validate_answer_key(&self, format: AnswerKeyFormat) -> Result<()> {
        if self.questions.is_empty() {
            return Err(LecternError::Validation(
                "assessment has no questions".into(),
            ));
        }

        for q in &self.questions {
            match format {
                AnswerKeyFormat::Index => {
                    let idx: usize = q.correct_answer.trim().parse().map_err(|_| {
                        LecternError::Validation(format!(
                            "question '{}': answer key '{}' is not an index (deployment uses index keys)",
                            q.question_id, q.correct_answer
                        ))
                    })?;
                    if idx >= q.options.len() {
                        return Err(LecternError::Validation(format!(
                            "question '{}': answer index {} out of range ({} options)",
                            q.question_id,
                            idx,
                            q.options.len()
                        )));
                    }
                }
                AnswerKeyFormat::Text => {
                    let key = q.correct_answer.trim();
                    let matches_option = q
                        .options
                        .iter()
                        .any(|opt| opt.trim().eq_ignore_ascii_case(key));
                    if !matches_option {
                        return Err(LecternError::Validation(format!(
                            "question '{}': answer key '{}' matches no option (deployment uses text keys)",
                            q.question_id, q.correct_answer
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl IntoIndexes for AssessmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            bson::doc! { "module_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("module_id_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for AssessmentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, key: &str) -> AssessmentQuestion {
        AssessmentQuestion {
            question_id: id.into(),
            text: format!("question {}", id),
            options: vec!["Alpha".into(), "Beta".into(), "Gamma".into()],
            correct_answer: key.into(),
        }
    }

    #[test]
    fn text_keys_must_match_an_option() {
        let doc = AssessmentDoc::new(
            ObjectId::new(),
            vec![question("q1", "Beta"), question("q2", "alpha")],
        );
        assert!(doc.validate_answer_key(AnswerKeyFormat::Text).is_ok());

        let bad = AssessmentDoc::new(ObjectId::new(), vec![question("q1", "Delta")]);
        assert!(bad.validate_answer_key(AnswerKeyFormat::Text).is_err());
    }

    #[test]
    fn index_keys_must_be_in_range() {
        let doc = AssessmentDoc::new(
            ObjectId::new(),
            vec![question("q1", "0"), question("q2", "2")],
        );
        assert!(doc.validate_answer_key(AnswerKeyFormat::Index).is_ok());

        let out_of_range = AssessmentDoc::new(ObjectId::new(), vec![question("q1", "3")]);
        assert!(out_of_range.validate_answer_key(AnswerKeyFormat::Index).is_err());
    }

    #[test]
    fn mixed_representations_fail_fast() {
        // One text key, one index key: invalid under either format.
        let doc = AssessmentDoc::new(
            ObjectId::new(),
            vec![question("q1", "Beta"), question("q2", "1")],
        );
        assert!(doc.validate_answer_key(AnswerKeyFormat::Text).is_err());
        assert!(doc.validate_answer_key(AnswerKeyFormat::Index).is_err());
    }

    #[test]
    fn empty_assessment_is_invalid() {
        let doc = AssessmentDoc::new(ObjectId::new(), vec![]);
        assert!(doc.validate_answer_key(AnswerKeyFormat::Text).is_err());
    }
}
