//! Assessment endpoints
//!
//! GET  /api/assessment/:moduleId  - fetch the quiz for a module
//! POST /api/assessment/submit     - grade an answer set and record it
//!
//! The GET response includes the answer key. Grading is authoritative on the
//! server regardless; clients that read the key only cheat themselves out of
//! the progress record.

use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::schemas::{AssessmentDoc, SubmittedAnswer, ASSESSMENT_COLLECTION};
use crate::routes::{
    error_response, json_response, parse_json_body, parse_object_id, require_mongo, BoxBody,
};
use crate::server::AppState;
use crate::services::grading;
use crate::types::LecternError;

/// Assessment as returned on the wire
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentView {
    pub id: String,
    pub module_id: String,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<&AssessmentDoc> for AssessmentView {
    fn from(doc: &AssessmentDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            module_id: doc.module_id.to_hex(),
            questions: doc
                .questions
                .iter()
                .map(|q| QuestionView {
                    question_id: q.question_id.clone(),
                    text: q.text.clone(),
                    options: q.options.clone(),
                    correct_answer: q.correct_answer.clone(),
                })
                .collect(),
        }
    }
}

/// Request body for POST /api/assessment/submit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub user_id: String,
    pub module_id: String,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswerBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswerBody {
    pub question_id: String,
    pub selected_answer: String,
}

/// Response body for POST /api/assessment/submit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub passed: bool,
    pub feedback: Vec<FeedbackView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub question_text: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// GET /api/assessment/:moduleId
pub async fn handle_get_assessment(state: Arc<AppState>, raw_module_id: &str) -> Response<BoxBody> {
    let result: Result<AssessmentView, LecternError> = async {
        let module_id = parse_object_id(raw_module_id, "module")?;
        let mongo = require_mongo(&state)?;
        let assessment = mongo
            .collection::<AssessmentDoc>(ASSESSMENT_COLLECTION)
            .await?
            .find_one(bson::doc! { "module_id": module_id })
            .await?
            .ok_or_else(|| LecternError::NotFound("Assessment not found".into()))?;
        Ok(AssessmentView::from(&assessment))
    }
    .await;

    match result {
        Ok(view) => json_response(StatusCode::OK, &view),
        Err(e) => error_response(&e),
    }
}

/// POST /api/assessment/submit
pub async fn handle_submit_assessment(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let result: Result<SubmitResponse, LecternError> = async {
        let body: SubmitRequest = parse_json_body(req).await?;

        let user_id = parse_object_id(&body.user_id, "user")?;
        let module_id = parse_object_id(&body.module_id, "module")?;
        let answers: Vec<SubmittedAnswer> = body
            .answers
            .into_iter()
            .map(|a| SubmittedAnswer {
                question_id: a.question_id,
                selected_answer: a.selected_answer,
            })
            .collect();

        let mongo = require_mongo(&state)?;
        let outcome = grading::grade_and_record(
            mongo,
            state.args.answer_key_format,
            user_id,
            module_id,
            answers,
        )
        .await?;

        Ok(SubmitResponse {
            message: "Assessment submitted successfully".into(),
            score: outcome.report.score,
            total: outcome.report.total,
            percentage: outcome.report.percentage,
            passed: outcome.report.passed(),
            feedback: outcome
                .report
                .feedback
                .iter()
                .map(|f| FeedbackView {
                    question_text: f.question_text.clone(),
                    selected_answer: f.selected_answer.clone(),
                    correct_answer: f.correct_answer.clone(),
                    is_correct: f.is_correct,
                })
                .collect(),
            submission_id: outcome.submission_id.map(|id| id.to_hex()),
            saved: outcome.saved,
        })
    }
    .await;

    match result {
        Ok(response) => json_response(StatusCode::CREATED, &response),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_parses_camel_case() {
        let json = r#"{
            "userId": "64f000000000000000000001",
            "moduleId": "64f000000000000000000002",
            "answers": [
                { "questionId": "q1", "selectedAnswer": "Finance Technology" }
            ]
        }"#;

        let parsed: SubmitRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.answers.len(), 1);
        assert_eq!(parsed.answers[0].question_id, "q1");
    }

    #[test]
    fn answers_default_to_empty() {
        let json = r#"{
            "userId": "64f000000000000000000001",
            "moduleId": "64f000000000000000000002"
        }"#;

        let parsed: SubmitRequest = serde_json::from_str(json).unwrap();
        assert!(parsed.answers.is_empty());
    }

    #[test]
    fn unsaved_submission_omits_id() {
        let response = SubmitResponse {
            message: "Assessment submitted successfully".into(),
            score: 1,
            total: 2,
            percentage: 50,
            passed: false,
            feedback: vec![],
            submission_id: None,
            saved: false,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("submissionId").is_none());
        assert_eq!(json["saved"], false);
    }
}
