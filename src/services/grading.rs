//! Grading engine
//!
//! Scores a submitted answer set against a module's assessment, records the
//! attempt, and marks the module completed when the pass threshold is met.
//!
//! Submitted answers are matched to questions by question id, never by
//! position: a submission may be a subset, superset, or reordering of the
//! assessment. Answers whose question id matches nothing are ignored.
//! The percentage is always computed against the assessment's full question
//! count, so a partial submission can never reach 100%.
//!
//! The submission write and the progress update are two independent
//! best-effort steps with no transaction linking them. A failed submission
//! write does not discard the computed result; it is returned with
//! `saved = false` so the caller can warn the user.

use bson::oid::ObjectId;
use bson::{doc, DateTime};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::AnswerKeyFormat;
use crate::db::schemas::{
    AnswerFeedback, AssessmentDoc, ProgressStatus, SubmissionDoc, SubmittedAnswer,
    ASSESSMENT_COLLECTION, SUBMISSION_COLLECTION,
};
use crate::db::MongoClient;
use crate::services::progress;
use crate::types::{LecternError, Result};

/// Canonical pass/fail boundary, in percent. Progress is only marked
/// completed at or above this value.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

/// The pure grading result, before any persistence
#[derive(Debug, Clone)]
pub struct GradeReport {
    /// Count of matched, correctly answered questions
    pub score: u32,
    /// Full question count of the assessment
    pub total: u32,
    /// round(100 * score / total)
    pub percentage: u32,
    /// One entry per matched question, in submission order
    pub feedback: Vec<AnswerFeedback>,
}

impl GradeReport {
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_THRESHOLD_PERCENT
    }
}

/// Grading plus its side effects
#[derive(Debug)]
pub struct GradeOutcome {
    pub report: GradeReport,
    /// Id of the persisted submission, when the write succeeded
    pub submission_id: Option<ObjectId>,
    /// False when the submission write failed; the result is still valid
    pub saved: bool,
}

/// Score a submission against an assessment. Pure computation, no I/O.
///
/// Fails with a validation error when the assessment's answer key does not
/// fit the deployment's canonical format.
pub fn score_answers(
    assessment: &AssessmentDoc,
    answers: &[SubmittedAnswer],
    format: AnswerKeyFormat,
) -> Result<GradeReport> {
    assessment.validate_answer_key(format)?;

    let total = assessment.questions.len() as u32;
    let mut score = 0u32;
    let mut feedback = Vec::new();
    let mut graded: HashSet<&str> = HashSet::new();

    for answer in answers {
        let Some(question) = assessment.question(&answer.question_id) else {
            // Not part of this assessment: contributes to neither score
            // nor feedback.
            continue;
        };

        // A repeated question id is graded once; the first occurrence wins.
        // Otherwise duplicates could push score past total.
        if !graded.insert(question.question_id.as_str()) {
            continue;
        }

        let is_correct = match format {
            AnswerKeyFormat::Text => answer
                .selected_answer
                .trim()
                .eq_ignore_ascii_case(question.correct_answer.trim()),
            AnswerKeyFormat::Index => {
                match answer.selected_answer.trim().parse::<usize>() {
                    Ok(selected) => {
                        let key: usize = question
                            .correct_answer
                            .trim()
                            .parse()
                            .map_err(|_| {
                                LecternError::Validation(format!(
                                    "question '{}': answer key is not an index",
                                    question.question_id
                                ))
                            })?;
                        selected == key
                    }
                    // A non-numeric selection in an index deployment is
                    // simply wrong, not malformed.
                    Err(_) => false,
                }
            }
        };

        if is_correct {
            score += 1;
        }

        feedback.push(AnswerFeedback {
            question_text: question.text.clone(),
            selected_answer: answer.selected_answer.clone(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
        });
    }

    let percentage = ((score as f64) * 100.0 / (total as f64)).round() as u32;

    Ok(GradeReport {
        score,
        total,
        percentage,
        feedback,
    })
}

/// Grade a submission and apply its side effects.
///
/// Step order: load assessment, score, persist the submission, then (on a
/// pass) upsert progress to completed. Each persistence step is independent;
/// neither failure invalidates the computed report.
pub async fn grade_and_record(
    mongo: &MongoClient,
    format: AnswerKeyFormat,
    user_id: ObjectId,
    module_id: ObjectId,
    answers: Vec<SubmittedAnswer>,
) -> Result<GradeOutcome> {
    let assessments = mongo
        .collection::<AssessmentDoc>(ASSESSMENT_COLLECTION)
        .await?;

    let assessment = assessments
        .find_one(doc! { "module_id": module_id })
        .await?
        .ok_or_else(|| LecternError::NotFound("Assessment not found".into()))?;

    let report = score_answers(&assessment, &answers, format)?;

    let submission = SubmissionDoc {
        _id: None,
        metadata: Default::default(),
        user_id,
        module_id,
        answers,
        score: report.score,
        total: report.total,
        percentage: report.percentage,
        feedback: report.feedback.clone(),
        submitted_at: DateTime::now(),
    };

    let (submission_id, saved) = match mongo
        .collection::<SubmissionDoc>(SUBMISSION_COLLECTION)
        .await
    {
        Ok(collection) => match collection.insert_one(submission).await {
            Ok(id) => (Some(id), true),
            Err(e) => {
                warn!(user = %user_id, module = %module_id, error = %e,
                    "Submission write failed; returning unsaved grading result");
                (None, false)
            }
        },
        Err(e) => {
            warn!(user = %user_id, module = %module_id, error = %e,
                "Submission collection unavailable; returning unsaved grading result");
            (None, false)
        }
    };

    if report.passed() {
        if let Err(e) =
            progress::set_status(mongo, user_id, module_id, ProgressStatus::Completed).await
        {
            warn!(user = %user_id, module = %module_id, error = %e,
                "Progress update failed after passing grade");
        }
    }

    info!(
        user = %user_id,
        module = %module_id,
        score = report.score,
        total = report.total,
        percentage = report.percentage,
        passed = report.passed(),
        saved,
        "Graded submission"
    );

    Ok(GradeOutcome {
        report,
        submission_id,
        saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::AssessmentQuestion;

    fn fintech_assessment() -> AssessmentDoc {
        AssessmentDoc::new(
            ObjectId::new(),
            vec![
                AssessmentQuestion {
                    question_id: "q1".into(),
                    text: "What does FinTech stand for?".into(),
                    options: vec![
                        "Finance Technology".into(),
                        "Financial Tools".into(),
                        "Technology Funds".into(),
                        "Future Tech".into(),
                    ],
                    correct_answer: "Finance Technology".into(),
                },
                AssessmentQuestion {
                    question_id: "q2".into(),
                    text: "Which is a blockchain-based currency?".into(),
                    options: vec![
                        "Bitcoin".into(),
                        "PayPal".into(),
                        "Visa".into(),
                        "Stripe".into(),
                    ],
                    correct_answer: "Bitcoin".into(),
                },
            ],
        )
    }

    fn answer(id: &str, selected: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: id.into(),
            selected_answer: selected.into(),
        }
    }

    #[test]
    fn all_correct_is_one_hundred_percent() {
        let report = score_answers(
            &fintech_assessment(),
            &[answer("q1", "Finance Technology"), answer("q2", "Bitcoin")],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert_eq!(report.score, 2);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 100);
        assert!(report.passed());
        assert!(report.feedback.iter().all(|f| f.is_correct));
    }

    #[test]
    fn text_matching_is_case_insensitive_and_trimmed() {
        let report = score_answers(
            &fintech_assessment(),
            &[answer("q1", "  finance technology "), answer("q2", "BITCOIN")],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert_eq!(report.score, 2);
        assert_eq!(report.percentage, 100);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let report = score_answers(
            &fintech_assessment(),
            &[
                answer("q1", "Finance Technology"),
                answer("ghost", "Bitcoin"),
            ],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        // The unmatched answer contributes to neither score nor feedback.
        assert_eq!(report.score, 1);
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn partial_submission_never_passes() {
        // q2 omitted: even a correct q1 caps out at 50%.
        let report = score_answers(
            &fintech_assessment(),
            &[answer("q1", "Finance Technology")],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert_eq!(report.score, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 50);
        assert!(!report.passed());
    }

    #[test]
    fn repeated_question_ids_count_once() {
        // Three answers for a 2-question quiz, q1 submitted twice. The
        // duplicate must not lift score above total or percentage above 100.
        let report = score_answers(
            &fintech_assessment(),
            &[
                answer("q1", "Finance Technology"),
                answer("q1", "Finance Technology"),
                answer("q2", "Bitcoin"),
            ],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert_eq!(report.score, 2);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 100);
        assert_eq!(report.feedback.len(), 2);
    }

    #[test]
    fn first_occurrence_of_a_repeated_question_wins() {
        // Wrong then right: the retry within the same submission is ignored.
        let report = score_answers(
            &fintech_assessment(),
            &[answer("q1", "Future Tech"), answer("q1", "Finance Technology")],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert_eq!(report.score, 0);
        assert_eq!(report.feedback.len(), 1);
        assert!(!report.feedback[0].is_correct);
    }

    #[test]
    fn score_is_bounded_by_total() {
        // Superset submission: the bound score <= total must hold.
        let report = score_answers(
            &fintech_assessment(),
            &[
                answer("q1", "Finance Technology"),
                answer("q2", "Bitcoin"),
                answer("extra", "whatever"),
            ],
            AnswerKeyFormat::Text,
        )
        .unwrap();

        assert!(report.score <= report.total);
        assert!(report.percentage <= 100);
    }

    #[test]
    fn index_format_grades_by_position() {
        let mut assessment = fintech_assessment();
        assessment.questions[0].correct_answer = "0".into();
        assessment.questions[1].correct_answer = "0".into();

        let report = score_answers(
            &assessment,
            &[answer("q1", "0"), answer("q2", "3")],
            AnswerKeyFormat::Index,
        )
        .unwrap();

        assert_eq!(report.score, 1);
        assert!(report.feedback[0].is_correct);
        assert!(!report.feedback[1].is_correct);
    }

    #[test]
    fn index_format_treats_non_numeric_selection_as_wrong() {
        let mut assessment = fintech_assessment();
        assessment.questions[0].correct_answer = "0".into();
        assessment.questions[1].correct_answer = "1".into();

        let report = score_answers(
            &assessment,
            &[answer("q1", "Bitcoin")],
            AnswerKeyFormat::Index,
        )
        .unwrap();

        assert_eq!(report.score, 0);
        assert!(!report.feedback[0].is_correct);
    }

    #[test]
    fn inconsistent_answer_key_fails_fast() {
        let mut assessment = fintech_assessment();
        assessment.questions[1].correct_answer = "0".into();

        let result = score_answers(
            &assessment,
            &[answer("q1", "Finance Technology")],
            AnswerKeyFormat::Text,
        );
        assert!(matches!(result, Err(LecternError::Validation(_))));
    }

    #[test]
    fn rounding_is_to_nearest_percent() {
        let mut assessment = fintech_assessment();
        assessment.questions.push(AssessmentQuestion {
            question_id: "q3".into(),
            text: "third".into(),
            options: vec!["Yes".into(), "No".into()],
            correct_answer: "Yes".into(),
        });

        // 1 of 3 correct: 33.33.. rounds to 33; 2 of 3: 66.67 rounds to 67.
        let one = score_answers(&assessment, &[answer("q1", "Finance Technology")], AnswerKeyFormat::Text).unwrap();
        assert_eq!(one.percentage, 33);

        let two = score_answers(
            &assessment,
            &[answer("q1", "Finance Technology"), answer("q2", "Bitcoin")],
            AnswerKeyFormat::Text,
        )
        .unwrap();
        assert_eq!(two.percentage, 67);
        assert!(!two.passed());
    }
}
