//! Per-user aggregate statistics
//!
//! Achievements and path recommendations both read the same two numbers:
//! how many modules the user has completed and their best submission
//! percentage. Both are derived on demand from the progress and submission
//! collections rather than kept as counters on the user document, so they
//! can never drift from the records they summarize.

use bson::doc;
use bson::oid::ObjectId;

use crate::db::schemas::{
    ProgressDoc, ProgressStatus, SubmissionDoc, PROGRESS_COLLECTION, SUBMISSION_COLLECTION,
};
use crate::db::MongoClient;
use crate::types::Result;

/// The aggregate inputs to achievement and path evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    /// Modules with progress status completed
    pub completed_modules: u32,
    /// Best submission percentage across all modules; 0 with no submissions
    pub score: u32,
}

/// Compute a user's aggregate stats from stored records.
pub async fn stats_for_user(mongo: &MongoClient, user_id: ObjectId) -> Result<UserStats> {
    let completed = mongo
        .collection::<ProgressDoc>(PROGRESS_COLLECTION)
        .await?
        .count(doc! {
            "user_id": user_id,
            "status": ProgressStatus::Completed.to_string(),
        })
        .await?;

    let submissions = mongo
        .collection::<SubmissionDoc>(SUBMISSION_COLLECTION)
        .await?
        .find_many(doc! { "user_id": user_id })
        .await?;

    let score = submissions.iter().map(|s| s.percentage).max().unwrap_or(0);

    Ok(UserStats {
        completed_modules: completed as u32,
        score,
    })
}
