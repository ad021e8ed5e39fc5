//! Progress tracking
//!
//! One record per (user, module), written exclusively through an upsert so
//! concurrent updates collapse to last-writer-wins at the storage layer.

use bson::oid::ObjectId;
use bson::{doc, DateTime};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::db::schemas::{
    ModuleDoc, ProgressDoc, ProgressStatus, MODULE_COLLECTION, PROGRESS_COLLECTION,
};
use crate::db::MongoClient;
use crate::types::Result;

/// A user's progress on one module, with the module's display fields joined
/// in for listing responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub module_id: String,
    /// Display fields are empty when the module document no longer exists
    pub module_title: String,
    pub module_description: String,
    pub module_level: String,
    pub status: ProgressStatus,
    pub last_updated: String,
}

/// Set the status of a (user, module) pair, creating the record on first
/// touch. Returns the post-update record.
pub async fn set_status(
    mongo: &MongoClient,
    user_id: ObjectId,
    module_id: ObjectId,
    status: ProgressStatus,
) -> Result<ProgressDoc> {
    let collection = mongo.collection::<ProgressDoc>(PROGRESS_COLLECTION).await?;

    let record = collection
        .upsert_one(
            doc! { "user_id": user_id, "module_id": module_id },
            doc! {
                "$set": {
                    "status": status.to_string(),
                    "last_updated": DateTime::now(),
                },
            },
        )
        .await?;

    debug!(user = %user_id, module = %module_id, status = %status, "Progress updated");

    Ok(record)
}

/// List a user's progress records with module titles joined in.
///
/// An unknown user simply has no records; this returns an empty list rather
/// than an error. Records pointing at modules that have since been removed
/// are kept, with empty display fields.
pub async fn get_for_user(mongo: &MongoClient, user_id: ObjectId) -> Result<Vec<ProgressView>> {
    let progress = mongo
        .collection::<ProgressDoc>(PROGRESS_COLLECTION)
        .await?
        .find_many(doc! { "user_id": user_id })
        .await?;

    if progress.is_empty() {
        return Ok(Vec::new());
    }

    let module_ids: Vec<ObjectId> = progress.iter().map(|p| p.module_id).collect();
    let modules = mongo
        .collection::<ModuleDoc>(MODULE_COLLECTION)
        .await?
        .find_many(doc! { "_id": { "$in": module_ids } })
        .await?;

    let by_id: HashMap<ObjectId, &ModuleDoc> = modules
        .iter()
        .filter_map(|m| m._id.map(|id| (id, m)))
        .collect();

    Ok(progress
        .iter()
        .map(|p| {
            let module = by_id.get(&p.module_id);
            ProgressView {
                module_id: p.module_id.to_hex(),
                module_title: module.map(|m| m.title.clone()).unwrap_or_default(),
                module_description: module.map(|m| m.description.clone()).unwrap_or_default(),
                module_level: module.map(|m| m.level.to_string()).unwrap_or_default(),
                status: p.status,
                last_updated: p
                    .last_updated
                    .try_to_rfc3339_string()
                    .unwrap_or_default(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_serializes_camel_case() {
        let view = ProgressView {
            module_id: "64f000000000000000000001".into(),
            module_title: "Introduction to FinTech".into(),
            module_description: "Learn the basics of financial technology.".into(),
            module_level: "Beginner".into(),
            status: ProgressStatus::Completed,
            last_updated: "2026-08-24T00:00:00Z".into(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["moduleId"], "64f000000000000000000001");
        assert_eq!(json["moduleTitle"], "Introduction to FinTech");
        assert_eq!(
            json["moduleDescription"],
            "Learn the basics of financial technology."
        );
        assert_eq!(json["status"], "completed");
        assert!(json.get("module_id").is_none());
    }

    // set_status / get_for_user require a running MongoDB instance and are
    // covered by deployment smoke tests.
}
