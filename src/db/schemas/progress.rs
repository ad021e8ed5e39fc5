//! Progress document schema
//!
//! The completion-state marker for one (user, module) pair. The unique
//! compound index plus upsert-only writes keep exactly one record per pair;
//! records are never deleted.

use bson::oid::ObjectId;
use bson::{DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for progress records
pub const PROGRESS_COLLECTION: &str = "progress";

/// Completion state for one (user, module) pair
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not-started"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Progress document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProgressDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    pub user_id: ObjectId,
    pub module_id: ObjectId,

    #[serde(default)]
    pub status: ProgressStatus,

    pub last_updated: DateTime,
}

// bson::DateTime has no Default, so this cannot be derived
impl Default for ProgressDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            user_id: ObjectId::new(),
            module_id: ObjectId::new(),
            status: ProgressStatus::default(),
            last_updated: DateTime::now(),
        }
    }
}

impl IntoIndexes for ProgressDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            // Hard invariant: one record per (user, module)
            bson::doc! { "user_id": 1, "module_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_module_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ProgressDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_kebab_case() {
        let json = serde_json::to_string(&ProgressStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: ProgressStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, ProgressStatus::Completed);
    }

    #[test]
    fn default_record_is_not_started() {
        let doc = ProgressDoc::default();
        assert_eq!(doc.status, ProgressStatus::NotStarted);
        assert!(doc._id.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed: Result<ProgressStatus, _> = serde_json::from_str("\"finished\"");
        assert!(parsed.is_err());
    }
}
