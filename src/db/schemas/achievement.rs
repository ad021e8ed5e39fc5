//! Achievement document schema
//!
//! Static reference data: each badge is a pair of thresholds, so new
//! achievements are data additions, not code changes.

use bson::oid::ObjectId;
use bson::Document;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for achievements
pub const ACHIEVEMENT_COLLECTION: &str = "achievements";

/// Unlock thresholds; both dimensions must be met (AND). A zero threshold
/// is trivially satisfied on that dimension.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct AchievementCriteria {
    #[serde(default)]
    pub min_completed_modules: u32,

    #[serde(default)]
    pub min_score: u32,
}

/// Achievement document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AchievementDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub criteria: AchievementCriteria,
}

impl AchievementDoc {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        min_completed_modules: u32,
        min_score: u32,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            title: title.into(),
            description: description.into(),
            criteria: AchievementCriteria {
                min_completed_modules,
                min_score,
            },
        }
    }
}

impl IntoIndexes for AchievementDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            bson::doc! { "title": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("title_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for AchievementDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
