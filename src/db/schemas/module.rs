//! Module document schema
//!
//! A module is one unit of instructional content at a given difficulty
//! level. Modules are seeded or administered out of band and are read-only
//! at runtime.

use bson::oid::ObjectId;
use bson::Document;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for modules
pub const MODULE_COLLECTION: &str = "modules";

/// Difficulty level of a module (also the recommendation tiers)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModuleLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ModuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Module document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ModuleDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Display title
    pub title: String,

    /// Short description shown in listings
    #[serde(default)]
    pub description: String,

    /// Difficulty level
    #[serde(default)]
    pub level: ModuleLevel,

    /// Free-form topic tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ModuleDoc {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        level: ModuleLevel,
        tags: Vec<String>,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            title: title.into(),
            description: description.into(),
            level,
            tags,
        }
    }
}

impl IntoIndexes for ModuleDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            bson::doc! { "level": 1 },
            Some(IndexOptions::builder().name("level_index".to_string()).build()),
        )]
    }
}

impl MutMetadata for ModuleDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
