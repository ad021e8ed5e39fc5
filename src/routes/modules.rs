//! Module catalog endpoints
//!
//! GET /api/modules       - list all modules
//! GET /api/modules/:id   - fetch one module

use bson::doc;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::db::schemas::{ModuleDoc, MODULE_COLLECTION};
use crate::routes::{error_response, json_response, require_mongo, parse_object_id, BoxBody};
use crate::server::AppState;
use crate::types::LecternError;

/// Module as returned on the wire
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: String,
    pub tags: Vec<String>,
}

impl From<&ModuleDoc> for ModuleView {
    fn from(doc: &ModuleDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            title: doc.title.clone(),
            description: doc.description.clone(),
            level: doc.level.to_string(),
            tags: doc.tags.clone(),
        }
    }
}

/// GET /api/modules
pub async fn handle_list_modules(state: Arc<AppState>) -> Response<BoxBody> {
    let result: Result<Vec<ModuleView>, LecternError> = async {
        let mongo = require_mongo(&state)?;
        let modules = mongo
            .collection::<ModuleDoc>(MODULE_COLLECTION)
            .await?
            .find_many(doc! {})
            .await?;
        Ok(modules.iter().map(ModuleView::from).collect())
    }
    .await;

    match result {
        Ok(views) => json_response(StatusCode::OK, &views),
        Err(e) => error_response(&e),
    }
}

/// GET /api/modules/:id
pub async fn handle_get_module(state: Arc<AppState>, raw_id: &str) -> Response<BoxBody> {
    let result: Result<ModuleView, LecternError> = async {
        let id = parse_object_id(raw_id, "module")?;
        let mongo = require_mongo(&state)?;
        let module = mongo
            .collection::<ModuleDoc>(MODULE_COLLECTION)
            .await?
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| LecternError::NotFound("Module not found".into()))?;
        Ok(ModuleView::from(&module))
    }
    .await;

    match result {
        Ok(view) => json_response(StatusCode::OK, &view),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::ModuleLevel;

    #[test]
    fn view_exposes_hex_id_and_level_name() {
        let mut doc = ModuleDoc::new(
            "Introduction to FinTech",
            "Learn the basics of financial technology.",
            ModuleLevel::Beginner,
            vec!["fintech".into(), "basics".into()],
        );
        doc._id = Some(bson::oid::ObjectId::new());

        let view = ModuleView::from(&doc);
        assert_eq!(view.id.len(), 24);
        assert_eq!(view.level, "Beginner");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Introduction to FinTech");
        assert_eq!(json["tags"][0], "fintech");
    }
}
