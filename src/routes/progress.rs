//! Progress endpoints
//!
//! POST /api/progress/update   - upsert one (user, module) status
//! GET  /api/progress/:userId  - list a user's progress with module titles

use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bson::doc;

use crate::db::schemas::{ModuleDoc, ProgressStatus, MODULE_COLLECTION};
use crate::routes::{
    error_response, json_response, parse_json_body, parse_object_id, require_mongo, BoxBody,
};
use crate::server::AppState;
use crate::services::progress;
use crate::types::LecternError;

/// Request body for POST /api/progress/update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub user_id: String,
    pub module_id: String,
    /// One of not-started, in-progress, completed. Anything else is a 400.
    pub status: ProgressStatus,
}

/// Response body for POST /api/progress/update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressResponse {
    pub user_id: String,
    pub module_id: String,
    /// Empty when the module document does not exist
    pub module_title: String,
    pub status: ProgressStatus,
    pub last_updated: String,
}

/// POST /api/progress/update
pub async fn handle_update_progress(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let result: Result<UpdateProgressResponse, LecternError> = async {
        let body: UpdateProgressRequest = parse_json_body(req).await?;
        let user_id = parse_object_id(&body.user_id, "user")?;
        let module_id = parse_object_id(&body.module_id, "module")?;

        let mongo = require_mongo(&state)?;
        let record = progress::set_status(mongo, user_id, module_id, body.status).await?;

        let module_title = mongo
            .collection::<ModuleDoc>(MODULE_COLLECTION)
            .await?
            .find_one(doc! { "_id": module_id })
            .await?
            .map(|m| m.title)
            .unwrap_or_default();

        Ok(UpdateProgressResponse {
            user_id: record.user_id.to_hex(),
            module_id: record.module_id.to_hex(),
            module_title,
            status: record.status,
            last_updated: record
                .last_updated
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        })
    }
    .await;

    match result {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(e) => error_response(&e),
    }
}

/// GET /api/progress/:userId
pub async fn handle_get_progress(state: Arc<AppState>, raw_user_id: &str) -> Response<BoxBody> {
    let result: Result<_, LecternError> = async {
        let user_id = parse_object_id(raw_user_id, "user")?;
        let mongo = require_mongo(&state)?;
        progress::get_for_user(mongo, user_id).await
    }
    .await;

    match result {
        Ok(views) => json_response(StatusCode::OK, &views),
        Err(e) => error_response(&e),
    }
}
