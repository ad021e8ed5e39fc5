//! Learning-path endpoint
//!
//! GET /api/paths/:userId - tier recommendation with suggested next actions

use bson::doc;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::routes::{error_response, json_response, parse_object_id, require_mongo, BoxBody};
use crate::server::AppState;
use crate::services::{paths, stats};
use crate::types::LecternError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub user_id: String,
    pub suggested_path: String,
    pub next_steps: Vec<&'static str>,
}

/// GET /api/paths/:userId
pub async fn handle_user_path(state: Arc<AppState>, raw_user_id: &str) -> Response<BoxBody> {
    let result: Result<PathResponse, LecternError> = async {
        let user_id = parse_object_id(raw_user_id, "user")?;
        let mongo = require_mongo(&state)?;

        mongo
            .collection::<UserDoc>(USER_COLLECTION)
            .await?
            .find_one(doc! { "_id": user_id })
            .await?
            .ok_or_else(|| LecternError::NotFound("User not found".into()))?;

        let user_stats = stats::stats_for_user(mongo, user_id).await?;
        let tier = paths::recommend(user_stats);

        Ok(PathResponse {
            user_id: user_id.to_hex(),
            suggested_path: tier.to_string(),
            next_steps: paths::next_steps(tier),
        })
    }
    .await;

    match result {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shape() {
        let response = PathResponse {
            user_id: "64f000000000000000000001".into(),
            suggested_path: "Beginner".into(),
            next_steps: vec![
                "Complete basics of FinTech",
                "Finish at least 5 modules",
                "Target 50%+ score",
            ],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["suggestedPath"], "Beginner");
        assert_eq!(json["nextSteps"].as_array().unwrap().len(), 3);
    }
}
