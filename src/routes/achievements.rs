//! Achievement endpoints
//!
//! GET /api/users/:userId/achievements - achievements the user has unlocked

use bson::doc;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::db::schemas::{AchievementDoc, UserDoc, ACHIEVEMENT_COLLECTION, USER_COLLECTION};
use crate::routes::{error_response, json_response, parse_object_id, require_mongo, BoxBody};
use crate::server::AppState;
use crate::services::{achievements, stats};
use crate::types::LecternError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievementsResponse {
    pub user_id: String,
    pub unlocked_achievements: Vec<UnlockedAchievement>,
}

#[derive(Debug, Serialize)]
pub struct UnlockedAchievement {
    pub title: String,
    pub description: String,
}

/// GET /api/users/:userId/achievements
pub async fn handle_user_achievements(
    state: Arc<AppState>,
    raw_user_id: &str,
) -> Response<BoxBody> {
    let result: Result<UserAchievementsResponse, LecternError> = async {
        let user_id = parse_object_id(raw_user_id, "user")?;
        let mongo = require_mongo(&state)?;

        // Unknown users 404 rather than reporting an empty unlocked set.
        mongo
            .collection::<UserDoc>(USER_COLLECTION)
            .await?
            .find_one(doc! { "_id": user_id })
            .await?
            .ok_or_else(|| LecternError::NotFound("User not found".into()))?;

        let user_stats = stats::stats_for_user(mongo, user_id).await?;
        let catalog = mongo
            .collection::<AchievementDoc>(ACHIEVEMENT_COLLECTION)
            .await?
            .find_many(doc! {})
            .await?;

        let unlocked = achievements::unlocked_for(user_stats, &catalog)
            .into_iter()
            .map(|a| UnlockedAchievement {
                title: a.title.clone(),
                description: a.description.clone(),
            })
            .collect();

        Ok(UserAchievementsResponse {
            user_id: user_id.to_hex(),
            unlocked_achievements: unlocked,
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
    fn response_uses_camel_case_wrapper() {
        let response = UserAchievementsResponse {
            user_id: "64f000000000000000000001".into(),
            unlocked_achievements: vec![UnlockedAchievement {
                title: "First Steps".into(),
                description: "Complete your first module".into(),
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["unlockedAchievements"][0]["title"], "First Steps");
        assert_eq!(json["userId"], "64f000000000000000000001");
    }
}
