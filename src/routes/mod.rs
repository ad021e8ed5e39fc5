//! HTTP routes for Lectern

pub mod achievements;
pub mod assessments;
pub mod health;
pub mod modules;
pub mod paths;
pub mod progress;
pub mod users;

pub use achievements::handle_user_achievements;
pub use assessments::{handle_get_assessment, handle_submit_assessment};
pub use health::{health_check, version_info};
pub use modules::{handle_get_module, handle_list_modules};
pub use paths::handle_user_path;
pub use progress::{handle_get_progress, handle_update_progress};
pub use users::{handle_login, handle_profile, handle_register};

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::MongoClient;
use crate::server::AppState;
use crate::types::LecternError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Standard error payload returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// =============================================================================
// Response Helpers
// =============================================================================

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

/// Map a domain error to its wire form
pub fn error_response(err: &LecternError) -> Response<BoxBody> {
    json_response(
        err.status_code(),
        &ErrorResponse {
            error: err.to_string(),
            code: None,
        },
    )
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Request bodies larger than this are rejected mid-stream, before the
/// whole payload is buffered.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub async fn parse_json_body<T, B>(req: Request<B>) -> Result<T, LecternError>
where
    T: for<'de> Deserialize<'de>,
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| LecternError::BadRequest(format!("Failed to read body: {}", e)))?;

    serde_json::from_slice(&body.to_bytes())
        .map_err(|e| LecternError::BadRequest(format!("Invalid JSON: {}", e)))
}

pub fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Parse a path segment or body field as a Mongo id
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, LecternError> {
    ObjectId::parse_str(raw)
        .map_err(|_| LecternError::BadRequest(format!("Invalid {} id: {}", what, raw)))
}

/// Resolve the database handle, or fail the request when running in dev mode
/// without one.
pub fn require_mongo(state: &AppState) -> Result<&MongoClient, LecternError> {
    state
        .mongo
        .as_ref()
        .ok_or_else(|| LecternError::Database("Database not available".into()))
}
