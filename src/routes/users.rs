//! User account endpoints
//!
//! POST /api/users/register - create an account, returns a session token
//! POST /api/users/login    - authenticate, returns a session token
//! GET  /api/users/profile  - logged-in user's profile (Bearer token)
//!
//! Login failures are deliberately indistinguishable: a missing account and
//! a wrong password both return the same 401 so the endpoint cannot be used
//! to probe which emails are registered.

use bson::doc;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{extract_token_from_header, password};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::routes::{
    error_response, get_auth_header, json_response, parse_json_body, parse_object_id,
    require_mongo, BoxBody,
};
use crate::server::AppState;
use crate::types::LecternError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// Token expiry as a Unix timestamp
    pub expires_at: u64,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&UserDoc> for UserView {
    fn from(doc: &UserDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name.clone(),
            email: doc.email.clone(),
        }
    }
}

/// POST /api/users/register
pub async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let result: Result<AuthResponse, LecternError> = async {
        let body: RegisterRequest = parse_json_body(req).await?;

        let name = body.name.trim();
        let email = body.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || body.password.is_empty() {
            return Err(LecternError::Validation(
                "Missing required fields: name, email, password".into(),
            ));
        }
        if !email.contains('@') {
            return Err(LecternError::Validation("Invalid email address".into()));
        }

        let mongo = require_mongo(&state)?;
        let users = mongo.collection::<UserDoc>(USER_COLLECTION).await?;

        if users.find_one(doc! { "email": &email }).await?.is_some() {
            return Err(LecternError::Conflict("User already exists".into()));
        }

        let password_hash = password::hash_password(&body.password)?;
        let mut user = UserDoc::new(name, &email, &password_hash);

        // The unique email index still backstops a concurrent duplicate
        // register; that race surfaces as a database error here.
        let id = users.insert_one(user.clone()).await?;
        user._id = Some(id);

        let (token, expires_at) = state.jwt.generate_token(&id.to_hex(), &email, name)?;

        tracing::info!(user = %id, "Registered user");

        Ok(AuthResponse {
            token,
            expires_at,
            user: UserView::from(&user),
        })
    }
    .await;

    match result {
        Ok(response) => json_response(StatusCode::CREATED, &response),
        Err(e) => error_response(&e),
    }
}

/// POST /api/users/login
pub async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let result: Result<AuthResponse, LecternError> = async {
        let body: LoginRequest = parse_json_body(req).await?;
        let email = body.email.trim().to_lowercase();

        let mongo = require_mongo(&state)?;
        let users = mongo.collection::<UserDoc>(USER_COLLECTION).await?;

        let user = users
            .find_one(doc! { "email": &email })
            .await?
            .ok_or_else(|| LecternError::Unauthorized("Invalid credentials".into()))?;

        if !password::verify_password(&body.password, &user.password_hash)? {
            return Err(LecternError::Unauthorized("Invalid credentials".into()));
        }

        let id = user
            ._id
            .ok_or_else(|| LecternError::Internal("User record has no id".into()))?;
        let (token, expires_at) = state.jwt.generate_token(&id.to_hex(), &user.email, &user.name)?;

        Ok(AuthResponse {
            token,
            expires_at,
            user: UserView::from(&user),
        })
    }
    .await;

    match result {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(e) => error_response(&e),
    }
}

/// GET /api/users/profile
pub async fn handle_profile(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let result: Result<UserView, LecternError> = async {
        let token = extract_token_from_header(get_auth_header(&req))
            .ok_or_else(|| LecternError::Unauthorized("Missing bearer token".into()))?;

        let validation = state.jwt.verify_token(token);
        let claims = validation.claims.ok_or_else(|| {
            LecternError::Unauthorized(
                validation.error.unwrap_or_else(|| "Invalid token".into()),
            )
        })?;

        let user_id = parse_object_id(&claims.sub, "user")?;
        let mongo = require_mongo(&state)?;
        let user = mongo
            .collection::<UserDoc>(USER_COLLECTION)
            .await?
            .find_one(doc! { "_id": user_id })
            .await?
            .ok_or_else(|| LecternError::NotFound("User not found".into()))?;

        Ok(UserView::from(&user))
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

    #[test]
    fn auth_response_never_contains_hash() {
        let user = UserDoc::new("Ada", "ada@example.com", "$argon2id$fake");
        let response = AuthResponse {
            token: "jwt".into(),
            expires_at: 1756000000,
            user: UserView::from(&user),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("expiresAt"));
    }

    #[test]
    fn register_request_requires_all_fields() {
        let parsed: Result<RegisterRequest, _> =
            serde_json::from_str(r#"{ "email": "a@b.c", "password": "x" }"#);
        assert!(parsed.is_err());
    }
}
