//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Routing is a plain
//! match over (method, path); path parameters are peeled off with the
//! helpers at the bottom.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes::{self, cors_preflight, json_response, BoxBody, ErrorResponse};
use crate::types::LecternError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub mongo: Option<MongoClient>,
    pub jwt: JwtValidator,
}

impl AppState {
    /// Build state from validated configuration and an optional database
    /// handle. Mongo is only optional in dev mode.
    pub fn new(args: Args, mongo: Option<MongoClient>) -> Result<Self, LecternError> {
        let jwt = match args.jwt_secret() {
            Some(secret) => JwtValidator::new(secret, args.jwt_expiry_seconds)?,
            None => {
                return Err(LecternError::Config(
                    "JWT_SECRET is required in production mode".into(),
                ))
            }
        };

        Ok(Self { args, mongo, jwt })
    }
}

/// Main request dispatcher
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("{} {} from {}", method, path, addr);

    let response = match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => cors_preflight(),

        (&Method::GET, "/health") | (&Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }
        (&Method::GET, "/version") => routes::version_info(),

        (&Method::GET, "/api/modules") => routes::handle_list_modules(Arc::clone(&state)).await,

        (&Method::POST, "/api/assessment/submit") => {
            routes::handle_submit_assessment(req, Arc::clone(&state)).await
        }

        (&Method::POST, "/api/progress/update") => {
            routes::handle_update_progress(req, Arc::clone(&state)).await
        }

        (&Method::POST, "/api/users/register") => {
            routes::handle_register(req, Arc::clone(&state)).await
        }
        (&Method::POST, "/api/users/login") => {
            routes::handle_login(req, Arc::clone(&state)).await
        }
        (&Method::GET, "/api/users/profile") => {
            routes::handle_profile(req, Arc::clone(&state)).await
        }

        (&Method::GET, _) => {
            if let Some(id) = path_param(&path, "/api/modules/") {
                routes::handle_get_module(Arc::clone(&state), id).await
            } else if let Some(module_id) = path_param(&path, "/api/assessment/") {
                routes::handle_get_assessment(Arc::clone(&state), module_id).await
            } else if let Some(user_id) = path_param(&path, "/api/progress/") {
                routes::handle_get_progress(Arc::clone(&state), user_id).await
            } else if let Some(user_id) = path_param(&path, "/api/paths/") {
                routes::handle_user_path(Arc::clone(&state), user_id).await
            } else if let Some(user_id) = wrapped_path_param(&path, "/api/users/", "/achievements")
            {
                routes::handle_user_achievements(Arc::clone(&state), user_id).await
            } else {
                not_found()
            }
        }

        _ => not_found(),
    };

    Ok(response)
}

fn not_found() -> Response<BoxBody> {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorResponse {
            error: "Not found".into(),
            code: None,
        },
    )
}

/// Extract the single path segment after a prefix.
/// Returns None when the remainder is empty or spans further segments.
fn path_param<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// Extract the single path segment between a prefix and a suffix,
/// e.g. the user id in /api/users/:userId/achievements.
fn wrapped_path_param<'a>(path: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// Run the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), LecternError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Lectern listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }
    if state.mongo.is_none() {
        warn!("Running without MongoDB - API requests will return 503");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_param() {
        assert_eq!(
            path_param("/api/modules/64f0", "/api/modules/"),
            Some("64f0")
        );
        assert_eq!(path_param("/api/modules/", "/api/modules/"), None);
        assert_eq!(path_param("/api/modules/a/b", "/api/modules/"), None);
        assert_eq!(path_param("/api/paths/u1", "/api/paths/"), Some("u1"));
    }

    #[test]
    fn wrapped_param() {
        assert_eq!(
            wrapped_path_param("/api/users/u1/achievements", "/api/users/", "/achievements"),
            Some("u1")
        );
        assert_eq!(
            wrapped_path_param("/api/users//achievements", "/api/users/", "/achievements"),
            None
        );
        assert_eq!(
            wrapped_path_param("/api/users/u1/other", "/api/users/", "/achievements"),
            None
        );
        assert_eq!(
            wrapped_path_param("/api/users/a/b/achievements", "/api/users/", "/achievements"),
            None
        );
    }
}
