//! Configuration for Lectern
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::net::SocketAddr;

/// Lectern - learning-management backend
#[derive(Parser, Debug, Clone)]
#[command(name = "lectern")]
#[command(about = "HTTP backend for modules, assessments, progress, achievements, and paths")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "lectern")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// Enable development mode (runs without MongoDB, relaxed auth config)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Canonical representation of assessment answer keys for this deployment.
    /// Every assessment is validated against this format before grading;
    /// a question that does not fit it is rejected, never silently mis-graded.
    #[arg(long, env = "ANSWER_KEY_FORMAT", value_enum, default_value_t = AnswerKeyFormat::Text)]
    pub answer_key_format: AnswerKeyFormat,
}

/// How `correct_answer` is stored on assessment questions.
///
/// The two representations existed in different revisions of the data set.
/// A deployment picks exactly one; mixing them within an assessment is a
/// validation failure.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKeyFormat {
    /// `correct_answer` holds the literal text of the correct option
    Text,
    /// `correct_answer` holds the zero-based index into `options`, as digits
    Index,
}

impl fmt::Display for AnswerKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Index => write!(f, "index"),
        }
    }
}

impl Args {
    /// Get effective JWT secret. Dev mode falls back to a fixed insecure
    /// value; production returns None when unset (validate() rejects that).
    pub fn jwt_secret(&self) -> Option<String> {
        match (&self.jwt_secret, self.dev_mode) {
            (Some(s), _) => Some(s.clone()),
            (None, true) => Some("dev-only-insecure-secret-0123456789ab".to_string()),
            (None, false) => None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.jwt_secret {
                None => return Err("JWT_SECRET is required in production mode".to_string()),
                Some(s) if s.len() < 32 => {
                    return Err("JWT_SECRET must be at least 32 characters".to_string())
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["lectern"])
    }

    #[test]
    fn defaults_are_valid_in_dev_mode() {
        let mut args = base_args();
        args.dev_mode = true;
        assert!(args.validate().is_ok());
        // Dev mode supplies a fallback secret long enough for HS256
        assert!(args.jwt_secret().unwrap().len() >= 32);
    }

    #[test]
    fn production_requires_a_strong_secret() {
        let mut args = base_args();
        args.dev_mode = false;
        assert!(args.validate().is_err());

        args.jwt_secret = Some("short".into());
        assert!(args.validate().is_err());

        args.jwt_secret = Some("a".repeat(32));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn answer_key_format_defaults_to_text() {
        assert_eq!(base_args().answer_key_format, AnswerKeyFormat::Text);
    }
}
