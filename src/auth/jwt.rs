//! JWT token handling for user sessions
//!
//! Tokens are signed with HS256 (HMAC-SHA256). Default expiry is one hour.
//! In production JWT_SECRET must be a strong random value from the
//! environment.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::LecternError;

/// Payload stored in JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User document id (hex ObjectId)
    pub sub: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Result of token validation
#[derive(Debug)]
pub struct TokenValidationResult {
    pub valid: bool,
    pub claims: Option<Claims>,
    pub error: Option<String>,
}

impl TokenValidationResult {
    pub fn valid(claims: Claims) -> Self {
        Self {
            valid: true,
            claims: Some(claims),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            claims: None,
            error: Some(error.into()),
        }
    }
}

/// JWT validator and generator
#[derive(Clone)]
pub struct JwtValidator {
    secret: String,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a new JWT validator
    ///
    /// Returns an error if the secret is empty or too short.
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self, LecternError> {
        if secret.is_empty() {
            return Err(LecternError::Config(
                "JWT_SECRET is required in production mode".into(),
            ));
        }

        if secret.len() < 32 {
            return Err(LecternError::Config(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Generate a JWT token for an authenticated user
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> Result<(String, u64), LecternError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| LecternError::Auth(format!("System time error: {}", e)))?
            .as_secs();

        let exp = now + self.expiry_seconds;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| LecternError::Auth(format!("Failed to generate token: {}", e)))?;

        Ok((token, exp))
    }

    /// Verify and decode a JWT token
    pub fn verify_token(&self, token: &str) -> TokenValidationResult {
        let validation = Validation::default();

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(token_data) => TokenValidationResult::valid(token_data.claims),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                let error_msg = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidToken => "Invalid token",
                    ErrorKind::InvalidSignature => "Invalid signature",
                    _ => "Token validation failed",
                };
                TokenValidationResult::invalid(error_msg)
            }
        }
    }
}

/// Extract a bearer token from an Authorization header value
pub fn extract_token_from_header(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| h.strip_prefix("Bearer ")).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> JwtValidator {
        JwtValidator::new("a-test-secret-that-is-long-enough-123".into(), 3600).unwrap()
    }

    #[test]
    fn generate_and_verify_round_trip() {
        let jwt = validator();
        let (token, exp) = jwt
            .generate_token("64f000000000000000000001", "a@example.com", "Ada")
            .unwrap();

        let result = jwt.verify_token(&token);
        assert!(result.valid);
        let claims = result.claims.unwrap();
        assert_eq!(claims.sub, "64f000000000000000000001");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = validator()
            .generate_token("64f000000000000000000001", "a@example.com", "Ada")
            .unwrap();

        let other = JwtValidator::new("a-different-secret-also-long-enough-1".into(), 3600).unwrap();
        assert!(!other.verify_token(&token).valid);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(JwtValidator::new("short".into(), 3600).is_err());
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_token_from_header(Some("Bearer abc")), Some("abc"));
        assert_eq!(extract_token_from_header(Some("Token abc")), None);
        assert_eq!(extract_token_from_header(None), None);
    }
}
