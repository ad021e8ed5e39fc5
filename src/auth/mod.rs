//! Authentication for Lectern
//!
//! Provides:
//! - Argon2 password hashing
//! - JWT token generation and validation for session auth

pub mod jwt;
pub mod password;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenValidationResult};
pub use password::{hash_password, verify_password};
