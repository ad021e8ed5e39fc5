//! Lectern - learning-management backend
//!
//! Lectern serves a catalog of instructional modules, grades quiz
//! submissions, tracks per-user completion state, and derives achievement
//! unlocks and learning-path recommendations from that state.
//!
//! ## Services
//!
//! - **Catalog**: read-only module listing
//! - **Assessments**: per-module question banks and graded submissions
//! - **Progress**: idempotent per-(user, module) completion records
//! - **Achievements**: badge unlocks derived from aggregate stats
//! - **Paths**: suggested difficulty tier plus next-step hints

pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{LecternError, Result};
