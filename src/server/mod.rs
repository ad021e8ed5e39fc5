//! HTTP server for Lectern

pub mod http;

pub use http::{run, AppState};
