//! HTTP server for Intake

pub mod http;

pub use http::{run, AppState};
