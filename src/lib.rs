//! Intake - capability-link gateway for structured service submissions
//!
//! Intake collects survey-style service submissions from external entities
//! through signed, time-limited capability links, with a JSON admin API for
//! curating entities and reading what came in.
//!
//! ## Services
//!
//! - **Capability links**: HMAC-signed, TTL-bounded tokens that authorize a
//!   single entity's submission form without any submitter account
//! - **Validation**: declarative cross-field rule table enforced before a
//!   submission is persisted
//! - **Admin API**: JWT-authenticated entity curation and submission review
//!   backed by MongoDB

pub mod auth;
pub mod config;
pub mod db;
pub mod links;
pub mod routes;
pub mod server;
pub mod submission;
pub mod token;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{IntakeError, Result};
