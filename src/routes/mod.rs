//! HTTP routes for Intake

pub mod admin_entities;
pub mod auth_routes;
pub mod health;
pub mod helpers;
pub mod submit;

pub use admin_entities::handle_admin_entities_request;
pub use auth_routes::handle_auth_request;
pub use health::{health_check, readiness_check, version_info};
pub use submit::handle_submit_request;
