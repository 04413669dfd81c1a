//! Database schemas for Intake
//!
//! Defines MongoDB document structures for entities, submissions, and
//! administrator accounts.

mod admin_user;
mod entity;
mod metadata;
mod submission;

pub use admin_user::{AdminUserDoc, ADMIN_USER_COLLECTION};
pub use entity::{EntityDoc, ENTITY_COLLECTION};
pub use metadata::Metadata;
pub use submission::{SubmissionDoc, SUBMISSION_COLLECTION};
