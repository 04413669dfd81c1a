//! Shared types for Intake

mod error;

pub use error::{IntakeError, Result};
