//! Typed submissions and the conditional validation engine

pub mod form;
pub mod validation;

pub use form::{
    AccessMode, GeographicReach, HostingLocation, InteractionCategory, SubmissionForm,
    SupportChannel,
};
pub use validation::{validate, RuleViolation};
