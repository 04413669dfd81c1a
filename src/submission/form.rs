//! Typed submission form
//!
//! The incoming JSON body deserializes into `SubmissionForm`: every field is
//! either absent or a typed value, and the choice vocabularies are closed
//! enums rather than free strings. Serde rejects unknown option values at
//! the parse boundary, so the validation engine only ever sees well-typed
//! input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How users access the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    #[serde(rename = "Digital Only")]
    DigitalOnly,
    #[serde(rename = "Physical Only")]
    PhysicalOnly,
    #[serde(rename = "Both")]
    Both,
}

/// Who the service is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionCategory {
    G2G,
    G2B,
    G2C,
}

/// Geographic level the service is primarily delivered at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeographicReach {
    National,
    Regional,
    Local,
    Global,
}

/// Support channels available to service users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportChannel {
    #[serde(rename = "Help Desk")]
    HelpDesk,
    #[serde(rename = "Call Center")]
    CallCenter,
    #[serde(rename = "Online Chat")]
    OnlineChat,
    Email,
    #[serde(rename = "Social Media")]
    SocialMedia,
}

/// Where the backing IT system is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostingLocation {
    Cloud,
    #[serde(rename = "On-premise")]
    OnPremise,
    Hybrid,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::DigitalOnly => write!(f, "Digital Only"),
            AccessMode::PhysicalOnly => write!(f, "Physical Only"),
            AccessMode::Both => write!(f, "Both"),
        }
    }
}

/// A structured service submission as posted by an external entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionForm {
    // Identification
    pub service_name: String,
    #[serde(default)]
    pub description: Option<String>,

    // Interaction classification
    pub interaction_category: Vec<InteractionCategory>,
    #[serde(default)]
    pub g2g_beneficiary_count: Option<i64>,
    #[serde(default)]
    pub geographic_reach: Option<GeographicReach>,

    // Delivery/process description
    pub process_flow: String,

    // KPI tracking
    #[serde(default)]
    pub has_kpi: bool,
    #[serde(default)]
    pub kpi_details: Option<String>,

    // Durations
    #[serde(default)]
    pub standard_duration: Option<String>,
    #[serde(default)]
    pub actual_duration: Option<String>,

    // Demographics
    #[serde(default)]
    pub users_total: Option<i64>,
    #[serde(default)]
    pub users_female: Option<i64>,
    #[serde(default)]
    pub users_male: Option<i64>,

    // Satisfaction
    #[serde(default)]
    pub customer_satisfaction_measured: bool,
    #[serde(default)]
    pub customer_satisfaction_rating: Option<String>,

    // Support channels
    #[serde(default)]
    pub support_available: bool,
    #[serde(default)]
    pub support_channels: Vec<SupportChannel>,

    // Access channels
    pub access_mode: AccessMode,
    #[serde(default)]
    pub offices_count: Option<i64>,
    #[serde(default)]
    pub access_website: bool,
    #[serde(default)]
    pub access_mobile_app: bool,
    #[serde(default)]
    pub access_ussd: bool,
    #[serde(default)]
    pub access_physical_office: bool,
    #[serde(default)]
    pub requires_internet: bool,
    #[serde(default)]
    pub self_service_available: bool,

    // Technology backing
    #[serde(default)]
    pub supported_by_it_system: bool,
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub system_launch_date: Option<String>,
    #[serde(default)]
    pub system_version: Option<String>,
    #[serde(default)]
    pub system_last_update: Option<String>,
    #[serde(default)]
    pub system_target_uptime: Option<String>,
    #[serde(default)]
    pub system_actual_uptime: Option<String>,
    #[serde(default)]
    pub hosting_location: Option<HostingLocation>,
    #[serde(default)]
    pub funding_details: Option<String>,

    // Standards compliance
    #[serde(default)]
    pub complies_with_standards: bool,
    #[serde(default)]
    pub standards_details: Option<String>,

    // Integration
    #[serde(default)]
    pub system_integrated: bool,
    #[serde(default)]
    pub integrated_systems: Option<String>,

    // Automation plans
    #[serde(default)]
    pub planned_automation: bool,

    // Free-text comments
    #[serde(default)]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_form_deserializes() {
        let form: SubmissionForm = serde_json::from_str(
            r#"{
                "service_name": "Passport Renewal",
                "interaction_category": ["G2C"],
                "process_flow": "Apply online, collect in person",
                "access_mode": "Both"
            }"#,
        )
        .unwrap();

        assert_eq!(form.service_name, "Passport Renewal");
        assert_eq!(form.interaction_category, vec![InteractionCategory::G2C]);
        assert_eq!(form.access_mode, AccessMode::Both);
        assert!(!form.has_kpi);
        assert!(form.support_channels.is_empty());
    }

    #[test]
    fn test_vocabulary_values_roundtrip() {
        let json = serde_json::to_string(&AccessMode::PhysicalOnly).unwrap();
        assert_eq!(json, r#""Physical Only""#);

        let channel: SupportChannel = serde_json::from_str(r#""Help Desk""#).unwrap();
        assert_eq!(channel, SupportChannel::HelpDesk);

        let hosting: HostingLocation = serde_json::from_str(r#""On-premise""#).unwrap();
        assert_eq!(hosting, HostingLocation::OnPremise);
    }

    #[test]
    fn test_unknown_option_value_rejected() {
        let result: Result<SubmissionForm, _> = serde_json::from_str(
            r#"{
                "service_name": "X",
                "interaction_category": ["G2X"],
                "process_flow": "Y",
                "access_mode": "Both"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SubmissionForm, _> = serde_json::from_str(
            r#"{
                "service_name": "X",
                "interaction_category": ["G2C"],
                "process_flow": "Y",
                "access_mode": "Both",
                "not_a_field": true
            }"#,
        );
        assert!(result.is_err());
    }
}
