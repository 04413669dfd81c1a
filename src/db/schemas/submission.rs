//! Submission document schema
//!
//! A submission belongs to exactly one entity via `entity_id`. Entities hold
//! no submission collection of their own; "submissions for entity" is a
//! query against this collection. Submissions are created once on successful
//! validation and never updated by the service.
//!
//! Multi-select answers are stored as BSON arrays of their enum values, not
//! delimiter-joined strings, so option values can never collide with a
//! separator.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::submission::form::{
    AccessMode, GeographicReach, HostingLocation, InteractionCategory, SubmissionForm,
    SupportChannel,
};

/// Collection name for submissions
pub const SUBMISSION_COLLECTION: &str = "submissions";

/// Submission document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SubmissionDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning entity (foreign reference)
    pub entity_id: ObjectId,

    // Identification
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Interaction classification
    pub interaction_category: Vec<InteractionCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g2g_beneficiary_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_reach: Option<GeographicReach>,

    // Delivery/process description
    pub process_flow: String,

    // KPI tracking
    #[serde(default)]
    pub has_kpi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi_details: Option<String>,

    // Durations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<String>,

    // Demographics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_female: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_male: Option<i64>,

    // Satisfaction
    #[serde(default)]
    pub customer_satisfaction_measured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_satisfaction_rating: Option<String>,

    // Support channels
    #[serde(default)]
    pub support_available: bool,
    #[serde(default)]
    pub support_channels: Vec<SupportChannel>,

    // Access channels
    pub access_mode: Option<AccessMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_launch_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_target_uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_actual_uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosting_location: Option<HostingLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_details: Option<String>,

    // Standards compliance
    #[serde(default)]
    pub complies_with_standards: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standards_details: Option<String>,

    // Integration
    #[serde(default)]
    pub system_integrated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrated_systems: Option<String>,

    // Automation plans
    #[serde(default)]
    pub planned_automation: bool,

    // Free-text comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// ObjectId has no Default; the collection wrapper's bound still wants one
impl Default for SubmissionDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            entity_id: ObjectId::new(),
            service_name: String::new(),
            description: None,
            interaction_category: Vec::new(),
            g2g_beneficiary_count: None,
            geographic_reach: None,
            process_flow: String::new(),
            has_kpi: false,
            kpi_details: None,
            standard_duration: None,
            actual_duration: None,
            users_total: None,
            users_female: None,
            users_male: None,
            customer_satisfaction_measured: false,
            customer_satisfaction_rating: None,
            support_available: false,
            support_channels: Vec::new(),
            access_mode: None,
            offices_count: None,
            access_website: false,
            access_mobile_app: false,
            access_ussd: false,
            access_physical_office: false,
            requires_internet: false,
            self_service_available: false,
            supported_by_it_system: false,
            system_name: None,
            system_launch_date: None,
            system_version: None,
            system_last_update: None,
            system_target_uptime: None,
            system_actual_uptime: None,
            hosting_location: None,
            funding_details: None,
            complies_with_standards: false,
            standards_details: None,
            system_integrated: false,
            integrated_systems: None,
            planned_automation: false,
            comments: None,
        }
    }
}

impl SubmissionDoc {
    /// Build a document from a validated form, keyed by the owning entity
    pub fn from_form(entity_id: ObjectId, form: SubmissionForm) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            entity_id,
            service_name: form.service_name,
            description: form.description,
            interaction_category: form.interaction_category,
            g2g_beneficiary_count: form.g2g_beneficiary_count,
            geographic_reach: form.geographic_reach,
            process_flow: form.process_flow,
            has_kpi: form.has_kpi,
            kpi_details: form.kpi_details,
            standard_duration: form.standard_duration,
            actual_duration: form.actual_duration,
            users_total: form.users_total,
            users_female: form.users_female,
            users_male: form.users_male,
            customer_satisfaction_measured: form.customer_satisfaction_measured,
            customer_satisfaction_rating: form.customer_satisfaction_rating,
            support_available: form.support_available,
            support_channels: form.support_channels,
            access_mode: Some(form.access_mode),
            offices_count: form.offices_count,
            access_website: form.access_website,
            access_mobile_app: form.access_mobile_app,
            access_ussd: form.access_ussd,
            access_physical_office: form.access_physical_office,
            requires_internet: form.requires_internet,
            self_service_available: form.self_service_available,
            supported_by_it_system: form.supported_by_it_system,
            system_name: form.system_name,
            system_launch_date: form.system_launch_date,
            system_version: form.system_version,
            system_last_update: form.system_last_update,
            system_target_uptime: form.system_target_uptime,
            system_actual_uptime: form.system_actual_uptime,
            hosting_location: form.hosting_location,
            funding_details: form.funding_details,
            complies_with_standards: form.complies_with_standards,
            standards_details: form.standards_details,
            system_integrated: form.system_integrated,
            integrated_systems: form.integrated_systems,
            planned_automation: form.planned_automation,
            comments: form.comments,
        }
    }
}

impl IntoIndexes for SubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // All reads are "submissions for entity"
            (
                doc! { "entity_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("entity_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for SubmissionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
