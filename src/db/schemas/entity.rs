//! Entity document schema
//!
//! An entity is an external organization invited to submit services. Its
//! `name_slug` field is always `slug::normalize(name)` and is the lookup key
//! for capability-link resolution; the index on it is deliberately NOT
//! unique, because two distinct names may normalize to the same slug (the
//! resolver refuses ambiguous matches).

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::token::slug;

/// Collection name for entities
pub const ENTITY_COLLECTION: &str = "entities";

/// Entity document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EntityDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Unique human-readable display name
    pub name: String,

    /// Canonical slug of `name`, maintained on every rename
    pub name_slug: String,

    /// Entity classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Contact person details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Minted capability token, absent until first mint. A rename does NOT
    /// re-mint; the stored link keeps encoding the slug from mint time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_link: Option<String>,
}

impl EntityDoc {
    /// Create a new entity document with a derived slug and no link yet
    pub fn new(name: String) -> Self {
        let name_slug = slug::normalize(&name);
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            name_slug,
            category: None,
            sector: None,
            contact_name: None,
            contact_position: None,
            contact_phone: None,
            contact_email: None,
            capability_link: None,
        }
    }

    /// Rename the entity, keeping `name_slug` in sync
    pub fn rename(&mut self, name: String) {
        self.name_slug = slug::normalize(&name);
        self.name = name;
    }
}

impl IntoIndexes for EntityDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on display name
            (
                doc! { "name": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("name_unique".to_string())
                        .build(),
                ),
            ),
            // Slug lookups for capability-link resolution (not unique)
            (
                doc! { "name_slug": 1 },
                Some(
                    IndexOptions::builder()
                        .name("name_slug_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for EntityDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_slug() {
        let entity = EntityDoc::new("Ministry   Of Health".into());
        assert_eq!(entity.name_slug, "ministry_of_health");
        assert!(entity.capability_link.is_none());
    }

    #[test]
    fn test_rename_keeps_slug_in_sync() {
        let mut entity = EntityDoc::new("Ministry Of Health".into());
        entity.capability_link = Some("token".into());

        entity.rename("Ministry Of Finance".into());
        assert_eq!(entity.name_slug, "ministry_of_finance");
        // The link is untouched; it still encodes the old slug
        assert_eq!(entity.capability_link.as_deref(), Some("token"));
    }
}
