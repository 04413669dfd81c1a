//! Administrator account schema
//!
//! Stores console credentials. External submitters have no accounts at all;
//! only administrators authenticate with a password.

use bson::{doc, Document, oid::ObjectId};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for administrator accounts
pub const ADMIN_USER_COLLECTION: &str = "admin_users";

/// Administrator document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AdminUserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Administrator identifier (email or username)
    pub identifier: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Token version for invalidation (increment to invalidate all sessions)
    #[serde(default)]
    pub token_version: i32,

    /// Whether the account is active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AdminUserDoc {
    /// Create a new administrator document
    pub fn new(identifier: String, password_hash: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            identifier,
            password_hash,
            token_version: 1,
            is_active: true,
        }
    }
}

impl IntoIndexes for AdminUserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on identifier
            (
                doc! { "identifier": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("identifier_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for AdminUserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
