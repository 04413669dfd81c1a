//! Storage seam for the capability-link flow
//!
//! The resolver and the submission path only ever need three operations:
//! find the entities matching a slug, persist an entity's link, and insert a
//! submission. Keeping them behind a trait lets the link plumbing be tested
//! without a running MongoDB.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};

use crate::db::mongo::MongoClient;
use crate::db::schemas::{EntityDoc, SubmissionDoc, ENTITY_COLLECTION, SUBMISSION_COLLECTION};
use crate::types::{IntakeError, Result};

/// Storage operations consumed by the capability-link core
#[async_trait]
pub trait Store: Send + Sync {
    /// All live entities whose normalized name equals `slug`
    ///
    /// Returns every match so the caller owns the collision policy.
    async fn find_entities_by_slug(&self, slug: &str) -> Result<Vec<EntityDoc>>;

    /// Persist an entity's current state (link mint/regeneration)
    async fn update_entity(&self, entity: &EntityDoc) -> Result<()>;

    /// Insert a validated submission record
    async fn insert_submission(&self, submission: SubmissionDoc) -> Result<ObjectId>;
}

/// MongoDB-backed store
#[derive(Clone)]
pub struct MongoStore {
    mongo: MongoClient,
}

impl MongoStore {
    pub fn new(mongo: MongoClient) -> Self {
        Self { mongo }
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn find_entities_by_slug(&self, slug: &str) -> Result<Vec<EntityDoc>> {
        let collection = self.mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await?;
        collection.find_many(doc! { "name_slug": slug }).await
    }

    async fn update_entity(&self, entity: &EntityDoc) -> Result<()> {
        let id = entity
            ._id
            .ok_or_else(|| IntakeError::Internal("Entity has no ID".into()))?;

        let collection = self.mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await?;
        let update = doc! {
            "$set": {
                "name": &entity.name,
                "name_slug": &entity.name_slug,
                "capability_link": entity.capability_link.as_deref(),
                "metadata.updated_at": bson::DateTime::now(),
            }
        };
        collection.update_one(doc! { "_id": id }, update).await?;
        Ok(())
    }

    async fn insert_submission(&self, submission: SubmissionDoc) -> Result<ObjectId> {
        let collection = self
            .mongo
            .collection::<SubmissionDoc>(SUBMISSION_COLLECTION)
            .await?;
        collection.insert_one(submission).await
    }
}

/// In-memory store for tests of the link plumbing
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        pub entities: Mutex<Vec<EntityDoc>>,
        pub submissions: Mutex<Vec<SubmissionDoc>>,
    }

    impl MemoryStore {
        pub fn with_entities(entities: Vec<EntityDoc>) -> Self {
            Self {
                entities: Mutex::new(entities),
                submissions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Store for MemoryStore {
        async fn find_entities_by_slug(&self, slug: &str) -> Result<Vec<EntityDoc>> {
            Ok(self
                .entities
                .lock()
                .unwrap()
                .iter()
                .filter(|e| !e.metadata.is_deleted && e.name_slug == slug)
                .cloned()
                .collect())
        }

        async fn update_entity(&self, entity: &EntityDoc) -> Result<()> {
            let mut entities = self.entities.lock().unwrap();
            let existing = entities
                .iter_mut()
                .find(|e| e._id == entity._id)
                .ok_or_else(|| IntakeError::Internal("Entity has no ID".into()))?;
            *existing = entity.clone();
            Ok(())
        }

        async fn insert_submission(&self, submission: SubmissionDoc) -> Result<ObjectId> {
            let id = ObjectId::new();
            let mut stored = submission;
            stored._id = Some(id);
            self.submissions.lock().unwrap().push(stored);
            Ok(id)
        }
    }
}
