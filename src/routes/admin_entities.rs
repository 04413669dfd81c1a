//! Admin API for entity curation
//!
//! - GET    /admin/entities                        - list entities
//! - POST   /admin/entities                        - create entity (mints its link)
//! - GET    /admin/entities/{id}                   - fetch one entity
//! - PUT    /admin/entities/{id}                   - update entity (never re-mints)
//! - DELETE /admin/entities/{id}                   - soft-delete entity
//! - POST   /admin/entities/{id}/regenerate-link   - mint a fresh link
//! - GET    /admin/entities/{id}/submissions       - submissions for entity
//!
//! Regenerating a link does not revoke the old token; holders of the old
//! link can submit until its TTL lapses (see `links::manager`).

use bson::{doc, oid::ObjectId};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::schemas::{
    EntityDoc, SubmissionDoc, ENTITY_COLLECTION, SUBMISSION_COLLECTION,
};
use crate::db::{MongoClient, Store};
use crate::routes::helpers::{
    cors_preflight, error_response, guard, intake_error_response, json_response, parse_json_body,
    BoxBody, SuccessResponse,
};
use crate::server::AppState;
use crate::token::slug;

#[derive(Debug, Deserialize)]
pub struct CreateEntityRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_position: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntityRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_position: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntityResponse {
    pub id: String,
    pub name: String,
    pub name_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_url: Option<String>,
}

impl EntityResponse {
    fn from_doc(doc: EntityDoc, state: &AppState) -> Self {
        let submit_url = doc
            .capability_link
            .as_deref()
            .map(|token| state.args.submit_url(token));
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            name_slug: doc.name_slug,
            category: doc.category,
            sector: doc.sector,
            contact_name: doc.contact_name,
            contact_position: doc.contact_position,
            contact_phone: doc.contact_phone,
            contact_email: doc.contact_email,
            capability_link: doc.capability_link,
            submit_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionSummary {
    pub id: String,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub interaction_category: Vec<crate::submission::InteractionCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<crate::submission::AccessMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

impl From<SubmissionDoc> for SubmissionSummary {
    fn from(doc: SubmissionDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            service_name: doc.service_name,
            description: doc.description,
            interaction_category: doc.interaction_category,
            access_mode: doc.access_mode,
            submitted_at: doc
                .metadata
                .created_at
                .and_then(|ts| ts.try_to_rfc3339_string().ok()),
        }
    }
}

/// Route /admin/entities* requests
pub async fn handle_admin_entities_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    path: &str,
) -> Response<BoxBody> {
    if req.method() == Method::OPTIONS {
        return cors_preflight();
    }

    let mongo = match &state.mongo {
        Some(m) => m.clone(),
        None => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not available",
                Some("DB_UNAVAILABLE"),
            )
        }
    };

    // Path shapes: /admin/entities, /admin/entities/{id},
    // /admin/entities/{id}/regenerate-link, /admin/entities/{id}/submissions
    let remainder = path
        .strip_prefix("/admin/entities")
        .unwrap_or("")
        .trim_start_matches('/');
    let segments: Vec<&str> = remainder.split('/').filter(|s| !s.is_empty()).collect();

    match (req.method().clone(), segments.as_slice()) {
        (Method::GET, []) => handle_list(req, state, mongo).await,
        (Method::POST, []) => handle_create(req, state, mongo).await,
        (Method::GET, [id]) => {
            let id = id.to_string();
            handle_get(req, state, mongo, &id).await
        }
        (Method::PUT, [id]) => {
            let id = id.to_string();
            handle_update(req, state, mongo, &id).await
        }
        (Method::DELETE, [id]) => {
            let id = id.to_string();
            handle_delete(req, state, mongo, &id).await
        }
        (Method::POST, [id, "regenerate-link"]) => {
            let id = id.to_string();
            handle_regenerate(req, state, mongo, &id).await
        }
        (Method::GET, [id, "submissions"]) => {
            let id = id.to_string();
            handle_submissions(req, state, mongo, &id).await
        }
        _ => error_response(StatusCode::NOT_FOUND, "Admin endpoint not found", None),
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId, Response<BoxBody>> {
    ObjectId::parse_str(id)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid entity ID", None))
}

async fn find_entity(
    mongo: &MongoClient,
    id: ObjectId,
) -> Result<EntityDoc, Response<BoxBody>> {
    let collection = mongo
        .collection::<EntityDoc>(ENTITY_COLLECTION)
        .await
        .map_err(intake_error_response)?;

    collection
        .find_one(doc! { "_id": id })
        .await
        .map_err(intake_error_response)?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Entity not found", None))
}

async fn handle_list(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "list_entities") {
        return resp;
    }

    let collection = match mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    match collection.find_many(doc! {}).await {
        Ok(entities) => {
            let list: Vec<EntityResponse> = entities
                .into_iter()
                .map(|e| EntityResponse::from_doc(e, &state))
                .collect();
            json_response(StatusCode::OK, &list)
        }
        Err(e) => intake_error_response(e),
    }
}

async fn handle_create(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "create_entity") {
        return resp;
    }

    let body: CreateEntityRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return intake_error_response(e),
    };

    if body.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Entity name is required", None);
    }

    let collection = match mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    // Names are unique; reject duplicates up front with a clear error
    match collection.find_one(doc! { "name": body.name.trim() }).await {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::CONFLICT,
                "An entity with this name already exists",
                Some("DUPLICATE_NAME"),
            )
        }
        Ok(None) => {}
        Err(e) => return intake_error_response(e),
    }

    let mut entity = EntityDoc::new(body.name.trim().to_string());
    entity.category = body.category;
    entity.sector = body.sector;
    entity.contact_name = body.contact_name;
    entity.contact_position = body.contact_position;
    entity.contact_phone = body.contact_phone;
    entity.contact_email = body.contact_email;

    // Mint the capability link before first persist
    state.links.ensure_link(&mut entity);

    let id = match collection.insert_one(entity.clone()).await {
        Ok(id) => id,
        Err(e) => return intake_error_response(e),
    };
    entity._id = Some(id);

    info!(entity = %entity.name, "Entity created with capability link");
    json_response(
        StatusCode::CREATED,
        &EntityResponse::from_doc(entity, &state),
    )
}

async fn handle_get(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
    id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "view_entity") {
        return resp;
    }

    let id = match parse_object_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match find_entity(&mongo, id).await {
        Ok(entity) => json_response(StatusCode::OK, &EntityResponse::from_doc(entity, &state)),
        Err(resp) => resp,
    }
}

async fn handle_update(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
    id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "update_entity") {
        return resp;
    }

    let id = match parse_object_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let body: UpdateEntityRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return intake_error_response(e),
    };

    let mut entity = match find_entity(&mongo, id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return error_response(StatusCode::BAD_REQUEST, "Entity name is required", None);
        }
        if name != entity.name {
            // Rename keeps the slug in sync but never re-mints the link;
            // the old link simply stops resolving
            entity.rename(name);
        }
    }
    if body.category.is_some() {
        entity.category = body.category;
    }
    if body.sector.is_some() {
        entity.sector = body.sector;
    }
    if body.contact_name.is_some() {
        entity.contact_name = body.contact_name;
    }
    if body.contact_position.is_some() {
        entity.contact_position = body.contact_position;
    }
    if body.contact_phone.is_some() {
        entity.contact_phone = body.contact_phone;
    }
    if body.contact_email.is_some() {
        entity.contact_email = body.contact_email;
    }

    let collection = match mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    let update = doc! {
        "$set": {
            "name": &entity.name,
            "name_slug": &entity.name_slug,
            "category": entity.category.as_deref(),
            "sector": entity.sector.as_deref(),
            "contact_name": entity.contact_name.as_deref(),
            "contact_position": entity.contact_position.as_deref(),
            "contact_phone": entity.contact_phone.as_deref(),
            "contact_email": entity.contact_email.as_deref(),
            "metadata.updated_at": bson::DateTime::now(),
        }
    };

    if let Err(e) = collection.update_one(doc! { "_id": id }, update).await {
        return intake_error_response(e);
    }

    json_response(StatusCode::OK, &EntityResponse::from_doc(entity, &state))
}

async fn handle_delete(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
    id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "delete_entity") {
        return resp;
    }

    let id = match parse_object_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = match mongo.collection::<EntityDoc>(ENTITY_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    match collection.soft_delete(doc! { "_id": id }).await {
        Ok(result) if result.matched_count > 0 => json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "Entity deleted".into(),
            },
        ),
        Ok(_) => error_response(StatusCode::NOT_FOUND, "Entity not found", None),
        Err(e) => intake_error_response(e),
    }
}

async fn handle_regenerate(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
    id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "regenerate_link") {
        return resp;
    }

    let id = match parse_object_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut entity = match find_entity(&mongo, id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    state.links.regenerate(&mut entity);

    let store = crate::db::MongoStore::new(mongo);
    if let Err(e) = store.update_entity(&entity).await {
        return intake_error_response(e);
    }

    // The previous link is NOT revoked; it verifies until its TTL lapses
    info!(
        entity = %entity.name,
        slug = %slug::normalize(&entity.name),
        "Capability link regenerated (old link stays valid until its TTL)"
    );

    json_response(StatusCode::OK, &EntityResponse::from_doc(entity, &state))
}

async fn handle_submissions(
    req: Request<Incoming>,
    state: Arc<AppState>,
    mongo: MongoClient,
    id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard(&req, &state, "list_submissions") {
        return resp;
    }

    let id = match parse_object_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Entity must exist; submissions are a derived query, not a stored
    // collection on the entity
    if let Err(resp) = find_entity(&mongo, id).await {
        return resp;
    }

    let collection = match mongo
        .collection::<SubmissionDoc>(SUBMISSION_COLLECTION)
        .await
    {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    match collection.find_many(doc! { "entity_id": id }).await {
        Ok(submissions) => {
            let list: Vec<SubmissionSummary> =
                submissions.into_iter().map(SubmissionSummary::from).collect();
            json_response(StatusCode::OK, &list)
        }
        Err(e) => intake_error_response(e),
    }
}
