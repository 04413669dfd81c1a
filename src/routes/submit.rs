//! Public submission endpoints, authorized by capability link
//!
//! - GET  /submit/{token} - entity info and prior submissions for the form
//! - POST /submit/{token} - validate and store a submission
//!
//! Every token or resolution failure collapses into one undifferentiated
//! 404 response. Distinguishing "bad signature" from "good signature, no
//! such entity" would hand link-guessers an oracle, so the precise failure
//! is only logged at debug level. Validation failures, by contrast, are
//! surfaced field-by-field so the submitter can correct them.

use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use bson::doc;
use tracing::{debug, info};

use crate::db::schemas::{EntityDoc, SubmissionDoc, SUBMISSION_COLLECTION};
use crate::db::{MongoStore, Store};
use crate::links::EntityResolver;
use crate::routes::admin_entities::SubmissionSummary;
use crate::routes::helpers::{
    cors_preflight, error_response, intake_error_response, json_response, parse_json_body,
    BoxBody,
};
use crate::server::AppState;
use crate::submission::{validate, SubmissionForm};
use crate::token::unix_now;
use crate::types::IntakeError;

/// Entity details shown on the submission form
#[derive(Debug, Serialize)]
pub struct FormContext {
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub submissions: Vec<SubmissionSummary>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: &'static str,
    pub field: String,
    pub message: String,
}

/// Route /submit/{token} requests
pub async fn handle_submit_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    path: &str,
) -> Response<BoxBody> {
    let method = req.method().clone();
    if method == Method::OPTIONS {
        return cors_preflight();
    }

    let token = match path.strip_prefix("/submit/") {
        Some(t) if !t.is_empty() && !t.contains('/') => t.to_string(),
        _ => return error_response(StatusCode::NOT_FOUND, "Not found", None),
    };

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
    let store = Arc::new(MongoStore::new(mongo.clone()));

    // Verify the token, then resolve its payload to the one entity it
    // authorizes. All failures collapse below.
    let entity = match authorize(&state, store.clone(), &token).await {
        Ok(e) => e,
        Err(err) => return collapsed_link_error(err),
    };

    match method {
        Method::GET => handle_form_context(mongo, entity).await,
        Method::POST => handle_submission(req, store, entity).await,
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None),
    }
}

/// Verify + resolve; the caller collapses any error
async fn authorize(
    state: &AppState,
    store: Arc<MongoStore>,
    token: &str,
) -> Result<EntityDoc, IntakeError> {
    let payload = state.links.codec().verify(token, unix_now())?;

    let resolver = EntityResolver::new(store);
    resolver.resolve(&payload).await
}

/// One message for every way a link can fail; the distinction is log-only
fn collapsed_link_error(err: IntakeError) -> Response<BoxBody> {
    match &err {
        IntakeError::InvalidLink => debug!("Submission link rejected: invalid token"),
        IntakeError::ExpiredLink => debug!("Submission link rejected: expired token"),
        IntakeError::EntityNotFound => {
            debug!("Submission link rejected: no unique entity for payload")
        }
        other => debug!("Submission link rejected: {}", other),
    }

    match err {
        IntakeError::InvalidLink | IntakeError::ExpiredLink | IntakeError::EntityNotFound => {
            error_response(
                StatusCode::NOT_FOUND,
                "Invalid or expired link",
                Some("LINK_REJECTED"),
            )
        }
        other => intake_error_response(other),
    }
}

async fn handle_form_context(
    mongo: crate::db::MongoClient,
    entity: EntityDoc,
) -> Response<BoxBody> {
    let entity_id = match entity._id {
        Some(id) => id,
        None => return intake_error_response(IntakeError::Internal("Entity has no ID".into())),
    };

    let collection = match mongo
        .collection::<SubmissionDoc>(SUBMISSION_COLLECTION)
        .await
    {
        Ok(c) => c,
        Err(e) => return intake_error_response(e),
    };

    let submissions = match collection.find_many(doc! { "entity_id": entity_id }).await {
        Ok(s) => s,
        Err(e) => return intake_error_response(e),
    };

    json_response(
        StatusCode::OK,
        &FormContext {
            entity_name: entity.name,
            category: entity.category,
            sector: entity.sector,
            submissions: submissions.into_iter().map(SubmissionSummary::from).collect(),
        },
    )
}

async fn handle_submission(
    req: Request<Incoming>,
    store: Arc<MongoStore>,
    entity: EntityDoc,
) -> Response<BoxBody> {
    let entity_id = match entity._id {
        Some(id) => id,
        None => return intake_error_response(IntakeError::Internal("Entity has no ID".into())),
    };

    let form: SubmissionForm = match parse_json_body(req).await {
        Ok(f) => f,
        Err(e) => return intake_error_response(e),
    };

    // Cross-field rules; the first violation is reported and nothing is
    // stored
    if let Err(violation) = validate(&form) {
        return json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ValidationErrorResponse {
                error: "validation_failed",
                field: violation.field.to_string(),
                message: violation.message.to_string(),
            },
        );
    }

    let submission = SubmissionDoc::from_form(entity_id, form);
    let id = match store.insert_submission(submission).await {
        Ok(id) => id,
        Err(e) => return intake_error_response(e),
    };

    info!(entity = %entity.name, submission = %id.to_hex(), "Submission stored");

    json_response(
        StatusCode::CREATED,
        &SubmitResponse {
            success: true,
            submission_id: id.to_hex(),
            message: "Submission recorded".into(),
        },
    )
}
