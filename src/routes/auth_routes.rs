//! HTTP routes for administrator authentication
//!
//! - POST /auth/login  - Authenticate and get a session token
//! - GET  /auth/me     - Get current administrator info from token
//! - POST /auth/logout - Acknowledge logout (sessions are stateless;
//!   clients discard the token)

use bson::doc;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{verify_password, PermissionLevel, SessionInput};
use crate::db::schemas::{AdminUserDoc, ADMIN_USER_COLLECTION};
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, parse_json_body, session_claims, BoxBody,
    ErrorResponse, SuccessResponse,
};
use crate::server::AppState;
use crate::token::unix_now;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub identifier: String,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub identifier: String,
    pub permission_level: String,
}

/// Route /auth/* requests
pub async fn handle_auth_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let path = req.uri().path();
    let method = req.method();

    if method == Method::OPTIONS {
        return cors_preflight();
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path).to_string();

    match (method, path.as_str()) {
        (&Method::POST, "/auth/login") => handle_login(req, state).await,
        (&Method::GET, "/auth/me") => handle_me(req, state).await,
        (&Method::POST, "/auth/logout") => json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "Logged out; discard the session token".into(),
            },
        ),

        (_, "/auth/login") | (_, "/auth/me") | (_, "/auth/logout") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        ),

        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "Auth endpoint not found".into(),
                code: None,
            },
        ),
    }
}

async fn handle_login(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let body: LoginRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string(), None),
    };

    if body.identifier.is_empty() || body.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: identifier, password",
            None,
        );
    }

    // In dev mode without MongoDB, accept any credentials
    if state.args.dev_mode && state.mongo.is_none() {
        info!("Dev mode login (no MongoDB): {}", body.identifier);
        return issue_session(&state, &body.identifier);
    }

    let mongo = match &state.mongo {
        Some(m) => m,
        None => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not available",
                Some("DB_UNAVAILABLE"),
            )
        }
    };

    let collection = match mongo.collection::<AdminUserDoc>(ADMIN_USER_COLLECTION).await {
        Ok(c) => c,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                Some("DB_ERROR"),
            )
        }
    };

    let user = match collection
        .find_one(doc! { "identifier": &body.identifier })
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("Login failed: unknown identifier {}", body.identifier);
            return invalid_credentials();
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                Some("DB_ERROR"),
            )
        }
    };

    if !user.is_active {
        warn!("Login refused: inactive account {}", body.identifier);
        return invalid_credentials();
    }

    match verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Login failed: bad password for {}", body.identifier);
            return invalid_credentials();
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some("HASH_ERROR"),
            )
        }
    }

    info!("Administrator logged in: {}", body.identifier);
    issue_session(&state, &body.identifier)
}

fn issue_session(state: &AppState, identifier: &str) -> Response<BoxBody> {
    let token = match state.sessions.generate_token(SessionInput {
        identifier: identifier.to_string(),
        permission_level: PermissionLevel::Admin,
    }) {
        Ok(t) => t,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some("TOKEN_ERROR"),
            )
        }
    };

    json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            identifier: identifier.to_string(),
            expires_at: unix_now() + state.sessions.expiry_seconds(),
        },
    )
}

fn invalid_credentials() -> Response<BoxBody> {
    // One message for unknown identifier, inactive account, and bad
    // password; login must not reveal which one it was
    error_response(
        StatusCode::UNAUTHORIZED,
        "Invalid identifier or password",
        Some("INVALID_CREDENTIALS"),
    )
}

async fn handle_me(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    match session_claims(&req, &state) {
        Some(claims) => json_response(
            StatusCode::OK,
            &MeResponse {
                identifier: claims.identifier,
                permission_level: claims.permission_level.to_string(),
            },
        ),
        None => error_response(
            StatusCode::UNAUTHORIZED,
            "Missing or invalid session token",
            Some("NO_TOKEN"),
        ),
    }
}
