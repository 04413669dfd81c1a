//! Shared response and auth plumbing for route handlers

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{extract_token_from_header, Claims};
use crate::server::AppState;
use crate::types::IntakeError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Standard error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Standard success body
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub fn error_response(status: StatusCode, message: &str, code: Option<&str>) -> Response<BoxBody> {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
            code: code.map(|c| c.to_string()),
        },
    )
}

/// Map an `IntakeError` to its HTTP response
pub fn intake_error_response(err: IntakeError) -> Response<BoxBody> {
    let status = err.status_code();
    error_response(status, &err.to_string(), None)
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

/// Read and parse a JSON request body
pub async fn parse_json_body<T: DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, IntakeError> {
    let body = req
        .collect()
        .await
        .map_err(|e| IntakeError::BadRequest(format!("Failed to read request body: {}", e)))?
        .to_bytes();

    serde_json::from_slice(&body)
        .map_err(|e| IntakeError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Authorization header value, if any
pub fn get_auth_header(req: &Request<Incoming>) -> Option<&str> {
    req.headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
}

/// Verify the caller's session token, if one was presented
pub fn session_claims(req: &Request<Incoming>, state: &AppState) -> Option<Claims> {
    let token = extract_token_from_header(get_auth_header(req))?;
    state.sessions.verify_token(token).ok()
}

/// Session-and-capability guard for admin handlers
///
/// Verifies the bearer session and checks the named operation against the
/// caller's permission level; handlers get the claims back on success.
pub fn guard(
    req: &Request<Incoming>,
    state: &AppState,
    operation: &str,
) -> Result<Claims, Response<BoxBody>> {
    let token = match extract_token_from_header(get_auth_header(req)) {
        Some(t) => t,
        None => {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "No token provided",
                Some("NO_TOKEN"),
            ))
        }
    };

    let claims = match state.sessions.verify_token(token) {
        Ok(c) => c,
        Err(e) => {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                &e.to_string(),
                Some("INVALID_TOKEN"),
            ))
        }
    };

    if let Err(e) = crate::auth::require(Some(&claims), operation) {
        return Err(intake_error_response(e));
    }

    Ok(claims)
}
