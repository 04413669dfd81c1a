//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling; one spawned task per
//! connection, shared state behind an Arc.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::MongoClient;
use crate::links::LinkManager;
use crate::routes;
use crate::routes::helpers::{cors_preflight, error_response, BoxBody};
use crate::token::{LinkCodec, ENTITY_LINK_TAG};
use crate::types::IntakeError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub mongo: Option<MongoClient>,
    /// Capability link minting and verification
    pub links: LinkManager,
    /// Admin session tokens
    pub sessions: JwtValidator,
}

impl AppState {
    /// Build state from validated configuration
    ///
    /// Secrets are consumed here exactly once; the codec and validator keep
    /// their own copies and nothing else reads them again.
    pub fn new(args: Args, mongo: Option<MongoClient>) -> Result<Self, IntakeError> {
        let codec = match &args.link_secret {
            Some(secret) => LinkCodec::new(
                secret.as_bytes().to_vec(),
                ENTITY_LINK_TAG,
                args.link_ttl_seconds,
            )?,
            // Args::validate() only lets this through in dev mode
            None => LinkCodec::new_dev(),
        };

        let sessions = match &args.session_secret {
            Some(secret) => JwtValidator::new(secret.clone(), args.session_expiry_seconds)?,
            None => JwtValidator::new_dev(),
        };

        Ok(Self {
            args,
            mongo,
            links: LinkManager::new(codec),
            sessions,
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), IntakeError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Intake listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled - insecure secrets, MongoDB optional");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Auth routes consume the request
    if path.starts_with("/auth") {
        return Ok(routes::handle_auth_request(req, Arc::clone(&state)).await);
    }

    let response = match (method, path.as_str()) {
        // Liveness probe - returns 200 if intake is running
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        // Readiness probe - returns 200 only if storage is reachable
        (Method::GET, "/ready") | (Method::GET, "/readyz") => {
            routes::readiness_check(Arc::clone(&state))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // CORS preflight
        (Method::OPTIONS, _) => cors_preflight(),

        // Admin entity curation
        (_, p) if p.starts_with("/admin/entities") => {
            routes::handle_admin_entities_request(req, Arc::clone(&state), p).await
        }

        // Public capability-link submission endpoints
        (_, p) if p.starts_with("/submit/") => {
            routes::handle_submit_request(req, Arc::clone(&state), p).await
        }

        // Not found
        _ => error_response(StatusCode::NOT_FOUND, "Not found", None),
    };

    Ok(response)
}
