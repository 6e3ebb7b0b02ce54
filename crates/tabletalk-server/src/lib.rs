//! HTTP route layer for the tabletalk gateway.
//!
//! Thin pass-through: multipart upload validation on the way in, error-kind
//! to status mapping on the way out. All the provider logic lives in
//! `tabletalk-gateway`; nothing here survives a request.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use tabletalk_gateway::Gateway;

mod routes;

pub use routes::*;

/// Upload ceiling enforced by the route layer, a gateway precondition.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// Build the service router: `POST /chat`, `GET /health`,
/// `GET /upload-info`, permissive CORS, body limit a little above the
/// upload ceiling so the handler gets to report oversized files itself.
pub fn router(gateway: Arc<Gateway>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/chat", post(routes::chat))
        .route("/health", get(routes::health))
        .route("/upload-info", get(routes::upload_info))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(cors)
        .with_state(AppState { gateway })
}
