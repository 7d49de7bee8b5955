//! HTTP surface.
//!
//! - `POST /fetch-attendance` - fetch and parse one device's records
//! - `OPTIONS /fetch-attendance` - CORS preflight
//! - `GET /healthz` - liveness

pub mod handlers;

use std::sync::Arc;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::config::Config;
use crate::pipeline::attendance::FetchOptions;
use crate::transport::session::PortalClient;

pub use handlers::{apply_cors_headers, status_for, ALLOW_HEADERS, ALLOW_ORIGIN};

/// Shared by every handler. The portal client's connection pool is shared;
/// sessions are not.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Arc<PortalClient>,
    pub options: FetchOptions,
}

impl AppState {
    pub fn new(client: PortalClient, options: FetchOptions) -> Self {
        Self {
            client: Arc::new(client),
            options,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = PortalClient::new(config.upstream.clone())?;
        Ok(Self::new(client, FetchOptions::from(config)))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route(
            "/fetch-attendance",
            axum::routing::post(handlers::fetch_attendance_handler)
                .options(handlers::preflight_handler),
        )
        .layer(from_fn(handlers::cors_middleware))
        .with_state(state)
}
