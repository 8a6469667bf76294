//! HTTP API for uploading, indexing, and querying policy/regulatory PDFs.
//!
//! [`create_router`] assembles every route over a shared [`AppState`]
//! (provider, Redis-backed store, PDF loader, configuration). The binary in
//! `src/main.rs` wires this router to a `tokio` TCP listener.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod sse;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;

/// Creates the application router: every document/query route, plus
/// request tracing and a CORS layer configured from `state.config`.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = match &state.config.cors_origins {
        Some(origins) => {
            let parsed: Vec<_> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(parsed))
        }
        None => CorsLayer::permissive(),
    };

    routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
