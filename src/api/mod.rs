//! API route definitions
//!
//! Account endpoints live at the root (`/register`, `/login`, `/update-profile`) because the
//! mobile client calls them there. Health endpoints sit alongside them.

pub mod accounts;
pub mod error;
pub mod health;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body; profile pictures arrive inline as base64.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router with middleware applied
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(accounts::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
