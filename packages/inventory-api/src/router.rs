//! Route table and middleware

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use inventory_storage::{QueryError, Result};

use crate::handlers::{health, list_assets};
use crate::state::AppState;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Read-only CORS policy.
///
/// With no origins configured any origin may read, without credentials.
/// Credentials are only allowed for an explicit origin list.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH]);

    if allowed_origins.is_empty() {
        return Ok(base.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| QueryError::config(format!("Invalid CORS origin: {origin:?}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(base
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}
