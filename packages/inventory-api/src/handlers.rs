//! Request handlers

use axum::{
    Json,
    extract::{Query, State},
};
use tokio_util::sync::CancellationToken;

use inventory_storage::{AssetContainer, QueryError};

use crate::error::ApiErrorResponse;
use crate::params::AssetQueryParams;
use crate::state::AppState;

/// `GET /assets`
///
/// Storage work is tied to a per-request token: it is cancelled when the
/// request timeout elapses or when the handler future is dropped because
/// the client went away.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetQueryParams>,
) -> Result<Json<AssetContainer>, ApiErrorResponse> {
    let query = params.into_query()?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let page = tokio::select! {
        result = state.service.query(&query, &cancel) => result?,
        () = tokio::time::sleep(state.request_timeout) => {
            cancel.cancel();
            return Err(QueryError::cancelled("asset query (timed out)").into());
        }
    };

    tracing::info!(
        assets = page.assets.len(),
        total_count = page.total_count,
        "Served asset query"
    );
    Ok(Json(page.into_container(&query)))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
