//! Axum route handlers for the Search API.

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::search::orchestrator::{run_search, SearchQuery, SearchRequest};
use crate::routes::json::AppJson;
use crate::state::AppState;

/// POST /api/search
///
/// Pass-through: returns the generation service's raw envelope. Extraction
/// happens in the caller (or in the finder routes).
pub async fn handle_search(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchRequest>,
) -> Result<Json<Value>, AppError> {
    let generator = state.generator()?;
    debug!("[/api/search] body: {request:?}");

    let query: SearchQuery = request.into_query()?;
    let envelope = run_search(generator, &query).await?;

    Ok(Json(envelope))
}
