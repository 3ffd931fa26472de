//! Axum route handlers for the Script API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::script::orchestrator::{generate_script, ScriptRequest};
use crate::routes::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScriptResponse {
    pub text: String,
}

/// POST /api/script
pub async fn handle_script(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScriptRequest>,
) -> Result<Json<ScriptResponse>, AppError> {
    let generator = state.generator()?;
    debug!("[/api/script] body: {request:?}");

    let query = request.into_query()?;
    let text = generate_script(generator, &query).await?;

    Ok(Json(ScriptResponse { text }))
}
