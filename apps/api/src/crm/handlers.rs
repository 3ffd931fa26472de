use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::crm::views::{
    FinderResponse, LeadListQuery, LeadListResponse, LeadScriptRequest, SaveLeadRequest,
    SaveResponse, SessionUpdate, SessionView, StatusUpdate,
};
use crate::errors::AppError;
use crate::leads::export::{export_file_name, leads_to_csv};
use crate::leads::filters::{LeadFilter, StatusFilter, ALL};
use crate::leads::models::Lead;
use crate::script::orchestrator::generate_script;
use crate::search::orchestrator::{run_search, SearchQuery, SearchRequest};
use crate::session::{Busy, BusyGuard, LeadCheckpoint, Session};
use crate::routes::json::AppJson;
use crate::state::AppState;

fn lead_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Lead {id} not found"))
}

fn unknown_status_filter(label: &str) -> AppError {
    AppError::Validation {
        message: format!("Unknown status filter '{label}'"),
        details: Some(json!({ "status": label })),
    }
}

fn parse_status_filter(label: &str) -> Result<StatusFilter, AppError> {
    StatusFilter::from_label(label).ok_or_else(|| unknown_status_filter(label))
}

/// Writes the lead slot. On failure the session is rolled back to `before`,
/// so memory never holds a change the slot lacks.
async fn persist(
    state: &AppState,
    session: &mut Session,
    before: LeadCheckpoint,
) -> Result<(), AppError> {
    if let Err(e) = state.store.save(&session.leads).await {
        warn!(
            "Rolling back lead change after failed write to {}",
            state.store.path().display()
        );
        session.rollback(before);
        return Err(e.into());
    }
    Ok(())
}

/// POST /api/finder/search
///
/// Runs the session search: saved lead names go into the exclusion hint and
/// the extracted rows replace the previous results.
pub async fn handle_finder_search(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchRequest>,
) -> Result<Json<FinderResponse>, AppError> {
    let generator = state.generator()?;
    debug!("[/api/finder/search] body: {request:?}");

    let query = request.into_query()?;
    let excluded_names = state
        .session
        .lock()
        .await
        .begin_search(query.params.clone())?;
    let guard = BusyGuard::new(state.session.clone(), Busy::Search);
    let query = SearchQuery {
        excluded_names,
        ..query
    };

    let outcome = run_search(generator, &query).await;

    let mut session = state.session.lock().await;
    guard.disarm();
    session.finish_search(outcome)?;
    Ok(Json(FinderResponse::from_session(&session)))
}

/// GET /api/finder/results
pub async fn handle_finder_results(State(state): State<AppState>) -> Json<FinderResponse> {
    let session = state.session.lock().await;
    Json(FinderResponse::from_session(&session))
}

/// POST /api/leads
pub async fn handle_save_lead(
    State(state): State<AppState>,
    AppJson(request): AppJson<SaveLeadRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let mut session = state.session.lock().await;
    let before = session.checkpoint();
    let saved = session.save_result(&request.business, request.category.as_deref());
    if saved {
        info!("Saved lead '{}'", request.business.name);
        persist(&state, &mut session, before).await?;
    }
    Ok(Json(SaveResponse {
        saved: usize::from(saved),
        leads: session.leads.clone(),
    }))
}

/// POST /api/leads/save-all
pub async fn handle_save_all(
    State(state): State<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    let mut session = state.session.lock().await;
    let before = session.checkpoint();
    let saved = session.save_all_results();
    if saved > 0 {
        info!("Saved {saved} leads from the current search");
        persist(&state, &mut session, before).await?;
    }
    Ok(Json(SaveResponse {
        saved,
        leads: session.leads.clone(),
    }))
}

/// GET /api/leads?category=&status=
///
/// Query parameters override the session's filter for this response only.
pub async fn handle_list_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<LeadListResponse>, AppError> {
    let session = state.session.lock().await;

    let mut filter = session.filter.clone();
    if let Some(category) = params.category {
        filter.category = category;
    }
    if let Some(status) = params.status.as_deref() {
        filter.status = parse_status_filter(status)?;
    }

    Ok(Json(LeadListResponse {
        leads: filter.apply(&session.leads).into_iter().cloned().collect(),
        categories: session.categories(),
        total: session.leads.len(),
    }))
}

/// PATCH /api/leads/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<StatusUpdate>,
) -> Result<Json<Lead>, AppError> {
    let mut session = state.session.lock().await;
    let before = session.checkpoint();
    if !session.set_status(&id, update.status) {
        return Err(lead_not_found(&id));
    }
    persist(&state, &mut session, before).await?;

    let lead = session.find_lead(&id).cloned().ok_or_else(|| lead_not_found(&id))?;
    Ok(Json(lead))
}

/// DELETE /api/leads/:id
pub async fn handle_delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut session = state.session.lock().await;
    let before = session.checkpoint();
    if !session.delete_lead(&id) {
        return Err(lead_not_found(&id));
    }
    persist(&state, &mut session, before).await?;
    info!("Deleted lead {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/leads/:id/select
pub async fn handle_select_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, AppError> {
    let mut session = state.session.lock().await;
    if !session.select_lead(&id) {
        return Err(lead_not_found(&id));
    }
    let lead = session.selected().cloned().ok_or_else(|| lead_not_found(&id))?;
    Ok(Json(lead))
}

/// POST /api/leads/:id/script
pub async fn handle_lead_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<LeadScriptRequest>, JsonRejection>,
) -> Result<Json<Lead>, AppError> {
    let generator = state.generator()?;
    // The body is optional; a present one must still be valid JSON.
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => LeadScriptRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let query = state
        .session
        .lock()
        .await
        .begin_script(&id, request.niche.as_deref())?;
    let guard = BusyGuard::new(state.session.clone(), Busy::Script);

    let outcome = generate_script(generator, &query).await;

    let mut session = state.session.lock().await;
    guard.disarm();
    let before = session.checkpoint();
    if !session.finish_script(&id, &query.niche, outcome)? {
        return Err(lead_not_found(&id));
    }
    persist(&state, &mut session, before).await?;

    let lead = session.find_lead(&id).cloned().ok_or_else(|| lead_not_found(&id))?;
    Ok(Json(lead))
}

/// GET /api/leads/export
pub async fn handle_export(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    if session.leads.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let csv = leads_to_csv(&session.leads, &state.config.export_date_format);
    let file_name = export_file_name(Local::now().date_naive());
    info!("Exporting {} leads as {file_name}", session.leads.len());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// GET /api/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from(&*session))
}

/// PUT /api/session
pub async fn handle_update_session(
    State(state): State<AppState>,
    AppJson(update): AppJson<SessionUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;

    // Validate before touching anything so a bad label leaves the session as it was.
    let status = update.status.as_deref().map(parse_status_filter).transpose()?;

    if let Some(tab) = update.tab {
        session.tab = tab;
    }
    if let Some(category) = update.category {
        let category = category.trim();
        session.filter.category = if category.is_empty() {
            ALL.to_string()
        } else {
            category.to_string()
        };
    }
    if let Some(status) = status {
        session.filter.status = status;
    }
    if let Some(niche) = update.niche {
        session.selected_niche = niche;
    }

    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/session/filter
pub async fn handle_reset_filter(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.filter = LeadFilter::default();
    Json(SessionView::from(&*session))
}
