pub mod health;
pub mod json;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::crm::handlers as crm;
use crate::script::handlers::handle_script;
use crate::search::handlers::handle_search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless generation pass-throughs
        .route("/api/search", post(handle_search))
        .route("/api/script", post(handle_script))
        // Finder
        .route("/api/finder/search", post(crm::handle_finder_search))
        .route("/api/finder/results", get(crm::handle_finder_results))
        // CRM
        .route(
            "/api/leads",
            get(crm::handle_list_leads).post(crm::handle_save_lead),
        )
        .route("/api/leads/save-all", post(crm::handle_save_all))
        .route("/api/leads/export", get(crm::handle_export))
        .route("/api/leads/:id", delete(crm::handle_delete_lead))
        .route("/api/leads/:id/status", patch(crm::handle_update_status))
        .route("/api/leads/:id/select", post(crm::handle_select_lead))
        .route("/api/leads/:id/script", post(crm::handle_lead_script))
        // View state
        .route(
            "/api/session",
            get(crm::handle_get_session).put(crm::handle_update_session),
        )
        .route("/api/session/filter", delete(crm::handle_reset_filter))
        .with_state(state)
}
