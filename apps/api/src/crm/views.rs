//! Response and request bodies for the finder and CRM routes.

use serde::{Deserialize, Serialize};

use crate::leads::models::{BusinessRecord, GroundingSource, Lead, MarketingNiche, SearchParams};
use crate::session::{Session, Tab};

/// A search result annotated with whether it is already a lead.
#[derive(Debug, Serialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub business: BusinessRecord,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct FinderResponse {
    pub businesses: Vec<ResultView>,
    pub sources: Vec<GroundingSource>,
    pub params: Option<SearchParams>,
}

impl FinderResponse {
    pub fn from_session(session: &Session) -> Self {
        Self {
            businesses: session
                .results
                .iter()
                .map(|business| ResultView {
                    business: business.clone(),
                    saved: session.is_saved(&business.name),
                })
                .collect(),
            sources: session.sources.clone(),
            params: session.current_search.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveLeadRequest {
    pub business: BusinessRecord,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: usize,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub categories: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: crate::leads::models::LeadStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadScriptRequest {
    pub niche: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub tab: Tab,
    pub category: String,
    pub status: String,
    pub selected_niche: MarketingNiche,
    pub selected_lead: Option<Lead>,
    pub current_search: Option<SearchParams>,
    pub result_count: usize,
    pub lead_count: usize,
    pub searching: bool,
    pub generating_script: bool,
    pub error: Option<String>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            tab: session.tab,
            category: session.filter.category.clone(),
            status: session.filter.status.label().to_string(),
            selected_niche: session.selected_niche,
            selected_lead: session.selected().cloned(),
            current_search: session.current_search.clone(),
            result_count: session.results.len(),
            lead_count: session.leads.len(),
            searching: session.searching,
            generating_script: session.generating_script,
            error: session.error.clone(),
        }
    }
}

/// Partial update of the view state. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct SessionUpdate {
    pub tab: Option<Tab>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub niche: Option<MarketingNiche>,
}
