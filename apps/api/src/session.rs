//! Session — the presentation layer's state as one explicit struct.
//!
//! Every user action is a method here. The HTTP layer holds the session behind
//! a mutex, drops the lock around upstream calls, and persists `leads` after
//! any method that reports a change.
//!
//! Busy flags serialize one search and one script generation at a time. They
//! are cleared by the matching `finish_*` call, or by a [`BusyGuard`] when the
//! request is dropped before it gets there.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract::{extract_businesses, extract_markdown, extract_sources};
use crate::leads::filters::{unique_categories, LeadFilter};
use crate::leads::models::{
    BusinessRecord, GroundingSource, Lead, LeadStatus, MarketingNiche, SearchParams,
    DEFAULT_CATEGORY,
};
use crate::leads::reconciler;
use crate::script::orchestrator::{LeadSnapshot, ScriptQuery};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Finder,
    Leads,
}

/// The two operations that hold a busy flag while awaiting generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    Search,
    Script,
}

/// Lead collection and selection as they were before a mutation.
#[derive(Debug, Clone)]
pub struct LeadCheckpoint {
    leads: Vec<Lead>,
    selected_lead: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub tab: Tab,
    pub current_search: Option<SearchParams>,
    pub results: Vec<BusinessRecord>,
    pub sources: Vec<GroundingSource>,
    pub leads: Vec<Lead>,
    pub selected_lead: Option<String>,
    pub filter: LeadFilter,
    pub selected_niche: MarketingNiche,
    pub searching: bool,
    pub generating_script: bool,
    pub error: Option<String>,
}

impl Session {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads,
            ..Default::default()
        }
    }

    pub fn checkpoint(&self) -> LeadCheckpoint {
        LeadCheckpoint {
            leads: self.leads.clone(),
            selected_lead: self.selected_lead.clone(),
        }
    }

    pub fn rollback(&mut self, checkpoint: LeadCheckpoint) {
        self.leads = checkpoint.leads;
        self.selected_lead = checkpoint.selected_lead;
    }

    pub fn clear_busy(&mut self, busy: Busy) {
        match busy {
            Busy::Search => self.searching = false,
            Busy::Script => self.generating_script = false,
        }
    }

    // ── Finder ──────────────────────────────────────────────────────────────

    /// Marks a search in flight and clears the previous result set.
    ///
    /// Returns saved lead names oldest-first, for the prompt's exclusion hint.
    pub fn begin_search(&mut self, params: SearchParams) -> Result<Vec<String>, AppError> {
        if self.searching {
            return Err(AppError::Busy("A search is already in progress".to_string()));
        }
        self.searching = true;
        self.error = None;
        self.results.clear();
        self.sources.clear();
        self.current_search = Some(params);

        Ok(self.leads.iter().rev().map(|l| l.name().to_string()).collect())
    }

    /// Completes the in-flight search with the orchestrator's outcome.
    ///
    /// A successful envelope that yields zero records is an `EmptyResult`
    /// error. Returns the number of records shown.
    pub fn finish_search(&mut self, outcome: Result<Value, AppError>) -> Result<usize, AppError> {
        self.searching = false;

        let extracted = outcome.and_then(|envelope| {
            let markdown = extract_markdown(&envelope);
            let businesses = extract_businesses(&markdown);
            if businesses.is_empty() {
                warn!("Search returned no extractable rows ({} chars)", markdown.len());
                return Err(AppError::EmptyResult);
            }
            Ok((businesses, extract_sources(&envelope)))
        });

        match extracted {
            Ok((businesses, sources)) => {
                info!(
                    "Search produced {} records and {} sources",
                    businesses.len(),
                    sources.len()
                );
                self.results = businesses;
                self.sources = sources;
                Ok(self.results.len())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn is_saved(&self, name: &str) -> bool {
        reconciler::contains_name(&self.leads, name)
    }

    /// Saves one candidate. The category falls back to the current search's
    /// service, then to `"General"`.
    pub fn save_result(&mut self, candidate: &BusinessRecord, category: Option<&str>) -> bool {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| self.current_search.as_ref().map(|p| p.service.clone()))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        reconciler::save_one(&mut self.leads, candidate, &category)
    }

    /// Saves every current result under the current search's service.
    /// Without a current search this does nothing.
    pub fn save_all_results(&mut self) -> usize {
        let Some(category) = self.current_search.as_ref().map(|p| p.service.clone()) else {
            return 0;
        };
        reconciler::save_all(&mut self.leads, &self.results, &category)
    }

    // ── CRM ─────────────────────────────────────────────────────────────────

    pub fn find_lead(&self, id: &str) -> Option<&Lead> {
        reconciler::find(&self.leads, id)
    }

    pub fn set_status(&mut self, id: &str, status: LeadStatus) -> bool {
        reconciler::update_status(&mut self.leads, id, status)
    }

    /// Deletes a lead, clearing the selection if it pointed at it.
    pub fn delete_lead(&mut self, id: &str) -> bool {
        let removed = reconciler::delete(&mut self.leads, id);
        if removed && self.selected_lead.as_deref() == Some(id) {
            self.selected_lead = None;
        }
        removed
    }

    pub fn select_lead(&mut self, id: &str) -> bool {
        if self.find_lead(id).is_none() {
            return false;
        }
        self.selected_lead = Some(id.to_string());
        true
    }

    pub fn selected(&self) -> Option<&Lead> {
        self.selected_lead.as_deref().and_then(|id| self.find_lead(id))
    }

    pub fn visible_leads(&self) -> Vec<&Lead> {
        self.filter.apply(&self.leads)
    }

    pub fn categories(&self) -> Vec<String> {
        unique_categories(&self.leads)
    }

    /// Marks script generation in flight for lead `id`.
    ///
    /// A blank `niche` uses the session's selected niche; a niche matching one
    /// of the offered labels becomes the new selection.
    pub fn begin_script(&mut self, id: &str, niche: Option<&str>) -> Result<ScriptQuery, AppError> {
        if self.generating_script {
            return Err(AppError::Busy(
                "A script is already being generated".to_string(),
            ));
        }
        let lead = self
            .find_lead(id)
            .ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))?;

        let niche = match niche.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => self.selected_niche.label().to_string(),
        };
        let query = ScriptQuery {
            business: LeadSnapshot::from(lead),
            name: lead.name().to_string(),
            niche,
        };

        if let Some(known) = MarketingNiche::from_label(&query.niche) {
            self.selected_niche = known;
        }
        self.generating_script = true;
        Ok(query)
    }

    /// Completes script generation, attaching `script` and `last_niche`
    /// together. Returns `false` if the lead vanished in the meantime.
    pub fn finish_script(
        &mut self,
        id: &str,
        niche: &str,
        outcome: Result<String, AppError>,
    ) -> Result<bool, AppError> {
        self.generating_script = false;
        match outcome {
            Ok(script) => Ok(reconciler::attach_script(&mut self.leads, id, niche, &script)),
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

/// Clears a busy flag when the request that raised it is dropped before its
/// `finish_*` call, e.g. because the client disconnected mid-generation.
pub struct BusyGuard {
    session: Arc<Mutex<Session>>,
    busy: Busy,
    armed: bool,
}

impl BusyGuard {
    pub fn new(session: Arc<Mutex<Session>>, busy: Busy) -> Self {
        Self {
            session,
            busy,
            armed: true,
        }
    }

    /// Leaves the flag to the matching `finish_*` call.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let busy = self.busy;
        warn!("{busy:?} abandoned before completion; clearing busy flag");

        if let Ok(mut session) = self.session.try_lock() {
            session.clear_busy(busy);
            return;
        }
        // Lock is contended: finish the reset on the runtime.
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    session.lock().await.clear_busy(busy);
                });
            }
            Err(_) => warn!("No runtime to clear the {busy:?} flag"),
        }
    }
}
