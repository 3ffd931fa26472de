//! Lead Reconciler — merges candidate records into the persisted lead set.
//!
//! The only uniqueness guarantee in the system lives here: at most one lead
//! per business name (exact, case-sensitive). A colliding candidate is
//! dropped; the existing lead is never updated from it.
//!
//! Every operation mutates the collection in place and reports whether
//! anything changed, so callers know when to persist.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::leads::models::{BusinessRecord, Lead, LeadStatus};

pub fn contains_name(leads: &[Lead], name: &str) -> bool {
    leads.iter().any(|l| l.name() == name)
}

/// Saves one candidate as a new lead, prepended (most recent first).
///
/// Returns `false` without touching the collection when a lead with the same
/// name already exists.
pub fn save_one(leads: &mut Vec<Lead>, candidate: &BusinessRecord, category: &str) -> bool {
    if contains_name(leads, &candidate.name) {
        debug!("Skipping save of '{}': already a lead", candidate.name);
        return false;
    }

    let lead = Lead {
        business: candidate.clone(),
        id: Uuid::new_v4().to_string(),
        status: LeadStatus::New,
        saved_at: Utc::now().timestamp_millis(),
        category: category.to_string(),
        script: None,
        last_niche: None,
    };
    leads.insert(0, lead);
    true
}

/// Applies [`save_one`] to each candidate in order. Returns how many were saved.
///
/// Membership is re-checked against the growing collection, so only the first
/// of several same-named candidates is kept.
pub fn save_all(leads: &mut Vec<Lead>, candidates: &[BusinessRecord], category: &str) -> usize {
    candidates
        .iter()
        .filter(|candidate| save_one(leads, candidate, category))
        .count()
}

pub fn update_status(leads: &mut [Lead], id: &str, status: LeadStatus) -> bool {
    match leads.iter_mut().find(|l| l.id == id) {
        Some(lead) => {
            lead.status = status;
            true
        }
        None => false,
    }
}

/// Removes the lead with `id`. Clearing a selection that pointed at it is the
/// caller's job.
pub fn delete(leads: &mut Vec<Lead>, id: &str) -> bool {
    let before = leads.len();
    leads.retain(|l| l.id != id);
    leads.len() != before
}

/// Sets `script` and `last_niche` together on the lead with `id`.
pub fn attach_script(leads: &mut [Lead], id: &str, niche: &str, script: &str) -> bool {
    match leads.iter_mut().find(|l| l.id == id) {
        Some(lead) => {
            lead.script = Some(script.to_string());
            lead.last_niche = Some(niche.to_string());
            true
        }
        None => false,
    }
}

pub fn find<'a>(leads: &'a [Lead], id: &str) -> Option<&'a Lead> {
    leads.iter().find(|l| l.id == id)
}
