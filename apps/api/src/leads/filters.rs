use serde::{Deserialize, Serialize};

use crate::leads::models::{Lead, LeadStatus};

/// Sentinel filter value that matches every lead.
pub const ALL: &str = "All";

/// Engagement filter offered by the CRM view.
///
/// The two grouped variants collapse several statuses: "Not Contacted"
/// covers `New` and `CalledNoAnswer`, "Contacted" covers `Contacted` and
/// `MeetingBooked`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    NotContacted,
    Contacted,
    Exactly(LeadStatus),
}

impl StatusFilter {
    /// Parses the labels used by the CRM filter bar. Unknown labels match nothing.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            ALL => Some(StatusFilter::All),
            "Not Contacted" => Some(StatusFilter::NotContacted),
            "Contacted" => Some(StatusFilter::Contacted),
            other => LeadStatus::from_label(other).map(StatusFilter::Exactly),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => ALL,
            StatusFilter::NotContacted => "Not Contacted",
            StatusFilter::Contacted => "Contacted",
            StatusFilter::Exactly(status) => status.label(),
        }
    }

    pub fn matches(&self, status: LeadStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::NotContacted => {
                matches!(status, LeadStatus::New | LeadStatus::CalledNoAnswer)
            }
            StatusFilter::Contacted => {
                matches!(status, LeadStatus::Contacted | LeadStatus::MeetingBooked)
            }
            StatusFilter::Exactly(s) => *s == status,
        }
    }
}

/// Category + engagement filter pair applied to the lead list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub category: String,
    pub status: StatusFilter,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            status: StatusFilter::All,
        }
    }
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        (self.category == ALL || lead.category == self.category) && self.status.matches(lead.status)
    }

    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|l| self.matches(l)).collect()
    }
}

/// `"All"` followed by each distinct category in first-seen order.
pub fn unique_categories(leads: &[Lead]) -> Vec<String> {
    let mut categories = vec![ALL.to_string()];
    for lead in leads {
        if !categories[1..].contains(&lead.category) {
            categories.push(lead.category.clone());
        }
    }
    categories
}
