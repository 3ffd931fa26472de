//! Script Orchestrator — turns a lead snapshot and a niche into cold-call text.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::extract::extract_markdown;
use crate::leads::models::Lead;
use crate::llm_client::{ContentGenerator, GenerationRequest};
use crate::script::prompts::build_script_prompt;

const SCRIPT_FALLBACK_ERROR: &str = "Script API error";

/// The business fields a script is written from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadSnapshot {
    pub name: Option<String>,
    pub address: Option<String>,
    pub reviews: Option<String>,
    pub phone: Option<String>,
}

impl From<&Lead> for LeadSnapshot {
    fn from(lead: &Lead) -> Self {
        Self {
            name: Some(lead.business.name.clone()),
            address: Some(lead.business.address.clone()),
            reviews: Some(lead.business.review_count.clone()),
            phone: Some(lead.business.phone.clone()),
        }
    }
}

/// Wire request for `POST /api/script`.
#[derive(Debug, Default, Deserialize)]
pub struct ScriptRequest {
    pub business: Option<LeadSnapshot>,
    pub niche: Option<String>,
}

/// A validated script request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptQuery {
    pub business: LeadSnapshot,
    pub name: String,
    pub niche: String,
}

impl ScriptRequest {
    pub fn into_query(self) -> Result<ScriptQuery, AppError> {
        let name = self
            .business
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let niche = self
            .niche
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        match (name, niche) {
            (Some(name), Some(niche)) => Ok(ScriptQuery {
                business: self.business.unwrap_or_default(),
                name,
                niche,
            }),
            _ => Err(AppError::missing_fields(json!({
                "businessName": self.business.as_ref().and_then(|b| b.name.clone()),
                "niche": self.niche,
            }))),
        }
    }
}

/// Generates a script. An empty generation yields an empty string, not an error.
pub async fn generate_script(
    generator: &dyn ContentGenerator,
    query: &ScriptQuery,
) -> Result<String, AppError> {
    info!("Generating '{}' script for '{}'", query.niche, query.name);

    let b = &query.business;
    let prompt = build_script_prompt(
        &query.name,
        b.address.as_deref().unwrap_or_default(),
        b.reviews.as_deref().unwrap_or_default(),
        b.phone.as_deref().unwrap_or_default(),
        &query.niche,
    );

    let envelope = generator
        .generate(&GenerationRequest::text(prompt))
        .await
        .map_err(|e| AppError::upstream(e, SCRIPT_FALLBACK_ERROR))?;

    Ok(extract_markdown(&envelope))
}
