/// LLM Client — the single point of entry for all Gemini calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation service directly.
/// Orchestrators talk to a `ContentGenerator`; `GeminiClient` is the production one.
///
/// Calls are single-shot: no retries and no client-level timeout. A failure is
/// terminal for the request that caused it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LlmError {
    /// The message worth showing to a caller: the upstream's own text when it
    /// gave one.
    pub fn upstream_message(&self) -> String {
        match self {
            LlmError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A latitude/longitude pair used to bias Maps grounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// One generation call: a user prompt plus optional Maps grounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub maps_grounding: bool,
    pub location: Option<LatLng>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// The generation backend seam. Returns the raw response envelope untouched;
/// interpreting it is the extractors' job.
///
/// Carried in `AppState` as `Option<Arc<dyn ContentGenerator>>`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// generateContent wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

#[derive(Debug, Serialize)]
struct GoogleMaps {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

impl<'a> GenerateContentBody<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            tools: request.maps_grounding.then(|| {
                vec![Tool {
                    google_maps: GoogleMaps {},
                }]
            }),
            tool_config: request.location.map(|lat_lng| ToolConfig {
                retrieval_config: RetrievalConfig { lat_lng },
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, LlmError> {
        let body = GenerateContentBody::from_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Value = response.json().await?;
        debug!(
            "Gemini call succeeded: model={}, grounded={}",
            self.model, request.maps_grounding
        );
        Ok(envelope)
    }
}
