use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::leads::export::DEFAULT_DATE_FORMAT;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing `GEMINI_API_KEY` only disables generation.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub data_dir: PathBuf,
    pub export_date_format: String,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from("./data"),
            export_date_format: DEFAULT_DATE_FORMAT.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            export_date_format: optional_env("EXPORT_DATE_FORMAT")
                .unwrap_or(defaults.export_date_format),
            port: match optional_env("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

/// Reads `key`, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
