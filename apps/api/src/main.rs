mod config;
mod crm;
mod errors;
mod extract;
mod leads;
mod llm_client;
mod routes;
mod script;
mod search;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::leads::store::LeadStore;
use crate::llm_client::{ContentGenerator, GeminiClient};
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prospector API v{}", env!("CARGO_PKG_VERSION"));

    // Read the lead slot once; every later mutation writes it back.
    let store = LeadStore::in_dir(&config.data_dir);
    let leads = store.load().await?;

    let generator: Option<Arc<dyn ContentGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            );
            info!("Gemini client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            warn!("GEMINI_API_KEY is not set; search and script routes will fail");
            None
        }
    };

    let state = AppState::new(generator, Session::with_leads(leads), store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
