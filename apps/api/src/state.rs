use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::errors::AppError;
use crate::leads::store::LeadStore;
use crate::llm_client::ContentGenerator;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; generation routes then fail.
    pub generator: Option<Arc<dyn ContentGenerator>>,
    /// Never held across a generation call.
    pub session: Arc<Mutex<Session>>,
    pub store: LeadStore,
    pub config: Config,
}

impl AppState {
    pub fn new(
        generator: Option<Arc<dyn ContentGenerator>>,
        session: Session,
        store: LeadStore,
        config: Config,
    ) -> Self {
        Self {
            generator,
            session: Arc::new(Mutex::new(session)),
            store,
            config,
        }
    }

    pub fn generator(&self) -> Result<&dyn ContentGenerator, AppError> {
        self.generator.as_deref().ok_or(AppError::Configuration)
    }
}
