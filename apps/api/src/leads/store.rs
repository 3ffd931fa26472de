//! Durable lead slot: one JSON file holding the whole lead collection.
//!
//! Read once at startup, rewritten after every mutation. A missing file is an
//! empty collection.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::leads::models::Lead;

/// Name of the single slot the collection lives in.
pub const SLOT_NAME: &str = "local_biz_leads";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lead slot {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize leads: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct LeadStore {
    path: PathBuf,
}

impl LeadStore {
    /// A store whose slot lives at `<data_dir>/local_biz_leads.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{SLOT_NAME}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Lead>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No lead slot at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let leads: Vec<Lead> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        info!("Loaded {} leads from {}", leads.len(), self.path.display());
        Ok(leads)
    }

    /// Replaces the slot contents. Writes a sibling temp file then renames it
    /// over the slot so a crash never leaves a half-written collection.
    pub async fn save(&self, leads: &[Lead]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(leads)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        debug!("Persisted {} leads to {}", leads.len(), self.path.display());
        Ok(())
    }
}
