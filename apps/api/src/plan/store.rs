//! Latest-plan slot — one plan at a time, overwritten on every generation.
//!
//! Held in memory and, when a path is configured, mirrored to a JSON file so the slot
//! survives restarts. A missing file means an empty slot; a corrupt one is logged and
//! ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::plan::NormalizedPlan;

/// Name of the slot, kept for parity with clients that cache the plan themselves.
pub const SLOT_KEY: &str = "latestPlan";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<NormalizedPlan>,
    /// Completion text exactly as the model returned it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl StoredPlan {
    pub fn parsed(plan: NormalizedPlan, raw: String) -> Self {
        Self {
            plan: Some(plan),
            raw: Some(raw),
            error: None,
            generated_at: Utc::now(),
        }
    }

    pub fn unparsed(error: impl Into<String>, raw: String) -> Self {
        Self {
            plan: None,
            raw: Some(raw),
            error: Some(error.into()),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PlanStore {
    path: Option<PathBuf>,
    slot: RwLock<Option<StoredPlan>>,
}

impl PlanStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store, loading whatever plan the file already holds.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let existing = load(&path).await?;
        if existing.is_some() {
            info!("Loaded {SLOT_KEY} from {}", path.display());
        }
        Ok(Self {
            path: Some(path),
            slot: RwLock::new(existing),
        })
    }

    pub async fn latest(&self) -> Option<StoredPlan> {
        self.slot.read().await.clone()
    }

    /// Replaces the slot. The file is written before the in-memory copy changes, so a
    /// failed write leaves both untouched.
    pub async fn save(&self, stored: StoredPlan) -> Result<()> {
        let mut slot = self.slot.write().await;
        if let Some(path) = &self.path {
            let body = serde_json::to_vec_pretty(&stored).context("Failed to serialize plan")?;
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, body)
                .await
                .with_context(|| format!("Failed to write {}", tmp.display()))?;
            tokio::fs::rename(&tmp, path)
                .await
                .with_context(|| format!("Failed to replace {}", path.display()))?;
        }
        *slot = Some(stored);
        Ok(())
    }
}

async fn load(path: &Path) -> Result<Option<StoredPlan>> {
    let body = match tokio::fs::read(path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    match serde_json::from_slice(&body) {
        Ok(stored) => Ok(Some(stored)),
        Err(e) => {
            warn!("Ignoring unreadable plan file {}: {e}", path.display());
            Ok(None)
        }
    }
}
