//! TTL result cache for fetched model lists.
//!
//! A single mutable slot keyed by repository identity. An entry counts as
//! present only while its identity matches the request and its age is within
//! the TTL; a stale or mismatched entry behaves as absent but is only
//! physically replaced by the next `put`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use mtrack_core::Model;

/// Cache entries older than this are treated as a miss.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// The persisted form of one cache slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub models: Vec<Model>,
    pub last_fetched: DateTime<Utc>,
    /// Repository identity (`owner/name`) this entry belongs to.
    pub repo_url: String,
}

/// Single-slot TTL cache in front of the remote config client.
#[derive(Debug)]
pub struct ResultCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// The cached model list for `identity`, if fresh.
    pub async fn get(&self, identity: &str) -> Option<Vec<Model>> {
        let guard = self.slot.read().await;
        let entry = guard.as_ref()?;
        if entry.repo_url != identity {
            debug!(
                cached = %entry.repo_url,
                requested = identity,
                "cache identity mismatch; treating as miss"
            );
            return None;
        }
        let age = Utc::now().signed_duration_since(entry.last_fetched);
        if age > chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX) {
            debug!(identity, age_secs = age.num_seconds(), "cache entry expired");
            return None;
        }
        Some(entry.models.clone())
    }

    /// Store a freshly fetched list, overwriting whatever was there.
    pub async fn put(&self, identity: &str, models: Vec<Model>) {
        let entry = CacheEntry {
            models,
            last_fetched: Utc::now(),
            repo_url: identity.to_owned(),
        };
        *self.slot.write().await = Some(entry);
    }

    /// Unconditionally clear the slot. Used on settings change, explicit
    /// refresh, and disconnect.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    /// The raw slot contents, fresh or not, for persistence.
    pub async fn snapshot(&self) -> Option<CacheEntry> {
        self.slot.read().await.clone()
    }
}
