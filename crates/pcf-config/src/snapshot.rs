//! Configuration snapshots for sharing a resolved configuration.
//!
//! A snapshot freezes the resolved record together with a hash of its
//! canonical JSON form. Cooperating workers that receive a snapshot can check
//! that their copy is identical to the one that was resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolved::ResolvedConfig;

/// A frozen snapshot of a resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where the snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Schema version of the resolved record.
    pub schema_version: String,

    /// SHA-256 hash of the canonical JSON of `config`.
    pub config_hash: String,

    /// The resolved configuration itself.
    pub config: ResolvedConfig,
}

impl ConfigSnapshot {
    /// Capture `config` as it is now.
    pub fn capture(config: &ResolvedConfig) -> Result<Self, serde_json::Error> {
        let hostname = hostname::get()
            .ok()
            .map(|h| h.to_string_lossy().to_string());

        Ok(ConfigSnapshot {
            timestamp: Utc::now(),
            hostname,
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            config_hash: config_hash(config)?,
            config: config.clone(),
        })
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether both snapshots hold the same configuration.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Whether the stored hash still describes the stored configuration.
    pub fn verify(&self) -> bool {
        config_hash(&self.config).is_ok_and(|hash| hash == self.config_hash)
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

/// SHA-256 of the canonical (compact) JSON serialization, hex encoded.
pub fn config_hash(config: &ResolvedConfig) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(config)?;
    Ok(hash_content(&canonical))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
