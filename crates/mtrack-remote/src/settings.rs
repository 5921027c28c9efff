//! Persisted repository connection settings.
//!
//! Settings live in a single JSON file whose shape matches the browser
//! client's persistence record (`repoOwner`, `repoName`, `branch`,
//! `configPath`, `token`). The store owns the file; the remote client only
//! ever reads the loaded value.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_CONFIG_PATH: &str = "models.yaml";

/// Coordinates of the remote repository holding the model config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    pub repo_owner: String,
    pub repo_name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_config_path")]
    pub config_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_owned()
}

fn default_config_path() -> String {
    DEFAULT_CONFIG_PATH.to_owned()
}

impl ConnectionSettings {
    pub fn new(repo_owner: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            branch: default_branch(),
            config_path: default_config_path(),
            token: None,
        }
    }

    /// The `owner/name` identity the result cache is keyed by.
    pub fn repo_identity(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// The token, if one is set and non-empty.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Errors from reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed store for [`ConnectionSettings`].
///
/// Constructed with an explicit path and injected where needed; there is no
/// ambient global.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().components().collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored settings; `None` when no file exists yet.
    pub fn load(&self) -> Result<Option<ConnectionSettings>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the settings, creating parent directories as needed.
    pub fn save(&self, settings: &ConnectionSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), "connection settings saved");
        Ok(())
    }

    /// Delete the settings file (disconnect). Missing file is not an error.
    pub fn clear(&self) -> Result<(), SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let s: ConnectionSettings =
            serde_json::from_str(r#"{"repoOwner": "acme", "repoName": "models"}"#).unwrap();
        assert_eq!(s.branch, "main");
        assert_eq!(s.config_path, "models.yaml");
        assert_eq!(s.token, None);
        assert_eq!(s.repo_identity(), "acme/models");
    }

    #[test]
    fn persistence_record_uses_camel_case_keys() {
        let mut s = ConnectionSettings::new("acme", "models");
        s.token = Some("secret".to_owned());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["repoOwner"], "acme");
        assert_eq!(v["configPath"], "models.yaml");
        assert_eq!(v["token"], "secret");
    }

    #[test]
    fn empty_token_is_not_a_bearer_token() {
        let mut s = ConnectionSettings::new("acme", "models");
        assert_eq!(s.bearer_token(), None);
        s.token = Some(String::new());
        assert_eq!(s.bearer_token(), None);
        s.token = Some("tok".to_owned());
        assert_eq!(s.bearer_token(), Some("tok"));
    }

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        assert!(store.load().unwrap().is_none());

        let settings = ConnectionSettings::new("acme", "models");
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), Some(settings));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
