//! Request/response payloads for the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mtrack_core::{ModelFiles, ModelMetrics, ModelStatus};
use mtrack_remote::ConnectionSettings;

use crate::store::ModelDraft;

/// Query parameters accepted by the local model list.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListModelsQuery {
    /// Exact status to filter on (`development|staging|production|archived`).
    pub status: Option<String>,
    /// Case-insensitive substring over name, framework, and owner.
    pub q: Option<String>,
}

/// Body for `POST /v1/models` and `PUT /v1/models/{id}`.
///
/// Every field is optional; creation fills canonical defaults and update
/// touches only the fields that are present.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub framework: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<ModelStatus>,
    pub owner: Option<String>,
    #[schema(value_type = Object)]
    pub metrics: Option<ModelMetrics>,
    #[schema(value_type = Object)]
    pub files: Option<ModelFiles>,
}

impl From<ModelPayload> for ModelDraft {
    fn from(p: ModelPayload) -> Self {
        ModelDraft {
            name: p.name,
            version: p.version,
            description: p.description,
            framework: p.framework,
            status: p.status,
            owner: p.owner,
            metrics: p.metrics,
            files: p.files,
        }
    }
}

/// Query parameters for auxiliary file retrieval.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FileContentQuery {
    /// Repository-relative path of the file to fetch.
    pub path: String,
}

/// Response for auxiliary file retrieval.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileContentResponse {
    pub path: String,
    pub content: String,
}

/// Body for `PUT /v1/settings`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: Option<String>,
    pub config_path: Option<String>,
    pub token: Option<String>,
}

impl From<SettingsPayload> for ConnectionSettings {
    fn from(p: SettingsPayload) -> Self {
        let mut settings = ConnectionSettings::new(p.repo_owner, p.repo_name);
        if let Some(branch) = p.branch.filter(|b| !b.is_empty()) {
            settings.branch = branch;
        }
        if let Some(path) = p.config_path.filter(|p| !p.is_empty()) {
            settings.config_path = path;
        }
        settings.token = p.token.filter(|t| !t.is_empty());
        settings
    }
}

/// Settings as returned to clients: the token never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub config_path: String,
    pub has_token: bool,
}

impl From<&ConnectionSettings> for SettingsResponse {
    fn from(s: &ConnectionSettings) -> Self {
        Self {
            repo_owner: s.repo_owner.clone(),
            repo_name: s.repo_name.clone(),
            branch: s.branch.clone(),
            config_path: s.config_path.clone(),
            has_token: s.bearer_token().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_payload_applies_defaults() {
        let payload = SettingsPayload {
            repo_owner: "acme".to_owned(),
            repo_name: "models".to_owned(),
            branch: None,
            config_path: Some(String::new()),
            token: Some(String::new()),
        };
        let settings: ConnectionSettings = payload.into();
        assert_eq!(settings.branch, "main");
        assert_eq!(settings.config_path, "models.yaml");
        assert_eq!(settings.token, None);
    }

    #[test]
    fn settings_response_redacts_the_token() {
        let mut settings = ConnectionSettings::new("acme", "models");
        settings.token = Some("secret".to_owned());
        let response = SettingsResponse::from(&settings);
        assert!(response.has_token);
        let v = serde_json::to_value(&response).unwrap();
        assert!(v.get("token").is_none());
        assert_eq!(v["repoOwner"], "acme");
    }
}
