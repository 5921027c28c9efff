//! Routes for the read-only remote mirror.
//!
//! Every handler loads the persisted connection settings first and fails
//! with `NotConfigured` when none are stored; the browser client then stays
//! on the local list and shows the message.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;

use mtrack_core::Model;
use mtrack_remote::{CacheEntry, ConnectionSettings, RemoteError};

use crate::error::ServerError;
use crate::schemas::{FileContentQuery, FileContentResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_remote_models,
        refresh_remote_models,
        get_remote_file,
        get_remote_cache
    ),
    components(schemas(FileContentQuery, FileContentResponse))
)]
pub struct RemoteApi;

/// Register remote mirror routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/remote/models", get(list_remote_models))
        .route("/remote/refresh", post(refresh_remote_models))
        .route("/remote/files", get(get_remote_file))
        .route("/remote/cache", get(get_remote_cache))
}

fn require_settings(state: &AppState) -> Result<ConnectionSettings, ServerError> {
    state
        .settings
        .load()?
        .ok_or(ServerError::Remote(RemoteError::NotConfigured))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// The mirrored model list (`GET /v1/remote/models`).
///
/// Served from the result cache when a fresh entry for the configured
/// repository exists; otherwise fetched from the remote.
#[utoipa::path(
    get,
    path = "/v1/remote/models",
    tag = "v1::remote",
    responses(
        (status = 200, description = "Mirrored models", body = Value),
        (status = 400, description = "No connection configured"),
        (status = 401, description = "Access token rejected"),
        (status = 403, description = "Rate limited or denied"),
        (status = 404, description = "Config file not found"),
        (status = 422, description = "Config is not a model list"),
        (status = 502, description = "Remote transport failure"),
    )
)]
pub async fn list_remote_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Model>>, ServerError> {
    let settings = require_settings(&state)?;
    let models = state.remote.fetch(&settings).await?;
    Ok(Json(models))
}

/// Drop the cache and fetch anew (`POST /v1/remote/refresh`).
#[utoipa::path(
    post,
    path = "/v1/remote/refresh",
    tag = "v1::remote",
    responses(
        (status = 200, description = "Freshly fetched models", body = Value),
        (status = 400, description = "No connection configured"),
    )
)]
pub async fn refresh_remote_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Model>>, ServerError> {
    let settings = require_settings(&state)?;
    let models = state.remote.refresh(&settings).await?;
    Ok(Json(models))
}

/// Raw text of an auxiliary repository file (`GET /v1/remote/files?path=`).
#[utoipa::path(
    get,
    path = "/v1/remote/files",
    tag = "v1::remote",
    params(("path" = String, Query, description = "Repository-relative file path")),
    responses(
        (status = 200, description = "File content", body = FileContentResponse),
        (status = 400, description = "No connection configured or empty path"),
        (status = 404, description = "File not found"),
    )
)]
pub async fn get_remote_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileContentQuery>,
) -> Result<Json<FileContentResponse>, ServerError> {
    if query.path.is_empty() {
        return Err(ServerError::BadRequest("path must not be empty".into()));
    }
    let settings = require_settings(&state)?;
    let content = state
        .remote
        .fetch_file_content(&settings, &query.path)
        .await?;
    Ok(Json(FileContentResponse {
        path: query.path,
        content,
    }))
}

/// The raw cache slot (`GET /v1/remote/cache`), fresh or stale.
///
/// Serializes as the cache persistence record
/// (`{models, lastFetched, repoUrl}`), or `null` when the slot is empty.
/// Works without connection settings so the browser can inspect local mode.
#[utoipa::path(
    get,
    path = "/v1/remote/cache",
    tag = "v1::remote",
    responses(
        (status = 200, description = "Cache slot contents or null", body = Value),
    )
)]
pub async fn get_remote_cache(State(state): State<Arc<AppState>>) -> Json<Option<CacheEntry>> {
    Json(state.remote.cache_snapshot().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mtrack_remote::{GithubTransport, RemoteConfigClient, ResultCache, SettingsStore};

    use crate::config::Config;
    use crate::store::LocalModelStore;

    fn test_state(dir: &std::path::Path) -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".to_owned(),
            settings_path: dir.join("settings.json").display().to_string(),
            api_root: "https://api.github.com".to_owned(),
            cache_ttl: Duration::from_secs(300),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
        };
        let remote = RemoteConfigClient::new(
            Arc::new(GithubTransport::with_api_root(&config.api_root)),
            ResultCache::new(),
        );
        Arc::new(AppState {
            settings: Arc::new(SettingsStore::new(&config.settings_path)),
            config: Arc::new(config),
            local: Arc::new(LocalModelStore::new()),
            remote: Arc::new(remote),
        })
    }

    #[tokio::test]
    async fn cache_route_reports_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let Json(slot) = get_remote_cache(State(state)).await;
        assert!(slot.is_none());
    }

    #[tokio::test]
    async fn mirror_without_settings_is_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let err = list_remote_models(State(state)).await.unwrap_err();
        assert!(matches!(
            err,
            ServerError::Remote(RemoteError::NotConfigured)
        ));
    }
}
