//! Connection settings routes.
//!
//! Saving or clearing settings always invalidates the result cache so the
//! next mirror request cannot serve a list fetched under the old identity
//! or credential.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use mtrack_remote::{ConnectionSettings, RemoteError};

use crate::error::ServerError;
use crate::schemas::{SettingsPayload, SettingsResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_settings, put_settings, delete_settings),
    components(schemas(SettingsPayload, SettingsResponse))
)]
pub struct SettingsApi;

/// Register settings routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/settings",
        get(get_settings).put(put_settings).delete(delete_settings),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// The stored connection settings, token redacted (`GET /v1/settings`).
#[utoipa::path(
    get,
    path = "/v1/settings",
    tag = "v1::settings",
    responses(
        (status = 200, description = "Stored settings", body = SettingsResponse),
        (status = 400, description = "No connection configured"),
    )
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ServerError> {
    let settings = state
        .settings
        .load()?
        .ok_or(ServerError::Remote(RemoteError::NotConfigured))?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Persist new connection settings (`PUT /v1/settings`).
#[utoipa::path(
    put,
    path = "/v1/settings",
    tag = "v1::settings",
    request_body = SettingsPayload,
    responses(
        (status = 200, description = "Settings saved", body = SettingsResponse),
        (status = 400, description = "Missing owner or repository name"),
    )
)]
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsPayload>,
) -> Result<Json<SettingsResponse>, ServerError> {
    if payload.repo_owner.is_empty() || payload.repo_name.is_empty() {
        return Err(ServerError::BadRequest(
            "repoOwner and repoName must not be empty".into(),
        ));
    }

    let settings: ConnectionSettings = payload.into();
    state.settings.save(&settings)?;
    // The cached list may belong to the old repository or credential.
    state.remote.invalidate().await;
    info!(identity = %settings.repo_identity(), "connection settings updated");
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Disconnect (`DELETE /v1/settings`): clear the file and the cache.
#[utoipa::path(
    delete,
    path = "/v1/settings",
    tag = "v1::settings",
    responses(
        (status = 204, description = "Settings cleared"),
    )
)]
pub async fn delete_settings(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ServerError> {
    state.settings.clear()?;
    state.remote.invalidate().await;
    info!("disconnected from remote repository");
    Ok(StatusCode::NO_CONTENT)
}
