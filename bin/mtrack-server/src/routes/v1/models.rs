//! CRUD routes for the local model list.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use mtrack_core::{Model, ModelStatus};

use crate::error::ServerError;
use crate::schemas::{ListModelsQuery, ModelPayload};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_models, create_model, get_model, update_model, delete_model),
    components(schemas(ListModelsQuery, ModelPayload))
)]
pub struct ModelsApi;

/// Register local model routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/models", get(list_models).post(create_model))
        .route(
            "/models/{id}",
            get(get_model).put(update_model).delete(delete_model),
        )
}

/// Parse the optional `status` query parameter against the closed enum.
///
/// Unlike normalization, an unknown filter value here is a caller mistake
/// and is rejected instead of being coerced to `development`.
fn parse_status_filter(raw: Option<&str>) -> Result<Option<ModelStatus>, ServerError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|()| {
            ServerError::BadRequest(format!(
                "unknown status '{s}' (expected development|staging|production|archived)"
            ))
        }),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// List local models (`GET /v1/models`).
#[utoipa::path(
    get,
    path = "/v1/models",
    tag = "v1::models",
    params(
        ("status" = Option<String>, Query, description = "Filter by lifecycle status"),
        ("q" = Option<String>, Query, description = "Substring filter over name/framework/owner"),
    ),
    responses(
        (status = 200, description = "Matching models", body = Value),
        (status = 400, description = "Unknown status filter"),
    )
)]
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListModelsQuery>,
) -> Result<Json<Vec<Model>>, ServerError> {
    let status = parse_status_filter(query.status.as_deref())?;
    let models = state.local.list(status, query.q.as_deref()).await;
    Ok(Json(models))
}

/// Create a local model (`POST /v1/models`).
#[utoipa::path(
    post,
    path = "/v1/models",
    tag = "v1::models",
    request_body = ModelPayload,
    responses(
        (status = 201, description = "Model created", body = Value),
    )
)]
pub async fn create_model(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ModelPayload>,
) -> Result<(StatusCode, Json<Model>), ServerError> {
    let model = state.local.create(payload.into()).await;
    Ok((StatusCode::CREATED, Json(model)))
}

/// Fetch one local model (`GET /v1/models/{id}`).
#[utoipa::path(
    get,
    path = "/v1/models/{id}",
    tag = "v1::models",
    params(("id" = String, Path, description = "Model identifier")),
    responses(
        (status = 200, description = "The model", body = Value),
        (status = 404, description = "Unknown model id"),
    )
)]
pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Model>, ServerError> {
    state
        .local
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("no model with id {id}")))
}

/// Update a local model (`PUT /v1/models/{id}`).
#[utoipa::path(
    put,
    path = "/v1/models/{id}",
    tag = "v1::models",
    params(("id" = String, Path, description = "Model identifier")),
    request_body = ModelPayload,
    responses(
        (status = 200, description = "Updated model", body = Value),
        (status = 404, description = "Unknown model id"),
    )
)]
pub async fn update_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ModelPayload>,
) -> Result<Json<Model>, ServerError> {
    state
        .local
        .update(&id, payload.into())
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("no model with id {id}")))
}

/// Delete a local model (`DELETE /v1/models/{id}`).
#[utoipa::path(
    delete,
    path = "/v1/models/{id}",
    tag = "v1::models",
    params(("id" = String, Path, description = "Model identifier")),
    responses(
        (status = 204, description = "Model deleted"),
        (status = 404, description = "Unknown model id"),
    )
)]
pub async fn delete_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.local.delete(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("no model with id {id}")))
    }
}
