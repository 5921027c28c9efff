pub mod models;
pub mod remote;
pub mod settings;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

/// Routes nested under `/v1`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(models::router())
        .merge(remote::router())
        .merge(settings::router())
}
