//! In-memory store for locally tracked models.
//!
//! This is the non-remote data source: a plain list behind a `RwLock`,
//! mutated only by the CRUD handlers. The remote mirror never writes here.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use mtrack_core::{Model, ModelFiles, ModelMetrics, ModelStatus, filter_models};

/// Fields accepted when creating or updating a local model.
#[derive(Debug, Clone, Default)]
pub struct ModelDraft {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub framework: Option<String>,
    pub status: Option<ModelStatus>,
    pub owner: Option<String>,
    pub metrics: Option<ModelMetrics>,
    pub files: Option<ModelFiles>,
}

#[derive(Debug, Default)]
pub struct LocalModelStore {
    models: RwLock<Vec<Model>>,
}

impl LocalModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// List models, optionally filtered by status and a substring query.
    pub async fn list(&self, status: Option<ModelStatus>, query: Option<&str>) -> Vec<Model> {
        let models = self.models.read().await;
        filter_models(&models, status, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Model> {
        self.models.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Create a model from a draft; unset fields get the canonical defaults.
    pub async fn create(&self, draft: ModelDraft) -> Model {
        let now = Utc::now().to_rfc3339();
        let model = Model {
            id: Uuid::new_v4().to_string(),
            name: draft.name.unwrap_or_else(|| "Unnamed Model".to_owned()),
            version: draft.version.unwrap_or_else(|| "1.0.0".to_owned()),
            description: draft.description.unwrap_or_default(),
            framework: draft.framework.unwrap_or_else(|| "unknown".to_owned()),
            status: draft.status.unwrap_or_default(),
            owner: draft.owner.unwrap_or_else(|| "unknown".to_owned()),
            created_at: now.clone(),
            updated_at: now,
            metrics: draft.metrics,
            files: draft.files,
        };
        self.models.write().await.push(model.clone());
        model
    }

    /// Apply the set fields of a draft to an existing model.
    ///
    /// Returns the updated model, or `None` when the id is unknown.
    pub async fn update(&self, id: &str, draft: ModelDraft) -> Option<Model> {
        let mut models = self.models.write().await;
        let model = models.iter_mut().find(|m| m.id == id)?;
        if let Some(name) = draft.name {
            model.name = name;
        }
        if let Some(version) = draft.version {
            model.version = version;
        }
        if let Some(description) = draft.description {
            model.description = description;
        }
        if let Some(framework) = draft.framework {
            model.framework = framework;
        }
        if let Some(status) = draft.status {
            model.status = status;
        }
        if let Some(owner) = draft.owner {
            model.owner = owner;
        }
        if let Some(metrics) = draft.metrics {
            model.metrics = Some(metrics);
        }
        if let Some(files) = draft.files {
            model.files = Some(files);
        }
        model.updated_at = Utc::now().to_rfc3339();
        Some(model.clone())
    }

    /// Remove a model. Returns `true` when something was deleted.
    pub async fn delete(&self, id: &str) -> bool {
        let mut models = self.models.write().await;
        let before = models.len();
        models.retain(|m| m.id != id);
        models.len() < before
    }
}
