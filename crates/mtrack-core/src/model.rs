//! The canonical model entity and its status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a tracked model.
///
/// The enumeration is closed: anything that does not match one of the four
/// labels normalizes to [`ModelStatus::Development`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    #[default]
    Development,
    Staging,
    Production,
    Archived,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Development => "development",
            ModelStatus::Staging => "staging",
            ModelStatus::Production => "production",
            ModelStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(ModelStatus::Development),
            "staging" => Ok(ModelStatus::Staging),
            "production" => Ok(ModelStatus::Production),
            "archived" => Ok(ModelStatus::Archived),
            _ => Err(()),
        }
    }
}

/// Optional evaluation metrics attached to a model.
///
/// Each field is independently optional; a metric missing from the source
/// record stays unset rather than being coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetrics {
    /// Accuracy as a fraction in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Inference latency in milliseconds.
    #[serde(rename = "latency", skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

/// Optional repository-relative paths to files linked to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inference_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

/// The canonical, fully-defaulted representation of one tracked model.
///
/// After normalization every field outside the two optional groups is
/// populated, no matter how partial the source record was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub framework: String,
    pub status: ModelStatus,
    pub owner: String,
    /// RFC 3339 timestamp; defaulted to the fetch instant when absent.
    pub created_at: String,
    /// RFC 3339 timestamp; defaulted to the fetch instant when absent.
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ModelMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<ModelFiles>,
}

/// Filter a model list by status and/or a case-insensitive substring over
/// name, framework, and owner.
pub fn filter_models<'a>(
    models: &'a [Model],
    status: Option<ModelStatus>,
    query: Option<&str>,
) -> Vec<&'a Model> {
    let needle = query.map(str::to_lowercase);
    models
        .iter()
        .filter(|m| status.is_none_or(|s| m.status == s))
        .filter(|m| {
            needle.as_deref().is_none_or(|q| {
                m.name.to_lowercase().contains(q)
                    || m.framework.to_lowercase().contains(q)
                    || m.owner.to_lowercase().contains(q)
            })
        })
        .collect()
}
