//! Canonicalization of decoded records into [`Model`] values.
//!
//! Normalization is total: it never fails, no matter how partial or
//! wrongly-typed the source record is. Missing or unusable required fields
//! get defaults; optional groups are kept only when the source actually
//! supplied them.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::decode::{RawRecord, RawValue, map_scalar};
use crate::model::{Model, ModelFiles, ModelMetrics, ModelStatus};
use crate::scalar::Scalar;

const DEFAULT_NAME: &str = "Unnamed Model";
const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_FRAMEWORK: &str = "unknown";
const DEFAULT_OWNER: &str = "unknown";

/// Normalize one decoded record into the canonical model shape.
///
/// `index` is the record's position in the fetched list and seeds the
/// placeholder identifier; `now` fills in absent timestamps.
pub fn normalize(raw: &RawRecord, index: usize, now: DateTime<Utc>) -> Model {
    let fallback_time = now.to_rfc3339();

    let status = match raw.scalar("status").and_then(Scalar::as_str) {
        Some(s) => s.parse::<ModelStatus>().unwrap_or_else(|()| {
            debug!(status = s, index, "unknown model status; defaulting to development");
            ModelStatus::Development
        }),
        None => ModelStatus::Development,
    };

    Model {
        id: string_field(raw, &["id"]).unwrap_or_else(|| format!("model-{index}")),
        name: string_field(raw, &["name"]).unwrap_or_else(|| DEFAULT_NAME.to_owned()),
        version: string_field(raw, &["version"]).unwrap_or_else(|| DEFAULT_VERSION.to_owned()),
        description: string_field(raw, &["description"]).unwrap_or_default(),
        framework: string_field(raw, &["framework"])
            .unwrap_or_else(|| DEFAULT_FRAMEWORK.to_owned()),
        status,
        owner: string_field(raw, &["owner"]).unwrap_or_else(|| DEFAULT_OWNER.to_owned()),
        created_at: string_field(raw, &["createdAt", "created_at"])
            .unwrap_or_else(|| fallback_time.clone()),
        updated_at: string_field(raw, &["updatedAt", "updated_at"])
            .unwrap_or_else(|| fallback_time.clone()),
        metrics: metrics_group(raw),
        files: files_group(raw),
    }
}

/// First usable string under any of the accepted key spellings.
fn string_field(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| raw.scalar(k).and_then(Scalar::as_nonempty_string))
}

/// The metrics group is emitted only when the source record carried a
/// `metrics` key at all. Within it, each metric is kept only when numeric;
/// anything else is dropped rather than coerced to zero.
fn metrics_group(raw: &RawRecord) -> Option<ModelMetrics> {
    if !raw.has_key("metrics") {
        return None;
    }
    let mut metrics = ModelMetrics::default();
    if let Some(map) = raw.map("metrics") {
        metrics.accuracy = map_scalar(map, "accuracy").and_then(Scalar::as_f64);
        metrics.latency_ms = map_scalar(map, "latency").and_then(Scalar::as_f64);
    }
    Some(metrics)
}

/// Same presence rule as metrics, per field, each checked to be a string.
fn files_group(raw: &RawRecord) -> Option<ModelFiles> {
    if !raw.has_key("files") {
        return None;
    }
    let mut files = ModelFiles::default();
    if let Some(map) = raw.map("files") {
        files.model_card = file_path(map, &["modelCard", "model_card"]);
        files.training_script = file_path(map, &["trainingScript", "training_script"]);
        files.feature_script = file_path(map, &["featureScript", "feature_script"]);
        files.inference_script = file_path(map, &["inferenceScript", "inference_script"]);
        files.artifact = file_path(map, &["artifact", "model_artifact"]);
    }
    Some(files)
}

fn file_path(map: &[(String, Scalar)], keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        map_scalar(map, k)
            .and_then(Scalar::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Bridge a strict-format (JSON) record into the same [`RawRecord`] shape
/// the structured-text decoder produces, so both formats share one
/// normalizer. Arrays and nested objects outside the two reserved section
/// keys are dropped; a non-object record comes back empty and normalizes
/// to an all-defaults model.
pub fn json_to_record(value: &serde_json::Value) -> RawRecord {
    let mut record = RawRecord::new();
    let Some(obj) = value.as_object() else {
        return record;
    };
    for (key, v) in obj {
        match v {
            serde_json::Value::Object(section) if key == "metrics" || key == "files" => {
                let entries = section
                    .iter()
                    .filter_map(|(k, sv)| json_scalar(sv).map(|s| (k.clone(), s)))
                    .collect();
                record.insert(key.clone(), RawValue::Map(entries));
            }
            other => {
                if let Some(s) = json_scalar(other) {
                    record.insert(key.clone(), RawValue::Scalar(s));
                }
            }
        }
    }
    record
}

fn json_scalar(v: &serde_json::Value) -> Option<Scalar> {
    match v {
        serde_json::Value::String(s) => Some(Scalar::Str(s.clone())),
        serde_json::Value::Number(n) => n.as_f64().map(Scalar::Num),
        serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
        serde_json::Value::Null => Some(Scalar::Null),
        _ => None,
    }
}
