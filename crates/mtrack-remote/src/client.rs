//! The remote config client: fetch, decode, normalize, cache.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};

use mtrack_core::{Model, decode_records, json_to_record, normalize};

use crate::cache::{CacheEntry, ResultCache};
use crate::error::{RemoteError, TransportFailure};
use crate::settings::ConnectionSettings;

const GITHUB_API_ROOT: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Raw content retrieval for a repository-relative path.
///
/// The production implementation talks to the GitHub contents API; tests
/// substitute counting or canned fakes.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    /// Fetch the decoded text of `path` at the settings' branch.
    async fn fetch_raw(
        &self,
        settings: &ConnectionSettings,
        path: &str,
    ) -> Result<String, TransportFailure>;
}

/// Response envelope of the contents endpoint.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// [`ContentTransport`] backed by the GitHub contents API.
pub struct GithubTransport {
    api_root: String,
    client: reqwest::Client,
}

impl GithubTransport {
    pub fn new() -> Self {
        Self::with_api_root(GITHUB_API_ROOT)
    }

    /// Point at a different API root (GitHub Enterprise, test server).
    pub fn with_api_root(api_root: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mtrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            api_root: api_root.into().trim_end_matches('/').to_owned(),
            client,
        }
    }

    fn contents_url(&self, settings: &ConnectionSettings, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_root, settings.repo_owner, settings.repo_name, path, settings.branch
        )
    }
}

impl Default for GithubTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentTransport for GithubTransport {
    async fn fetch_raw(
        &self,
        settings: &ConnectionSettings,
        path: &str,
    ) -> Result<String, TransportFailure> {
        let url = self.contents_url(settings, path);
        debug!(%url, "fetching remote content");

        let mut request = self.client.get(&url).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = settings.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(TransportFailure::Http)?;
        let status = response.status();
        match status.as_u16() {
            404 => return Err(TransportFailure::NotFound),
            401 => return Err(TransportFailure::Unauthorized),
            403 => return Err(TransportFailure::Forbidden),
            s if !status.is_success() => return Err(TransportFailure::Status(s)),
            _ => {}
        }

        let envelope: ContentEnvelope =
            response.json().await.map_err(TransportFailure::Http)?;
        decode_envelope(&envelope)
    }
}

/// Decode the base64 `content` field into text. GitHub wraps the payload in
/// newlines, so whitespace is stripped first.
fn decode_envelope(envelope: &ContentEnvelope) -> Result<String, TransportFailure> {
    if let Some(encoding) = envelope.encoding.as_deref() {
        if encoding != "base64" {
            return Err(TransportFailure::Envelope(format!(
                "unsupported content encoding: {encoding}"
            )));
        }
    }
    let compact: String = envelope
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| TransportFailure::Envelope(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| TransportFailure::Envelope(format!("content is not valid UTF-8: {e}")))
}

/// Cache-aware client for the remote model config.
///
/// Both collaborators are injected at construction; the client owns the
/// cache but only ever reads the settings handed to each call.
pub struct RemoteConfigClient {
    transport: Arc<dyn ContentTransport>,
    cache: ResultCache,
}

impl RemoteConfigClient {
    pub fn new(transport: Arc<dyn ContentTransport>, cache: ResultCache) -> Self {
        Self { transport, cache }
    }

    /// A client talking to the public GitHub API with the default TTL.
    pub fn github() -> Self {
        Self::new(Arc::new(GithubTransport::new()), ResultCache::new())
    }

    /// Fetch the canonical model list for the configured repository.
    ///
    /// Returns the cached list without any I/O when a fresh entry for the
    /// same repository identity exists.
    pub async fn fetch(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Vec<Model>, RemoteError> {
        let identity = settings.repo_identity();
        if let Some(models) = self.cache.get(&identity).await {
            debug!(identity, count = models.len(), "serving models from cache");
            return Ok(models);
        }

        let path = settings.config_path.as_str();
        let raw = self
            .transport
            .fetch_raw(settings, path)
            .await
            .map_err(|f| f.into_config_error(path))?;

        let models = decode_config(&raw, path)?;
        info!(identity, count = models.len(), "remote model config fetched");
        self.cache.put(&identity, models.clone()).await;
        Ok(models)
    }

    /// Drop the cache and fetch anew.
    pub async fn refresh(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Vec<Model>, RemoteError> {
        self.cache.invalidate().await;
        self.fetch(settings).await
    }

    /// Clear the cache without fetching. Called on settings change and
    /// disconnect.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    /// The raw cache slot, fresh or stale, for inspection by the host.
    pub async fn cache_snapshot(&self) -> Option<CacheEntry> {
        self.cache.snapshot().await
    }

    /// Retrieve the raw text of an auxiliary repository file.
    pub async fn fetch_file_content(
        &self,
        settings: &ConnectionSettings,
        path: &str,
    ) -> Result<String, RemoteError> {
        self.transport
            .fetch_raw(settings, path)
            .await
            .map_err(|f| f.into_file_error(path))
    }
}

/// Decode config text into normalized models, selecting the decoder by the
/// file extension: `.yaml`/`.yml` use the indentation-based decoder, anything
/// else is strict JSON (a bare array or `{ "models": [...] }`).
fn decode_config(raw: &str, path: &str) -> Result<Vec<Model>, RemoteError> {
    let now = Utc::now();

    let lower = path.to_lowercase();
    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let records = decode_records(raw);
        return Ok(records
            .iter()
            .enumerate()
            .map(|(i, r)| normalize(r, i, now))
            .collect());
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| RemoteError::MalformedConfig(format!("invalid JSON: {e}")))?;
    let list = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(obj) => match obj.get("models") {
            Some(serde_json::Value::Array(items)) => items.as_slice(),
            _ => {
                return Err(RemoteError::MalformedConfig(
                    "expected an array or an object with a \"models\" array".to_owned(),
                ));
            }
        },
        _ => {
            return Err(RemoteError::MalformedConfig(
                "expected an array or an object with a \"models\" array".to_owned(),
            ));
        }
    };

    Ok(list
        .iter()
        .enumerate()
        .map(|(i, v)| normalize(&json_to_record(v), i, now))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtrack_core::{ModelMetrics, ModelStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Transport that serves a canned payload and counts calls.
    struct FakeTransport {
        payload: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn ok(payload: &str) -> Self {
            Self {
                payload: Ok(payload.to_owned()),
                calls: AtomicUsize::new(0),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                payload: Err(status),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentTransport for FakeTransport {
        async fn fetch_raw(
            &self,
            _settings: &ConnectionSettings,
            _path: &str,
        ) -> Result<String, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Ok(text) => Ok(text.clone()),
                Err(404) => Err(TransportFailure::NotFound),
                Err(401) => Err(TransportFailure::Unauthorized),
                Err(403) => Err(TransportFailure::Forbidden),
                Err(s) => Err(TransportFailure::Status(*s)),
            }
        }
    }

    fn client_with(transport: Arc<FakeTransport>, ttl: Duration) -> RemoteConfigClient {
        RemoteConfigClient::new(transport, ResultCache::with_ttl(ttl))
    }

    fn yaml_settings(owner: &str) -> ConnectionSettings {
        ConnectionSettings::new(owner, "models")
    }

    const YAML: &str = "\
- id: m1
  name: Foo
  metrics:
    accuracy: 0.9
- id: m2
  status: bogus
";

    #[tokio::test]
    async fn yaml_config_decodes_and_normalizes() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(Arc::clone(&transport), Duration::from_secs(300));

        let models = client.fetch(&yaml_settings("acme")).await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "m1");
        assert_eq!(models[0].metrics.as_ref().unwrap().accuracy, Some(0.9));
        assert_eq!(models[1].status, ModelStatus::Development);
    }

    #[tokio::test]
    async fn cached_fetch_performs_no_io() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(Arc::clone(&transport), Duration::from_secs(300));
        let settings = yaml_settings("acme");

        let first = client.fetch(&settings).await.unwrap();
        let second = client.fetch(&settings).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn expired_cache_fetches_again() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(Arc::clone(&transport), Duration::ZERO);
        let settings = yaml_settings("acme");

        client.fetch(&settings).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        client.fetch(&settings).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn cache_is_isolated_by_repository_identity() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(Arc::clone(&transport), Duration::from_secs(300));

        client.fetch(&yaml_settings("acme")).await.unwrap();
        client.fetch(&yaml_settings("other")).await.unwrap();
        // Identity B must not be served identity A's entry.
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn snapshot_exposes_the_raw_slot() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(transport, Duration::from_secs(300));

        assert!(client.cache_snapshot().await.is_none());

        client.fetch(&yaml_settings("acme")).await.unwrap();
        let entry = client.cache_snapshot().await.unwrap();
        assert_eq!(entry.repo_url, "acme/models");
        assert_eq!(entry.models.len(), 2);

        client.invalidate().await;
        assert!(client.cache_snapshot().await.is_none());
    }

    #[tokio::test]
    async fn refresh_bypasses_a_fresh_cache() {
        let transport = Arc::new(FakeTransport::ok(YAML));
        let client = client_with(Arc::clone(&transport), Duration::from_secs(300));
        let settings = yaml_settings("acme");

        client.fetch(&settings).await.unwrap();
        client.refresh(&settings).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn not_found_names_the_config_path() {
        let transport = Arc::new(FakeTransport::status(404));
        let client = client_with(transport, Duration::from_secs(300));
        let mut settings = yaml_settings("acme");
        settings.config_path = "configs/models.yaml".to_owned();

        let err = client.fetch(&settings).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "config file not found: configs/models.yaml"
        );
    }

    #[tokio::test]
    async fn auth_and_rate_limit_classification() {
        let client = client_with(Arc::new(FakeTransport::status(401)), Duration::ZERO);
        assert!(matches!(
            client.fetch(&yaml_settings("acme")).await.unwrap_err(),
            RemoteError::InvalidCredential
        ));

        let client = client_with(Arc::new(FakeTransport::status(403)), Duration::ZERO);
        assert!(matches!(
            client.fetch(&yaml_settings("acme")).await.unwrap_err(),
            RemoteError::RateLimitedOrDenied
        ));

        let client = client_with(Arc::new(FakeTransport::status(502)), Duration::ZERO);
        assert!(matches!(
            client.fetch(&yaml_settings("acme")).await.unwrap_err(),
            RemoteError::TransportError { status: 502 }
        ));
    }

    #[tokio::test]
    async fn json_config_accepts_bare_array_and_wrapper_object() {
        let mut settings = yaml_settings("acme");
        settings.config_path = "models.json".to_owned();

        let bare = r#"[{"id": "m1", "name": "Foo"}]"#;
        let client = client_with(Arc::new(FakeTransport::ok(bare)), Duration::ZERO);
        let models = client.fetch(&settings).await.unwrap();
        assert_eq!(models[0].name, "Foo");

        let wrapped = r#"{"models": [{"id": "m1"}, {"id": "m2"}]}"#;
        let client = client_with(Arc::new(FakeTransport::ok(wrapped)), Duration::ZERO);
        assert_eq!(client.fetch(&settings).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_list_json_is_malformed() {
        let mut settings = yaml_settings("acme");
        settings.config_path = "models.json".to_owned();

        for payload in [r#"{"weights": {}}"#, r#""scalar""#, "not json"] {
            let client = client_with(Arc::new(FakeTransport::ok(payload)), Duration::ZERO);
            assert!(matches!(
                client.fetch(&settings).await.unwrap_err(),
                RemoteError::MalformedConfig(_)
            ));
        }
    }

    #[tokio::test]
    async fn strict_format_round_trips_through_the_client() {
        let original = vec![mtrack_core::Model {
            id: "m1".to_owned(),
            name: "Foo".to_owned(),
            version: "2.1.0".to_owned(),
            description: "fraud scorer".to_owned(),
            framework: "pytorch".to_owned(),
            status: ModelStatus::Production,
            owner: "ml-team".to_owned(),
            created_at: "2024-01-01T00:00:00Z".to_owned(),
            updated_at: "2024-02-01T00:00:00Z".to_owned(),
            metrics: Some(ModelMetrics {
                accuracy: Some(0.97),
                latency_ms: Some(12.0),
            }),
            files: None,
        }];

        let payload = serde_json::to_string(&original).unwrap();
        let mut settings = yaml_settings("acme");
        settings.config_path = "models.json".to_owned();

        let client = client_with(Arc::new(FakeTransport::ok(&payload)), Duration::ZERO);
        let decoded = client.fetch(&settings).await.unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn file_fetch_maps_not_found_separately() {
        let transport = Arc::new(FakeTransport::status(404));
        let client = client_with(transport, Duration::ZERO);
        let err = client
            .fetch_file_content(&yaml_settings("acme"), "docs/card.md")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "file not found: docs/card.md");
    }

    #[test]
    fn envelope_decodes_wrapped_base64() {
        let envelope = ContentEnvelope {
            content: "LSBpZDogbTEK\nIG5hbWU6IEZvbwo=".to_owned(),
            encoding: Some("base64".to_owned()),
        };
        let text = decode_envelope(&envelope).unwrap();
        assert!(text.starts_with("- id: m1"));
    }

    #[test]
    fn envelope_rejects_unknown_encoding() {
        let envelope = ContentEnvelope {
            content: "xx".to_owned(),
            encoding: Some("utf-16".to_owned()),
        };
        assert!(matches!(
            decode_envelope(&envelope),
            Err(TransportFailure::Envelope(_))
        ));
    }

    #[test]
    fn contents_url_matches_the_github_shape() {
        let transport = GithubTransport::with_api_root("https://api.github.com/");
        let mut settings = yaml_settings("acme");
        settings.branch = "release".to_owned();
        let url = transport.contents_url(&settings, "configs/models.yaml");
        assert_eq!(
            url,
            "https://api.github.com/repos/acme/models/contents/configs/models.yaml?ref=release"
        );
    }
}
