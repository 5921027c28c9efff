//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

/// Runtime configuration for mtrack-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Path of the JSON file holding the remote connection settings.
    pub settings_path: String,

    /// Base URL of the remote contents API (default: public GitHub).
    pub api_root: String,

    /// Result-cache time-to-live in seconds (default: 300).
    pub cache_ttl: Duration,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origin allow-list; unset means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve the Swagger UI (default: `true`).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("MTRACK_BIND", "0.0.0.0:3000"),
            settings_path: env_or("MTRACK_SETTINGS_PATH", "mtrack-settings.json"),
            api_root: env_or("MTRACK_API_ROOT", "https://api.github.com"),
            cache_ttl: Duration::from_secs(parse_env("MTRACK_CACHE_TTL_SECS", 300)),
            log_level: env_or("MTRACK_LOG", "info"),
            log_json: std::env::var("MTRACK_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: std::env::var("MTRACK_CORS_ORIGINS").ok(),
            enable_swagger: std::env::var("MTRACK_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
