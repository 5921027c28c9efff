pub mod cache;
pub mod client;
pub mod error;
pub mod settings;

pub use cache::{CacheEntry, DEFAULT_TTL, ResultCache};
pub use client::{ContentTransport, GithubTransport, RemoteConfigClient};
pub use error::{RemoteError, TransportFailure};
pub use settings::{ConnectionSettings, SettingsError, SettingsStore};
