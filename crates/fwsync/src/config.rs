// Environment-based agent configuration.
//
// Everything comes from `FWSYNC_`-prefixed environment variables; there is
// no config file and no CLI flags. Required: FWSYNC_PROVIDER_URL,
// FWSYNC_BOUNDARY_NAME, FWSYNC_API_KEY.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::Env,
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use fwsync_api::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured (set FWSYNC_API_KEY)")]
    NoApiKey,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Agent configuration, extracted from the environment on startup.
#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    /// Firewall provider endpoint (e.g. `https://firewall.internal.example`).
    pub provider_url: String,

    /// Name of the managed boundary in every segment.
    pub boundary_name: String,

    /// Provider API key (plaintext from the environment; wrapped in a
    /// `SecretString` before it reaches the client).
    pub api_key: Option<String>,

    /// Path to the rule template catalog.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default log filter (overridden by `RUST_LOG`).
    #[serde(default = "default_log")]
    pub log: String,

    /// Custom CA certificate for private provider endpoints.
    pub ca_cert: Option<PathBuf>,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("rules.csv")
}
fn default_timeout() -> u64 {
    30
}
fn default_log() -> String {
    "info".into()
}

// ── Loading ─────────────────────────────────────────────────────────

/// Extract the agent configuration from `FWSYNC_*` environment variables.
pub fn load() -> Result<AgentConfig, ConfigError> {
    let config = Figment::new()
        .merge(Env::prefixed("FWSYNC_"))
        .extract()?;
    Ok(config)
}

impl AgentConfig {
    /// The provider API key as a secret.
    pub fn api_key(&self) -> Result<SecretString, ConfigError> {
        self.api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.clone()))
            .ok_or(ConfigError::NoApiKey)
    }

    /// Transport settings for the provider client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self
                .ca_cert
                .as_ref()
                .map_or(TlsMode::System, |path| TlsMode::CustomCa(path.clone())),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
