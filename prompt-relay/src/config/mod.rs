use config::{Config as Cfg, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::env;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Resolved from `GEMINI_API_KEY`, never from configuration files.
    #[serde(skip)]
    pub api_key: Option<Secret<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl RelayConfig {
    /// Load settings from `configuration.*` and `APP__*` variables, plus the
    /// API key from `GEMINI_API_KEY`.
    ///
    /// A missing key is not a startup error; requests are answered with 500
    /// until one is configured.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: RelayConfig = settings.try_deserialize()?;
        config.api_key = api_key_from(env::var(API_KEY_ENV).ok());

        Ok(config)
    }
}

/// Empty values count as unset.
pub fn api_key_from(raw: Option<String>) -> Option<Secret<String>> {
    raw.filter(|key| !key.is_empty()).map(Secret::new)
}
