// common_utils/src/lib.rs

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_LLM_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8383";

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const LLM_URL_VAR: &str = "OPENROUTER_BASE_URL";
pub const MODEL_VAR: &str = "OPENROUTER_MODEL";
pub const BIND_ADDR_VAR: &str = "KISAN_BIND_ADDR";
pub const FORUM_DB_VAR: &str = "KISAN_FORUM_DB";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing OPENROUTER_API_KEY in environment")]
    MissingApiKey,
}

/// Settings every advisory flow receives at construction.
#[derive(Clone, Deserialize)]
pub struct AdvisoryConfig {
    pub api_key: Option<String>,
    pub llm_url: String,
    pub model: String,
}

impl AdvisoryConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            llm_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// The bearer token, or `MissingApiKey` when it is unset or blank.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

// Keep the key out of logs.
impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_url", &self.llm_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Unified process configuration for the server and the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    pub advisory: AdvisoryConfig,
    pub bind_addr: String,
    pub forum_db_path: Option<PathBuf>,
}

pub fn load_default_settings() -> ServiceSettings {
    ServiceSettings {
        advisory: AdvisoryConfig::new(None),
        bind_addr: DEFAULT_BIND_ADDR.to_string(),
        forum_db_path: default_forum_db_path(),
    }
}

/// Reads the process environment once. Business logic never calls this.
pub fn load_settings_from_env() -> ServiceSettings {
    load_settings_with(|name| std::env::var(name).ok())
}

/// Builds settings from an arbitrary variable lookup, falling back to defaults.
pub fn load_settings_with<F>(lookup: F) -> ServiceSettings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = load_default_settings();
    let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    settings.advisory.api_key = present(API_KEY_VAR);
    if let Some(url) = present(LLM_URL_VAR) {
        settings.advisory.llm_url = url;
    }
    if let Some(model) = present(MODEL_VAR) {
        settings.advisory.model = model;
    }
    if let Some(addr) = present(BIND_ADDR_VAR) {
        settings.bind_addr = addr;
    }
    if let Some(path) = present(FORUM_DB_VAR) {
        settings.forum_db_path = Some(PathBuf::from(path));
    }

    if settings.advisory.api_key.is_none() {
        warn!("[Config] {} is not set. Advisory requests will be refused.", API_KEY_VAR);
    }
    info!("[Config] LLM endpoint: {} (model {})", settings.advisory.llm_url, settings.advisory.model);
    settings
}

pub fn default_forum_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kisan_advisor").join("community.db"))
}
