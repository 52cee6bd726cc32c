//! Configuration types.
//!
//! Everything is read once at startup into an [`AppConfig`] value that the
//! rest of the service receives explicitly.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::ConfigError;

/// Default Gemini model used for both classification and reply drafting.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// File consulted for the API key when the environment variable is unset.
pub const DEFAULT_KEY_FILE: &str = "Gemini_Key.txt";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key. `None` means the LLM capability is unavailable.
    pub api_key: Option<SecretString>,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Base URL of the Gemini REST API.
    pub gemini_base_url: String,
    /// Transport timeout for a single LLM call.
    pub llm_timeout: Duration,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let key_file = var("EMAIL_TRIAGE_KEY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE));
        let api_key = load_api_key(var(API_KEY_VAR), &key_file);

        let llm_timeout_secs = match var("EMAIL_TRIAGE_LLM_TIMEOUT_SECS") {
            Some(raw) => parse_value("EMAIL_TRIAGE_LLM_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let port = match var("EMAIL_TRIAGE_PORT") {
            Some(raw) => parse_value("EMAIL_TRIAGE_PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model: var("EMAIL_TRIAGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            host: var("EMAIL_TRIAGE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e| ConfigError::InvalidValue {
            key: "EMAIL_TRIAGE_HOST".to_string(),
            message: format!("{raw}: {e}"),
        })
    }
}

/// Resolve the API key: environment value first, then the key file.
///
/// Blank values count as absent. Returns `None` when neither source has a key.
pub fn load_api_key(env_value: Option<String>, key_file: &Path) -> Option<SecretString> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Some(SecretString::from(key));
    }

    match std::fs::read_to_string(key_file) {
        Ok(contents) => {
            let key = contents.trim();
            if key.is_empty() {
                warn!(path = %key_file.display(), "API key file is empty");
                None
            } else {
                info!(path = %key_file.display(), "Loaded {API_KEY_VAR} from key file");
                Some(SecretString::from(key.to_string()))
            }
        }
        Err(e) => {
            warn!(
                path = %key_file.display(),
                error = %e,
                "{API_KEY_VAR} is not set and the key file could not be read"
            );
            None
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
