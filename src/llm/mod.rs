//! LLM integration.
//!
//! The service talks to Google Gemini through the [`LlmProvider`] trait so
//! the triage logic never depends on a concrete backend. One provider is
//! built at startup and shared for the life of the process.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;

use secrecy::SecretString;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: std::time::Duration,
}

impl LlmConfig {
    /// Derive the provider settings from the app config.
    ///
    /// Returns `None` when no API key is configured.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.gemini_base_url.clone(),
            timeout: config.llm_timeout,
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = GeminiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
        config.timeout,
    )?;
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(provider))
}
