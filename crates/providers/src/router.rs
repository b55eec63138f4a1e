//! Provider selection from config.

use std::sync::Arc;
use std::time::Duration;
use switchyard_config::AppConfig;
use switchyard_core::error::ProviderError;
use switchyard_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the completion provider named by `config.provider`.
///
/// Known names get their default base URL; anything else must supply
/// `api_url`. Azure requires `api_url` (the resource endpoint).
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let provider = if config.provider == "azure" {
        let endpoint = config.api_url.clone().ok_or_else(|| {
            ProviderError::NotConfigured("azure provider requires api_url".into())
        })?;
        OpenAiCompatProvider::azure(endpoint, api_key, &config.api_version)
    } else {
        let base_url = config
            .api_url
            .clone()
            .or_else(|| default_base_url(&config.provider).map(String::from))
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "unknown provider '{}' and no api_url set",
                    config.provider
                ))
            })?;
        OpenAiCompatProvider::new(&config.provider, base_url, api_key)
    };

    tracing::debug!(provider = %config.provider, model = %config.model, "Provider configured");
    Ok(Arc::new(provider.with_timeout(timeout)))
}

/// Get the default base URL for known providers.
fn default_base_url(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        _ => None,
    }
}
