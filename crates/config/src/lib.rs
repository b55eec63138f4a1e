//! Configuration loading, validation, and management for Switchyard.
//!
//! Loads configuration from `~/.switchyard/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.switchyard/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider: "openai", "azure", "openrouter", "ollama", or a
    /// custom name together with `api_url`
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL override (Azure: the resource endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Azure OpenAI API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Model (Azure: deployment name) used by every agent
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// HTTP timeout for a single completion request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub programs: ProgramsConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_api_version() -> String {
    "2024-12-01-preview".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout() -> u64 {
    120
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("agent", &self.agent)
            .field("database", &self.database)
            .field("programs", &self.programs)
            .field("calendar", &self.calendar)
            .field("search", &self.search)
            .finish()
    }
}

/// Dispatch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Model round-trips allowed per user turn. 0 = unbounded.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Agent that receives the first user message
    #[serde(default = "default_entry_agent")]
    pub entry_agent: String,
}

fn default_max_iterations() -> u32 {
    25
}
fn default_entry_agent() -> String {
    "triage".into()
}

impl AgentSettings {
    /// The iteration guard as the executor expects it.
    pub fn iteration_limit(&self) -> Option<u32> {
        (self.max_iterations > 0).then_some(self.max_iterations)
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            entry_agent: default_entry_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding students, courses, offerings, transcripts
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub read_only: bool,

    /// Sample rows per table included in the schema description
    #[serde(default = "default_sample_rows")]
    pub schema_sample_rows: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/university.db")
}
fn default_sample_rows() -> u32 {
    3
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            read_only: false,
            schema_sample_rows: default_sample_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    /// Directory with one sub-folder of documents per program
    #[serde(default = "default_programs_dir")]
    pub dir: PathBuf,
}

fn default_programs_dir() -> PathBuf {
    PathBuf::from("programs")
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            dir: default_programs_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Directory holding `<user>_token.json` files
    #[serde(default = "default_credentials_dir")]
    pub credentials_dir: PathBuf,

    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    #[serde(default = "default_calendar_api")]
    pub api_url: String,
}

fn default_credentials_dir() -> PathBuf {
    PathBuf::from("credentials")
}
fn default_calendar_id() -> String {
    "primary".into()
}
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_calendar_api() -> String {
    "https://www.googleapis.com/calendar/v3".into()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            credentials_dir: default_credentials_dir(),
            calendar_id: default_calendar_id(),
            default_timezone: default_timezone(),
            api_url: default_calendar_api(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_api")]
    pub api_url: String,

    #[serde(default = "default_max_results")]
    pub default_max_results: u32,
}

fn default_search_api() -> String {
    "https://api.duckduckgo.com".into()
}
fn default_max_results() -> u32 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: default_search_api(),
            default_max_results: default_max_results(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.switchyard/config.toml).
    ///
    /// Environment overrides, applied after the file:
    /// - API key (only if the file has none): `SWITCHYARD_API_KEY`,
    ///   `AZURE_OPENAI_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY`
    /// - `AZURE_OPENAI_ENDPOINT` sets `api_url` and selects the Azure provider
    /// - `SWITCHYARD_PROVIDER` (wins over the Azure endpoint heuristic)
    /// - `AZURE_OPENAI_DEPLOYMENT`, then `SWITCHYARD_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = ["SWITCHYARD_API_KEY", "AZURE_OPENAI_API_KEY", "OPENAI_API_KEY", "OPENROUTER_API_KEY"]
                .iter()
                .find_map(|&key| var(key));
        }

        if let Some(endpoint) = var("AZURE_OPENAI_ENDPOINT") {
            self.api_url = Some(endpoint);
            self.provider = "azure".into();
        }

        if let Some(provider) = var("SWITCHYARD_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = var("AZURE_OPENAI_DEPLOYMENT").or_else(|| var("SWITCHYARD_MODEL")) {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".switchyard")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.provider == "azure" && self.api_url.is_none() {
            return Err(ConfigError::ValidationError(
                "provider 'azure' requires api_url (or AZURE_OPENAI_ENDPOINT)".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            api_version: default_api_version(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout(),
            agent: AgentSettings::default(),
            database: DatabaseConfig::default(),
            programs: ProgramsConfig::default(),
            calendar: CalendarConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.agent.max_iterations, 25);
        assert_eq!(config.agent.entry_agent, "triage");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.calendar.default_timezone, "America/New_York");
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn azure_requires_endpoint() {
        let config = AppConfig {
            provider: "azure".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn load_from_file_with_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "gpt-4o-mini"
temperature = 0.2

[agent]
max_iterations = 0

[database]
path = "/srv/university.db"
read_only = true
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.agent.iteration_limit(), None);
        assert!(config.database.read_only);
        assert_eq!(config.database.schema_sample_rows, 3);
        assert_eq!(config.search.default_max_results, 5);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn azure_environment_selects_azure() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("AZURE_OPENAI_API_KEY", "az-key"),
            ("AZURE_OPENAI_ENDPOINT", "https://gt.openai.azure.com"),
            ("AZURE_OPENAI_DEPLOYMENT", "gt-gpt4o"),
        ]));
        assert_eq!(config.provider, "azure");
        assert_eq!(config.api_key.as_deref(), Some("az-key"));
        assert_eq!(config.api_url.as_deref(), Some("https://gt.openai.azure.com"));
        assert_eq!(config.model, "gt-gpt4o");
    }

    #[test]
    fn explicit_provider_and_key_precedence() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("SWITCHYARD_API_KEY", "primary"),
            ("OPENAI_API_KEY", "secondary"),
            ("AZURE_OPENAI_ENDPOINT", "https://x.openai.azure.com"),
            ("SWITCHYARD_PROVIDER", "openrouter"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("primary"));
        assert_eq!(config.provider, "openrouter");
    }

    #[test]
    fn file_api_key_is_not_overridden() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("OPENAI_API_KEY", "from-env")]));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-very-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o"));
        assert!(toml_str.contains("[calendar]"));
    }
}
