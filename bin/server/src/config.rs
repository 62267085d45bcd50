//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables. Nested keys use
//! a double underscore, so `OPENAI__CHAT_MODEL` sets `openai.chat_model`.
//!
//! See [`OpenAiSettings`] for the model and endpoint settings.

use atelier_ai::OpenAiSettings;
use serde::Deserialize;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// OpenAI API key. The server starts without it but refuses to
    /// orchestrate until it is set.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// OpenAI endpoint and model settings.
    #[serde(default)]
    pub openai: OpenAiSettings,
}

fn default_bind_address() -> String {
    "127.0.0.1:8000".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the API key if one is set and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let source = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
            .expect("load config")
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.bind_address, "127.0.0.1:8000");
        assert_eq!(config.openai.chat_model, "gpt-4o-mini");
        assert_eq!(config.openai.image_model, "dall-e-2");
        assert_eq!(config.openai.image_size, "512x512");
        assert_eq!(config.openai.timeout_seconds, 120);
    }

    #[test]
    fn reads_flat_and_nested_keys() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("BIND_ADDRESS", "0.0.0.0:9000"),
            ("OPENAI__CHAT_MODEL", "gpt-4o"),
            ("OPENAI__TIMEOUT_SECONDS", "30"),
        ]);
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.openai.chat_model, "gpt-4o");
        assert_eq!(config.openai.timeout_seconds, 30);
        assert_eq!(config.openai.image_quality, "standard");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = load(&[("OPENAI_API_KEY", "   ")]);
        assert_eq!(config.api_key(), None);
    }
}
