//! Parser configuration, loadable from TOML.
//!
//! ```toml
//! [llm]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4"
//! temperature = 0.3
//! max_tokens = 2000
//! api_key_env = "OPENAI_API_KEY"
//! request_timeout_ms = 0
//!
//! [validation]
//! policy = "strict"
//! ```
//!
//! The file names the environment variable that holds the credential; the
//! credential itself is never read from or written to disk.

use std::path::Path;
use std::time::Duration;

use evschema_core::ValidationPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, ParseEventOptions,
};

/// Errors loading configuration or resolving the credential.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Configuration error: {0}")]
    Parse(String),

    /// The named environment variable is unset or empty.
    #[error("Credential environment variable '{0}' is not set")]
    MissingCredential(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Provider and generation settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Response validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Provider and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output token ceiling.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Environment variable holding the credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Transport deadline in milliseconds; `0` disables it.
    #[serde(default)]
    pub request_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            request_timeout_ms: 0,
        }
    }
}

/// Response validation settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// `"strict"` or `"permissive"`.
    #[serde(default)]
    pub policy: ValidationPolicy,
}

impl ParserConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Build call options, reading the credential from `llm.api_key_env`.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCredential` if the variable is unset or
    /// blank.
    pub fn to_options(&self) -> Result<ParseEventOptions, ConfigError> {
        let key = std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(self.llm.api_key_env.clone()))?;
        Ok(self.to_options_with_key(key))
    }

    /// Build call options with an explicit credential.
    #[must_use]
    pub fn to_options_with_key(&self, api_key: impl Into<String>) -> ParseEventOptions {
        let mut options = ParseEventOptions::new(api_key)
            .with_base_url(self.llm.base_url.clone())
            .with_model(self.llm.model.clone())
            .with_temperature(self.llm.temperature)
            .with_max_tokens(self.llm.max_tokens)
            .with_policy(self.validation.policy);
        if self.llm.request_timeout_ms > 0 {
            options = options.with_timeout(Duration::from_millis(self.llm.request_timeout_ms));
        }
        options
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ParserConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = ParserConfig::from_toml(
            r#"
            [llm]
            model = "gpt-4-turbo"
            request_timeout_ms = 1500

            [validation]
            policy = "permissive"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.llm.model, "gpt-4-turbo");
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.validation.policy, ValidationPolicy::Permissive);

        let options = config.to_options_with_key("sk-test");
        assert_eq!(options.model(), "gpt-4-turbo");
        assert_eq!(options.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(options.policy, ValidationPolicy::Permissive);
    }

    #[test]
    fn zero_timeout_means_none() {
        let options = ParserConfig::default().to_options_with_key("sk-test");
        assert_eq!(options.timeout, None);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = ParserConfig::from_toml("[validation]\npolicy = \"lenient\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unset_credential_variable_is_reported() {
        let mut config = ParserConfig::default();
        config.llm.api_key_env = "EVSCHEMA_TEST_CREDENTIAL_THAT_IS_NEVER_SET".into();
        match config.to_options() {
            Err(ConfigError::MissingCredential(var)) => {
                assert_eq!(var, "EVSCHEMA_TEST_CREDENTIAL_THAT_IS_NEVER_SET");
            }
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ParserConfig::from_file(Path::new("/nonexistent/evschema.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
