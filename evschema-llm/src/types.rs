//! Request types for chat completions and per-call options.

use std::fmt;
use std::time::Duration;

use evschema_core::ValidationPolicy;
use serde::{Deserialize, Serialize};

use crate::prompt::EVENT_EXTRACTION_SYSTEM;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gpt-4";
/// Low sampling temperature favours consistent structured output.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Output token ceiling when the caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
/// OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instruction message.
    System,
    /// Caller content.
    User,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Output constraint asking the provider for a single JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Always `"json_object"` for event extraction.
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// The JSON-object constraint.
    #[must_use]
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".into(),
        }
    }
}

/// A chat-completion request, serialized as the provider's request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, system message first.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Structured output constraint.
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Build the two-message extraction request for `prompt`.
    ///
    /// The prompt is passed through untrimmed.
    #[must_use]
    pub fn event_extraction(prompt: &str, options: &ParseEventOptions) -> Self {
        Self {
            model: options.model().to_string(),
            messages: vec![
                ChatMessage::system(EVENT_EXTRACTION_SYSTEM),
                ChatMessage::user(prompt),
            ],
            max_tokens: options.max_tokens(),
            temperature: options.temperature(),
            response_format: ResponseFormat::json_object(),
        }
    }
}

/// Per-call configuration for [`parse_event_prompt`](crate::parse_event_prompt).
///
/// Only the credential is required; everything else falls back to the
/// `DEFAULT_*` constants in this module.
#[derive(Clone, PartialEq)]
pub struct ParseEventOptions {
    /// Provider credential. Never logged.
    pub api_key: String,
    /// Model identifier.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Output token ceiling.
    pub max_tokens: Option<u32>,
    /// OpenAI-compatible API root, e.g. a local gateway.
    pub base_url: Option<String>,
    /// Transport deadline. `None` waits as long as the provider does.
    pub timeout: Option<Duration>,
    /// How strictly the reply is validated.
    pub policy: ValidationPolicy,
}

impl ParseEventOptions {
    /// Options with the given credential and all defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            temperature: None,
            max_tokens: None,
            base_url: None,
            timeout: None,
            policy: ValidationPolicy::default(),
        }
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token ceiling.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Point at a different OpenAI-compatible endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the transport deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the validation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Effective model.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Effective temperature.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Effective token ceiling.
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Effective API root, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

impl fmt::Debug for ParseEventOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseEventOptions")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}
