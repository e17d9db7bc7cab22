//! Chat-completion providers.
//!
//! [`CompletionProvider`] is the seam between the parser and whatever
//! produces text. [`OpenAiProvider`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint over HTTP.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::types::{CompletionRequest, ParseEventOptions};

/// Something that turns role-tagged messages into generated text.
pub trait CompletionProvider {
    /// Submit one completion request.
    ///
    /// `Ok(None)` means the provider answered but produced no text.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send;
}

/// HTTP transport for OpenAI-compatible APIs.
///
/// Holds its own connection pool; build one per call and drop it afterwards.
pub struct OpenAiProvider {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider for `base_url` (e.g. `https://api.openai.com/v1`).
    ///
    /// # Errors
    /// Returns [`ProviderError::Transport`] if the HTTP client cannot be
    /// initialised.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a provider from per-call options.
    ///
    /// # Errors
    /// See [`OpenAiProvider::new`].
    pub fn from_options(options: &ParseEventOptions) -> Result<Self, ProviderError> {
        Self::new(options.base_url(), options.api_key.clone(), options.timeout)
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Option<String>, ProviderError> {
        let start = Instant::now();
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        if !status.is_success() {
            warn!(status = status.as_u16(), latency_ms, "Provider returned error status");
            return Err(classify_status(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Unexpected(Some(format!("Undecodable completion body: {e}")))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|text| !text.is_empty());

        debug!(
            latency_ms,
            content_len = content.as_ref().map_or(0, String::len),
            "Completion received"
        );
        Ok(content)
    }
}

/// Map a non-success HTTP status onto the closed provider error set.
fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    if status == StatusCode::UNAUTHORIZED {
        ProviderError::Unauthorized
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited
    } else if status == StatusCode::SERVICE_UNAVAILABLE {
        ProviderError::Unavailable
    } else {
        ProviderError::Api {
            status: Some(status.as_u16()),
            message: api_error_message(body),
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_string)
}

// Only the fields the parser needs; everything else in the body is ignored.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
