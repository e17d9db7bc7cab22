//! Error types for provider calls and event parsing.

use evschema_core::SchemaError;
use thiserror::Error;

/// Failure reported by a [`CompletionProvider`](crate::CompletionProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The credential was rejected.
    #[error("provider rejected the credential")]
    Unauthorized,

    /// Request throttled.
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// Provider temporarily down.
    #[error("provider temporarily unavailable")]
    Unavailable,

    /// Any other provider-reported API error.
    #[error("provider API error: {}", .message.as_deref().unwrap_or("<no message>"))]
    Api {
        /// HTTP status, when the provider is HTTP-based.
        status: Option<u16>,
        /// The provider's own message, if it gave one.
        message: Option<String>,
    },

    /// The request never produced a provider answer (DNS, TLS, timeout...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Anything else, e.g. an undecodable success body.
    #[error("unexpected failure: {}", .0.as_deref().unwrap_or("<no message>"))]
    Unexpected(Option<String>),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Unexpected(Some(err.to_string()))
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Coarse classification of a [`ParseEventError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing credential or empty prompt.
    Configuration,
    /// Credential rejected by the provider.
    ProviderAuth,
    /// Provider throttled the request.
    ProviderRateLimit,
    /// Provider temporarily down.
    ProviderUnavailable,
    /// Other provider-reported error.
    ProviderOther,
    /// Provider answered with no content.
    ResponseEmpty,
    /// Content was not a JSON object.
    ResponseFormat,
    /// JSON object failed validation.
    Validation,
    /// Anything else.
    Unknown,
}

/// Why a call to [`parse_event_prompt`](crate::parse_event_prompt) failed.
///
/// The `Display` text is the human-readable message carried by a failed
/// [`ParseEventResult`](crate::ParseEventResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEventError {
    /// Credential was empty.
    #[error("API key/credential is required")]
    MissingCredential,

    /// Prompt was empty after trimming.
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    /// Provider rejected the credential.
    #[error("Invalid API key/credential")]
    ProviderAuth,

    /// Provider rate limit hit.
    #[error("Rate limit exceeded. Please try again later.")]
    ProviderRateLimit,

    /// Provider temporarily unavailable.
    #[error("Provider service temporarily unavailable")]
    ProviderUnavailable,

    /// Other provider-reported error, with its message.
    #[error("{0}")]
    ProviderOther(String),

    /// Provider returned no text.
    #[error("No response from provider")]
    ResponseEmpty,

    /// Content is not a JSON object.
    #[error("Failed to parse JSON response: {0}")]
    ResponseFormat(String),

    /// One or more required fields absent or blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    /// A field violates the validation policy.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Offending field.
        field: &'static str,
        /// Explanation.
        reason: String,
    },

    /// Any failure not matching the above.
    #[error("{0}")]
    Unknown(String),
}

impl ParseEventError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential | Self::EmptyPrompt => ErrorKind::Configuration,
            Self::ProviderAuth => ErrorKind::ProviderAuth,
            Self::ProviderRateLimit => ErrorKind::ProviderRateLimit,
            Self::ProviderUnavailable => ErrorKind::ProviderUnavailable,
            Self::ProviderOther(_) => ErrorKind::ProviderOther,
            Self::ResponseEmpty => ErrorKind::ResponseEmpty,
            Self::ResponseFormat(_) => ErrorKind::ResponseFormat,
            Self::MissingRequiredFields(_) | Self::InvalidField { .. } => ErrorKind::Validation,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl From<ProviderError> for ParseEventError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthorized => Self::ProviderAuth,
            ProviderError::RateLimited => Self::ProviderRateLimit,
            ProviderError::Unavailable => Self::ProviderUnavailable,
            ProviderError::Api { message, .. } => Self::ProviderOther(
                non_blank(message).unwrap_or_else(|| "Unknown provider error".to_string()),
            ),
            ProviderError::Transport(message) => Self::Unknown(
                non_blank(Some(message)).unwrap_or_else(|| "Unknown error occurred".to_string()),
            ),
            ProviderError::Unexpected(message) => Self::Unknown(
                non_blank(message).unwrap_or_else(|| "Unknown error occurred".to_string()),
            ),
        }
    }
}

impl From<SchemaError> for ParseEventError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Json(diag) => Self::ResponseFormat(diag),
            SchemaError::NotAnObject => Self::ResponseFormat("expected a JSON object".to_string()),
            SchemaError::MissingRequiredFields(fields) => Self::MissingRequiredFields(fields),
            SchemaError::InvalidField { field, reason } => Self::InvalidField { field, reason },
        }
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_fixed_messages() {
        assert_eq!(
            ParseEventError::from(ProviderError::Unauthorized).to_string(),
            "Invalid API key/credential"
        );
        assert_eq!(
            ParseEventError::from(ProviderError::RateLimited).to_string(),
            "Rate limit exceeded. Please try again later."
        );
        assert_eq!(
            ParseEventError::from(ProviderError::Unavailable).kind(),
            ErrorKind::ProviderUnavailable
        );
    }

    #[test]
    fn api_error_surfaces_provider_message() {
        let err = ParseEventError::from(ProviderError::Api {
            status: Some(400),
            message: Some("model not found".into()),
        });
        assert_eq!(err.to_string(), "model not found");
        assert_eq!(err.kind(), ErrorKind::ProviderOther);
    }

    #[test]
    fn api_error_without_message_is_generic() {
        let err = ParseEventError::from(ProviderError::Api {
            status: None,
            message: Some("  ".into()),
        });
        assert_eq!(err.to_string(), "Unknown provider error");
    }

    #[test]
    fn unexpected_without_message_is_generic() {
        let err = ParseEventError::from(ProviderError::Unexpected(None));
        assert_eq!(err.to_string(), "Unknown error occurred");
        assert_eq!(err.kind(), ErrorKind::Unknown);

        let err = ParseEventError::from(ProviderError::Transport("connection refused".into()));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn schema_errors_keep_their_bucket() {
        let err =
            ParseEventError::from(SchemaError::Json("expected value at line 1 column 1".into()));
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
        assert_eq!(
            err.to_string(),
            "Failed to parse JSON response: expected value at line 1 column 1"
        );

        let err = ParseEventError::from(SchemaError::MissingRequiredFields(vec!["title"]));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Missing required fields: title");
    }

    #[test]
    fn configuration_errors() {
        assert_eq!(ParseEventError::MissingCredential.kind(), ErrorKind::Configuration);
        assert_eq!(ParseEventError::EmptyPrompt.to_string(), "Prompt cannot be empty");
    }
}
