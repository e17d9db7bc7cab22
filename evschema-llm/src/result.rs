//! The outcome of one parse call.

use evschema_core::EventData;
use serde::Serialize;

use crate::error::ParseEventError;

/// Tagged outcome of [`parse_event_prompt`](crate::parse_event_prompt).
///
/// A success always carries a record whose required fields are non-blank;
/// a failure never carries a record. `raw_response` is the provider text
/// exactly as received, kept on format and validation failures for
/// debugging and absent when the provider produced no text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEventResult {
    /// The provider's reply decoded into a valid record.
    Success {
        /// The decoded record.
        data: EventData,
        /// Provider text the record was decoded from.
        raw_response: String,
    },
    /// The call failed before or after reaching the provider.
    Failure {
        /// What went wrong.
        error: ParseEventError,
        /// Provider text, when the failure happened after receiving some.
        raw_response: Option<String>,
    },
}

impl ParseEventResult {
    pub(crate) fn failure(error: ParseEventError) -> Self {
        Self::Failure {
            error,
            raw_response: None,
        }
    }

    pub(crate) fn failure_with_raw(error: ParseEventError, raw_response: String) -> Self {
        Self::Failure {
            error,
            raw_response: Some(raw_response),
        }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The decoded record, on success.
    #[must_use]
    pub fn data(&self) -> Option<&EventData> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The error, on failure.
    #[must_use]
    pub fn error(&self) -> Option<&ParseEventError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Human-readable failure message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Provider text, when any was received and kept.
    #[must_use]
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Success { raw_response, .. } => Some(raw_response),
            Self::Failure { raw_response, .. } => raw_response.as_deref(),
        }
    }

    /// Convert into a plain `Result`, dropping the raw text.
    ///
    /// # Errors
    /// Returns the failure's [`ParseEventError`].
    pub fn into_result(self) -> Result<EventData, ParseEventError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Render as the interop JSON shape
    /// `{"success", "data"?, "error"?, "rawResponse"?}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let wire = WireResult {
            success: self.is_success(),
            data: self.data(),
            error: self.error_message(),
            raw_response: self.raw_response(),
        };
        // Every field is plain data, so this cannot fail.
        serde_json::to_value(wire).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireResult<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a EventData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_accessors() {
        let result = ParseEventResult::Success {
            data: EventData::new("Jazz Night", "2024-12-20 20:00:00", "Jazz."),
            raw_response: "{}".into(),
        };
        assert!(result.is_success());
        assert_eq!(result.data().map(|d| d.title.as_str()), Some("Jazz Night"));
        assert!(result.error().is_none());
        assert_eq!(result.raw_response(), Some("{}"));
    }

    #[test]
    fn failure_without_raw() {
        let result = ParseEventResult::failure(ParseEventError::EmptyPrompt);
        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert_eq!(result.raw_response(), None);
        assert_eq!(result.error_message().as_deref(), Some("Prompt cannot be empty"));
        assert_eq!(result.into_result(), Err(ParseEventError::EmptyPrompt));
    }

    #[test]
    fn interop_json_shape() {
        let result = ParseEventResult::failure_with_raw(
            ParseEventError::ResponseFormat("expected value".into()),
            "not json".into(),
        );
        assert_eq!(
            result.to_json(),
            json!({
                "success": false,
                "error": "Failed to parse JSON response: expected value",
                "rawResponse": "not json"
            })
        );

        let ok = ParseEventResult::Success {
            data: EventData::new("t", "2024-12-20 20:00:00", "d"),
            raw_response: "{}".into(),
        };
        let value = ok.to_json();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["title"], "t");
        assert!(value.get("error").is_none());
    }
}
