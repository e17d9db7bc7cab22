//! Error types for event decoding and validation.

use thiserror::Error;

/// Why a model response could not be turned into an [`EventData`](crate::EventData).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The text is not valid JSON.
    #[error("Failed to parse JSON response: {0}")]
    Json(String),

    /// The text is valid JSON but not a single object.
    #[error("Failed to parse JSON response: expected a JSON object")]
    NotAnObject,

    /// One or more of `title`, `start_date`, `description` is absent or blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    /// A field is present but violates the active validation policy.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Offending field name.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

impl SchemaError {
    /// Whether the response was unusable as JSON at all (as opposed to
    /// well-formed JSON that failed validation).
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::NotAnObject)
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SchemaError>;
