//! Field-by-field decoding of model output into [`EventData`].
//!
//! Model output is untrusted. Required fields must be non-blank JSON strings;
//! optional fields that have the wrong JSON type are dropped rather than
//! failing the whole record. Documented conventions (category enumeration,
//! non-negative price, parseable dates) are enforced according to the
//! [`ValidationPolicy`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};
use crate::types::{EventCategory, EventData, EventLocation, parse_event_datetime};

/// Fields whose absence fails a record, in reporting order.
pub const REQUIRED_FIELDS: [&str; 3] = ["title", "start_date", "description"];

/// How strictly documented field conventions are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Reject unknown categories, negative prices and unparseable dates.
    #[default]
    Strict,
    /// Only the three required fields are checked. Unknown categories
    /// become [`EventCategory::Other`].
    Permissive,
}

/// Decode a raw model response.
///
/// # Errors
/// [`SchemaError::Json`] / [`SchemaError::NotAnObject`] for unusable text,
/// [`SchemaError::MissingRequiredFields`] or [`SchemaError::InvalidField`]
/// for well-formed JSON that fails validation.
pub fn decode_event(text: &str, policy: ValidationPolicy) -> Result<EventData> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SchemaError::Json(e.to_string()))?;
    decode_value(&value, policy)
}

/// Decode an already-parsed JSON value.
///
/// # Errors
/// See [`decode_event`].
pub fn decode_value(value: &Value, policy: ValidationPolicy) -> Result<EventData> {
    let obj = value.as_object().ok_or(SchemaError::NotAnObject)?;

    let mut missing = Vec::new();
    let mut required = |field: &'static str| {
        let v = required_str(obj, field);
        if v.is_none() {
            missing.push(field);
        }
        v.unwrap_or_default()
    };
    let title = required("title");
    let start_date = required("start_date");
    let description = required("description");
    if !missing.is_empty() {
        return Err(SchemaError::MissingRequiredFields(missing));
    }

    let end_date = optional_str(obj, "end_date");
    let ticket_price = decode_price(obj);
    let category = decode_category(obj, policy)?;

    if policy == ValidationPolicy::Strict {
        if parse_event_datetime(&start_date).is_none() {
            return Err(SchemaError::InvalidField {
                field: "start_date",
                reason: format!("'{start_date}' is not a recognised date-time"),
            });
        }
        if let Some(end) = end_date.as_deref() {
            if parse_event_datetime(end).is_none() {
                return Err(SchemaError::InvalidField {
                    field: "end_date",
                    reason: format!("'{end}' is not a recognised date-time"),
                });
            }
        }
        if let Some(price) = ticket_price {
            if !price.is_finite() || price < 0.0 {
                return Err(SchemaError::InvalidField {
                    field: "ticket_price",
                    reason: format!("{price} must be a non-negative amount"),
                });
            }
        }
    }

    Ok(EventData {
        title,
        start_date,
        end_date,
        location: optional_str(obj, "location"),
        location_details: decode_location(obj),
        ticket_price,
        currency: optional_str(obj, "currency"),
        category,
        description,
        timezone: optional_str(obj, "timezone"),
        tags: decode_tags(obj),
        image_search_query: optional_str(obj, "image_search_query"),
    })
}

fn required_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn optional_str(obj: &Map<String, Value>, field: &'static str) -> Option<String> {
    match obj.get(field)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => {
            debug!(
                field,
                kind = json_kind(other),
                "Dropping optional field with unexpected type"
            );
            None
        }
    }
}

fn decode_price(obj: &Map<String, Value>) -> Option<f64> {
    match obj.get("ticket_price")? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let parsed = s
                .trim()
                .trim_start_matches('$')
                .parse::<f64>()
                .ok()
                .filter(|price| price.is_finite());
            if parsed.is_none() {
                debug!(value = %s, "Dropping unparseable ticket_price");
            }
            parsed
        }
        other => {
            debug!(kind = json_kind(other), "Dropping ticket_price with unexpected type");
            None
        }
    }
}

fn decode_category(
    obj: &Map<String, Value>,
    policy: ValidationPolicy,
) -> Result<Option<EventCategory>> {
    let Some(raw) = optional_str(obj, "category") else {
        return Ok(None);
    };
    match raw.parse::<EventCategory>() {
        Ok(category) => Ok(Some(category)),
        Err(reason) => match policy {
            ValidationPolicy::Strict => Err(SchemaError::InvalidField {
                field: "category",
                reason,
            }),
            ValidationPolicy::Permissive => {
                warn!(category = %raw, "Unknown category, falling back to OTHER");
                Ok(Some(EventCategory::Other))
            }
        },
    }
}

fn decode_tags(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            debug!(kind = json_kind(other), "Dropping tags with unexpected type");
            Vec::new()
        }
    }
}

fn decode_location(obj: &Map<String, Value>) -> Option<EventLocation> {
    let details = obj.get("location_details")?.as_object()?;
    let location = EventLocation {
        venue_name: optional_str(details, "venue_name"),
        address_line_1: optional_str(details, "address_line_1"),
        address_line_2: optional_str(details, "address_line_2"),
        city: optional_str(details, "city"),
        state_or_region: optional_str(details, "state_or_region"),
        country: optional_str(details, "country"),
        zip_or_postal_code: optional_str(details, "zip_or_postal_code"),
    };
    (!location.is_empty()).then_some(location)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
