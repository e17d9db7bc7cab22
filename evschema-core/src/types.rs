//! Core types for structured event records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Assumed event length when no `end_date` is given.
pub const DEFAULT_EVENT_DURATION_HOURS: i64 = 3;

/// Naive formats accepted for `start_date` / `end_date`, tried in order
/// after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

/// ISO-8601 forms RFC 3339 does not cover: minute precision, offsets
/// without a colon, and the basic (separator-free) layout.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

// ---------------------------------------------------------------------------
// EventCategory
// ---------------------------------------------------------------------------

/// Fixed category enumeration an event is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventCategory {
    /// Concerts, gigs, recitals.
    Music,
    /// Matches, races, tournaments.
    Sports,
    /// Networking and corporate events.
    Business,
    /// Classes, lectures, courses.
    Education,
    /// Tastings, markets, dinners.
    Food,
    /// Exhibitions, theatre, performance art.
    Arts,
    /// Multi-act or multi-day festivals.
    Festival,
    /// Talks and multi-track conferences.
    Conference,
    /// Hands-on sessions.
    Workshop,
    /// Anything else.
    Other,
}

impl EventCategory {
    /// Every category, in the order the extraction prompt lists them.
    pub const ALL: [EventCategory; 10] = [
        Self::Music,
        Self::Sports,
        Self::Business,
        Self::Education,
        Self::Food,
        Self::Arts,
        Self::Festival,
        Self::Conference,
        Self::Workshop,
        Self::Other,
    ];

    /// Upper-case wire name, e.g. `"MUSIC"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Music => "MUSIC",
            Self::Sports => "SPORTS",
            Self::Business => "BUSINESS",
            Self::Education => "EDUCATION",
            Self::Food => "FOOD",
            Self::Arts => "ARTS",
            Self::Festival => "FESTIVAL",
            Self::Conference => "CONFERENCE",
            Self::Workshop => "WORKSHOP",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown event category: '{needle}'"))
    }
}

// ---------------------------------------------------------------------------
// EventLocation
// ---------------------------------------------------------------------------

/// Structured breakdown of where an event takes place.
///
/// Every field is independently optional; `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLocation {
    /// Venue name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    /// First street address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    /// Second street address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State, province or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_or_region: Option<String>,
    /// Two-letter country code (e.g. `US`, `AU`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Zip or postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_or_postal_code: Option<String>,
}

impl EventLocation {
    /// True when no field is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ---------------------------------------------------------------------------
// EventData
// ---------------------------------------------------------------------------

/// The canonical structured event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// Event title. Never blank.
    pub title: String,
    /// Start as `YYYY-MM-DD HH:MM:SS` or ISO-8601. Never blank.
    pub start_date: String,
    /// End, same formats as `start_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Free-form "City, Region".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Structured location breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_details: Option<EventLocation>,
    /// Ticket price; `0` for free events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    /// ISO 4217 currency code, e.g. `AUD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Event category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    /// Event description. Never blank.
    pub description: String,
    /// IANA zone name, e.g. `Australia/Sydney`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short phrase for finding a banner image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_search_query: Option<String>,
}

impl EventData {
    /// Create a record with only the required fields set.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            end_date: None,
            location: None,
            location_details: None,
            ticket_price: None,
            currency: None,
            category: None,
            description: description.into(),
            timezone: None,
            tags: Vec::new(),
            image_search_query: None,
        }
    }

    /// Parsed `start_date` as wall-clock time.
    #[must_use]
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        parse_event_datetime(&self.start_date)
    }

    /// Parsed `end_date`, if present and well-formed.
    #[must_use]
    pub fn end_datetime(&self) -> Option<NaiveDateTime> {
        self.end_date.as_deref().and_then(parse_event_datetime)
    }

    /// Explicit end, or start plus [`DEFAULT_EVENT_DURATION_HOURS`].
    #[must_use]
    pub fn effective_end_datetime(&self) -> Option<NaiveDateTime> {
        self.end_datetime().or_else(|| {
            self.start_datetime()?
                .checked_add_signed(TimeDelta::hours(DEFAULT_EVENT_DURATION_HOURS))
        })
    }

    /// Resolve `timezone` against the IANA database.
    #[must_use]
    pub fn tz(&self) -> Option<Tz> {
        self.timezone.as_deref()?.trim().parse::<Tz>().ok()
    }

    /// Whether the event is explicitly free.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.ticket_price == Some(0.0)
    }
}

/// Parse an event date-time string.
///
/// Accepts RFC 3339 and the other common ISO-8601 offset forms (wall time
/// in the given offset is kept), the naive `YYYY-MM-DD HH:MM[:SS]` /
/// `T`-separated forms, and a bare `YYYY-MM-DD` which maps to midnight.
#[must_use]
pub fn parse_event_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid fixture")
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("music".parse::<EventCategory>(), Ok(EventCategory::Music));
        assert_eq!(" Workshop ".parse::<EventCategory>(), Ok(EventCategory::Workshop));
        assert!("concert".parse::<EventCategory>().is_err());
    }

    #[test]
    fn category_display_round_trip() {
        for c in EventCategory::ALL {
            assert_eq!(c.to_string().parse::<EventCategory>(), Ok(c));
        }
    }

    #[test]
    fn category_serializes_upper_case() {
        let json = serde_json::to_string(&EventCategory::Festival).expect("serialize");
        assert_eq!(json, "\"FESTIVAL\"");
    }

    #[test]
    fn parses_space_separated_datetime() {
        assert_eq!(
            parse_event_datetime("2024-12-20 20:00:00"),
            Some(dt("2024-12-20 20:00:00"))
        );
    }

    #[test]
    fn parses_iso_forms() {
        assert_eq!(
            parse_event_datetime("2024-12-20T20:00:00"),
            Some(dt("2024-12-20 20:00:00"))
        );
        assert_eq!(
            parse_event_datetime("2024-12-20T20:00:00+11:00"),
            Some(dt("2024-12-20 20:00:00"))
        );
        assert_eq!(
            parse_event_datetime("2024-12-20T09:00:00Z"),
            Some(dt("2024-12-20 09:00:00"))
        );
        assert_eq!(
            parse_event_datetime("2024-12-20"),
            Some(dt("2024-12-20 00:00:00"))
        );
    }

    #[test]
    fn parses_iso_forms_outside_rfc3339() {
        let cases = [
            ("2024-12-20T20:00+11:00", "2024-12-20 20:00:00"),
            ("2024-12-20T20:00:00+1100", "2024-12-20 20:00:00"),
            ("2024-12-20T20:00:00.250-0500", "2024-12-20 20:00:00"),
            ("2024-12-20 20:00+00:00", "2024-12-20 20:00:00"),
            ("20241220T200000Z", "2024-12-20 20:00:00"),
            ("20241220T200000+0100", "2024-12-20 20:00:00"),
            ("20241220T200000", "2024-12-20 20:00:00"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                parse_event_datetime(input).and_then(|d| d.with_nanosecond(0)),
                Some(dt(expected)),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_event_datetime("next Friday"), None);
        assert_eq!(parse_event_datetime(""), None);
        assert_eq!(parse_event_datetime("2024-13-40 25:00:00"), None);
    }

    #[test]
    fn end_defaults_to_three_hours_after_start() {
        let event = EventData::new("Jazz Night", "2024-12-20 20:00:00", "Jazz.");
        assert_eq!(event.end_datetime(), None);
        assert_eq!(event.effective_end_datetime(), Some(dt("2024-12-20 23:00:00")));
    }

    #[test]
    fn explicit_end_wins() {
        let mut event = EventData::new("Jazz Night", "2024-12-20 20:00:00", "Jazz.");
        event.end_date = Some("2024-12-21 01:30:00".into());
        assert_eq!(event.effective_end_datetime(), Some(dt("2024-12-21 01:30:00")));
    }

    #[test]
    fn timezone_resolves_iana_names() {
        let mut event = EventData::new("t", "2024-12-20 20:00:00", "d");
        event.timezone = Some("Australia/Sydney".into());
        assert_eq!(event.tz(), Some(chrono_tz::Australia::Sydney));
        event.timezone = Some("Sydney time".into());
        assert_eq!(event.tz(), None);
    }

    #[test]
    fn free_event_detection() {
        let mut event = EventData::new("t", "2024-12-20 20:00:00", "d");
        assert!(!event.is_free());
        event.ticket_price = Some(0.0);
        assert!(event.is_free());
    }

    #[test]
    fn serialization_omits_unknown_fields() {
        let event = EventData::new("Jazz Night", "2024-12-20 20:00:00", "Jazz.");
        let value = serde_json::to_value(&event).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 4, "title, start_date, description, tags: {obj:?}");
        assert!(obj.contains_key("tags"));
        assert!(!obj.contains_key("end_date"));
    }

    #[test]
    fn empty_location_detection() {
        assert!(EventLocation::default().is_empty());
        let loc = EventLocation {
            city: Some("Sydney".into()),
            ..EventLocation::default()
        };
        assert!(!loc.is_empty());
    }
}
