//! # evschema-core
//!
//! The event record schema shared by every evschema component.
//!
//! An LLM is asked to describe an event as a single JSON object. This crate
//! owns the shape of that object and the rules for turning untrusted model
//! output into a typed [`EventData`]:
//!
//! - **Types** — [`EventData`], [`EventLocation`], [`EventCategory`]
//! - **Decoding** — explicit field-by-field decode with typed optionality
//!   ([`decode_event`], [`decode_value`])
//! - **Policy** — how strictly documented conventions are enforced
//!   ([`ValidationPolicy`])
//!
//! Nothing here performs I/O.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod error;
pub mod types;

pub use decode::{ValidationPolicy, decode_event, decode_value};
pub use error::SchemaError;
pub use types::{EventCategory, EventData, EventLocation};
