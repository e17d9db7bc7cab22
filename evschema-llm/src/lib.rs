//! # evschema-llm — natural language to structured events
//!
//! Sends a free-text event description to an OpenAI-compatible
//! chat-completion endpoint and returns a validated [`EventData`] record.
//!
//! Every call is one request and one response:
//!   - the fixed [`prompt::EVENT_EXTRACTION_SYSTEM`] instruction plus the
//!     caller's text, with JSON-object output requested
//!   - the reply decoded field by field via [`evschema_core::decode_value`]
//!   - every failure folded into a [`ParseEventResult`], never a panic
//!
//! ```no_run
//! use evschema_llm::{ParseEventOptions, parse_event_prompt};
//!
//! # async fn run() {
//! let options = ParseEventOptions::new(std::env::var("OPENAI_API_KEY").unwrap_or_default());
//! let result = parse_event_prompt(
//!     "Jazz concert in Sydney on December 20th at 8pm, tickets $50",
//!     &options,
//! )
//! .await;
//! if let Some(event) = result.data() {
//!     println!("{} starts {}", event.title, event.start_date);
//! }
//! # }
//! ```
//!
//! No retries, no streaming, no caching: callers own those policies.

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod result;
pub mod types;

pub use config::ParserConfig;
pub use error::{ErrorKind, ParseEventError, ProviderError};
pub use evschema_core::{EventCategory, EventData, EventLocation, ValidationPolicy};
pub use parser::{parse_event_prompt, parse_event_prompt_with};
pub use provider::{CompletionProvider, OpenAiProvider};
pub use result::ParseEventResult;
pub use types::{ChatMessage, ChatRole, CompletionRequest, ParseEventOptions};
