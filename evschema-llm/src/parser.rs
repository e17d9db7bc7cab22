//! Parse-and-validate: free text in, [`ParseEventResult`] out.

use std::time::Instant;

use evschema_core::decode_value;
use tracing::{Instrument, Span, debug, info_span, warn};

use crate::error::ParseEventError;
use crate::provider::{CompletionProvider, OpenAiProvider};
use crate::result::ParseEventResult;
use crate::types::{CompletionRequest, ParseEventOptions};

/// Parse a natural-language event description with the OpenAI-compatible
/// endpoint named in `options`.
///
/// A fresh HTTP client is built for this call and dropped when it returns;
/// nothing is shared between calls. Never panics and never returns an
/// error out of band: every failure is a [`ParseEventResult::Failure`].
pub async fn parse_event_prompt(prompt: &str, options: &ParseEventOptions) -> ParseEventResult {
    if let Err(error) = check_preconditions(prompt, options) {
        return ParseEventResult::failure(error);
    }
    let provider = match OpenAiProvider::from_options(options) {
        Ok(provider) => provider,
        Err(err) => return ParseEventResult::failure(err.into()),
    };
    run(&provider, prompt, options).instrument(call_span(options)).await
}

/// Same as [`parse_event_prompt`] with a caller-supplied provider.
///
/// The credential in `options` is still required, so a call that would
/// fail against the real endpoint also fails here before reaching
/// `provider`.
pub async fn parse_event_prompt_with<P: CompletionProvider>(
    provider: &P,
    prompt: &str,
    options: &ParseEventOptions,
) -> ParseEventResult {
    if let Err(error) = check_preconditions(prompt, options) {
        return ParseEventResult::failure(error);
    }
    run(provider, prompt, options).instrument(call_span(options)).await
}

fn call_span(options: &ParseEventOptions) -> Span {
    info_span!("parse_event", model = options.model())
}

async fn run<P: CompletionProvider>(
    provider: &P,
    prompt: &str,
    options: &ParseEventOptions,
) -> ParseEventResult {
    let request = CompletionRequest::event_extraction(prompt, options);
    debug!(
        temperature = request.temperature,
        max_tokens = request.max_tokens,
        prompt_len = prompt.len(),
        "Dispatching extraction request"
    );

    let start = Instant::now();
    let content = match provider.complete(&request).await {
        Ok(content) => content,
        Err(err) => {
            warn!(error = %err, "Completion provider failed");
            return ParseEventResult::failure(err.into());
        }
    };
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(elapsed_ms, "Provider call finished");

    let Some(raw) = content.filter(|text| !text.is_empty()) else {
        warn!("Provider returned no content");
        return ParseEventResult::failure(ParseEventError::ResponseEmpty);
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, raw_len = raw.len(), "Provider content is not JSON");
            return ParseEventResult::failure_with_raw(
                ParseEventError::ResponseFormat(e.to_string()),
                raw,
            );
        }
    };

    match decode_value(&value, options.policy) {
        Ok(data) => ParseEventResult::Success {
            data,
            raw_response: raw,
        },
        Err(err) => {
            warn!(error = %err, "Provider content failed validation");
            ParseEventResult::failure_with_raw(err.into(), raw)
        }
    }
}

fn check_preconditions(prompt: &str, options: &ParseEventOptions) -> Result<(), ParseEventError> {
    if options.api_key.trim().is_empty() {
        return Err(ParseEventError::MissingCredential);
    }
    if prompt.trim().is_empty() {
        return Err(ParseEventError::EmptyPrompt);
    }
    Ok(())
}
