use tabletalk_types::{GatewayError, Result};

use crate::{anthropic, gemini, openai, ChatRequest, ProviderDescriptor, ProviderKind, ProviderRequest};

/// Fixed client identifier attached to every built request, for upstream
/// traceability. A constant, so the builder stays deterministic.
pub(crate) const USER_AGENT: &str = concat!("tabletalk/", env!("CARGO_PKG_VERSION"));

/// Rough token estimate used to bound decoded-text prompts: one token per
/// four bytes of UTF-8.
const BYTES_PER_TOKEN: usize = 4;

// ---------------------------------------------------------------------------
// build: dispatch over the closed provider set
// ---------------------------------------------------------------------------

/// Turn a [`ChatRequest`] into the selected provider's HTTP request.
///
/// Pure data transformation: no I/O, no clock, no randomness. Identical
/// inputs produce byte-identical bodies and header lists.
pub fn build(
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
    api_key: &str,
    model: &str,
) -> Result<ProviderRequest> {
    match descriptor.kind {
        ProviderKind::Anthropic => anthropic::build_request(descriptor, request, api_key, model),
        ProviderKind::OpenAi => openai::build_request(descriptor, request, api_key, model),
        ProviderKind::Gemini => gemini::build_request(descriptor, request, api_key, model),
    }
}

// ---------------------------------------------------------------------------
// Shared decoded-text helpers
// ---------------------------------------------------------------------------

/// Decode the CSV bytes as UTF-8 for a decoded-text provider. Failure is a
/// caller error, reported before any network call.
pub(crate) fn decoded_csv_text(
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
) -> Result<String> {
    String::from_utf8(request.csv_bytes.clone()).map_err(|_| GatewayError::UpstreamBadRequest {
        provider: descriptor.kind.as_str().to_string(),
        message: format!(
            "unable to decode CSV file '{}' as UTF-8",
            request.csv_file_name
        ),
    })
}

/// Reject a prompt whose estimated token count exceeds the descriptor's
/// context window. Rejection, never truncation: a silently truncated file
/// would produce confidently wrong answers.
pub(crate) fn ensure_within_context(
    descriptor: &ProviderDescriptor,
    prompt: &str,
) -> Result<()> {
    let estimated_tokens = prompt.len() / BYTES_PER_TOKEN;
    if estimated_tokens > descriptor.max_context_tokens {
        return Err(GatewayError::PayloadTooLarge {
            message: format!(
                "decoded CSV prompt of ~{estimated_tokens} tokens exceeds the {} context window of {} tokens",
                descriptor.kind, descriptor.max_context_tokens
            ),
        });
    }
    Ok(())
}
