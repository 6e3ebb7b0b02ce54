use tabletalk_types::{GatewayError, Result};

use crate::{anthropic, gemini, openai, ChatAnswer, ProviderDescriptor, ProviderKind, RawResponse};

// ---------------------------------------------------------------------------
// Normalization (2xx RawResponse → ChatAnswer)
// ---------------------------------------------------------------------------

/// Extract the answer text from a successful provider response.
///
/// Each provider nests the answer differently; the descriptor picks the
/// extraction path. Any shape surprise (non-JSON body, missing field,
/// empty answer) is `UpstreamUnparsable`, never a panic: the body is
/// untrusted input.
pub fn normalize(
    descriptor: &ProviderDescriptor,
    model: &str,
    raw: &RawResponse,
) -> Result<ChatAnswer> {
    let provider = descriptor.kind.as_str();

    let body: serde_json::Value =
        serde_json::from_str(&raw.body).map_err(|e| GatewayError::UpstreamUnparsable {
            provider: provider.to_string(),
            message: format!("response is not valid JSON: {e}"),
        })?;

    let answer = match descriptor.kind {
        ProviderKind::Anthropic => anthropic::extract_answer(&body),
        ProviderKind::OpenAi => openai::extract_answer(&body),
        ProviderKind::Gemini => gemini::extract_answer(&body),
    };

    match answer {
        Some(text) if !text.is_empty() => Ok(ChatAnswer {
            answer_text: text,
            provider_used: provider.to_string(),
            model_used: model.to_string(),
        }),
        _ => Err(GatewayError::UpstreamUnparsable {
            provider: provider.to_string(),
            message: "expected answer field missing from response".to_string(),
        }),
    }
}
