use tabletalk_types::GatewayError;

use crate::ProviderDescriptor;

// ---------------------------------------------------------------------------
// Error mapping (non-2xx status + body → GatewayError)
// ---------------------------------------------------------------------------

/// Classify a provider-reported failure. One table serves all providers:
/// Anthropic, OpenAI, and Gemini all report failures under the same
/// `{"error": {"message": ...}}` shape, and the status semantics line up.
pub fn map_error(descriptor: &ProviderDescriptor, status: u16, body: &str) -> GatewayError {
    let provider = descriptor.kind.as_str().to_string();
    let message = extract_error_message(body);

    match status {
        401 | 403 => GatewayError::UpstreamAuth { provider, message },
        429 => GatewayError::UpstreamRateLimited { provider, message },
        413 => GatewayError::UpstreamBadRequest {
            provider,
            message: format!("payload too large: {message}"),
        },
        400 => GatewayError::UpstreamBadRequest { provider, message },
        s if s >= 500 => GatewayError::UpstreamTransient {
            provider,
            message: format!("HTTP {s}: {message}"),
        },
        s => GatewayError::UpstreamBadRequest {
            provider,
            message: format!("HTTP {s}: {message}"),
        },
    }
}

/// Pull the provider's own error text out of the body when it parses;
/// otherwise carry the raw body for debuggability.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}
