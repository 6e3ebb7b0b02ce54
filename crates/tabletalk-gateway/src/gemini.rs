use serde_json::json;

use tabletalk_types::Result;

use crate::builder::{decoded_csv_text, ensure_within_context, USER_AGENT};
use crate::{ChatRequest, ProviderDescriptor, ProviderRequest};

const MAX_OUTPUT_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.7;

// ---------------------------------------------------------------------------
// Request building (ChatRequest → generateContent JSON)
// ---------------------------------------------------------------------------

/// Decoded-text embedding into a single `generateContent` part. The model
/// name is substituted into the endpoint template; the API key travels in
/// the `x-goog-api-key` header, never in the URL.
pub(crate) fn build_request(
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
    api_key: &str,
    model: &str,
) -> Result<ProviderRequest> {
    let csv_text = decoded_csv_text(descriptor, request)?;
    let prompt = format!(
        "Analyze this CSV data from file '{}' and answer the question.\n\nCSV Data:\n{}\n\nQuestion: {}\n\nProvide a comprehensive analysis and answer.",
        request.csv_file_name, csv_text, request.question
    );
    ensure_within_context(descriptor, &prompt)?;

    let body = json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt }
                ]
            }
        ],
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE
        }
    });

    Ok(ProviderRequest {
        provider: descriptor.kind,
        url: descriptor.endpoint_template.replace("{model}", model),
        headers: vec![
            ("x-goog-api-key".to_string(), api_key.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ],
        body,
    })
}

// ---------------------------------------------------------------------------
// Answer extraction (generateContent JSON → answer text)
// ---------------------------------------------------------------------------

/// The answer is the concatenation of the first candidate's text parts.
pub(crate) fn extract_answer(body: &serde_json::Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text_parts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text_parts.is_empty() {
        return None;
    }
    Some(text_parts.concat())
}
