use serde_json::json;

use tabletalk_types::Result;

use crate::builder::{decoded_csv_text, ensure_within_context, USER_AGENT};
use crate::{ChatRequest, ProviderDescriptor, ProviderRequest};

const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.7;
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes CSV data and answers questions about it.";

// ---------------------------------------------------------------------------
// Request building (ChatRequest → Chat Completions JSON)
// ---------------------------------------------------------------------------

/// Decoded-text embedding: the CSV is decoded as UTF-8 and inlined into the
/// user prompt. Decode failure and context overflow are both reported
/// before any network call.
pub(crate) fn build_request(
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
    api_key: &str,
    model: &str,
) -> Result<ProviderRequest> {
    let csv_text = decoded_csv_text(descriptor, request)?;
    let user_prompt = format!(
        "Here is CSV data from file '{}':\n\n{}\n\nQuestion: {}\n\nPlease analyze the data and provide a comprehensive answer.",
        request.csv_file_name, csv_text, request.question
    );
    ensure_within_context(descriptor, &user_prompt)?;

    let body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt }
        ],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE
    });

    Ok(ProviderRequest {
        provider: descriptor.kind,
        url: descriptor.endpoint_template.to_string(),
        headers: vec![
            ("authorization".to_string(), format!("Bearer {api_key}")),
            ("content-type".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ],
        body,
    })
}

// ---------------------------------------------------------------------------
// Answer extraction (Chat Completions JSON → answer text)
// ---------------------------------------------------------------------------

pub(crate) fn extract_answer(body: &serde_json::Value) -> Option<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}
