use base64::Engine;
use serde_json::json;

use tabletalk_types::Result;

use crate::builder::USER_AGENT;
use crate::{ChatRequest, ProviderDescriptor, ProviderRequest};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1500;

// ---------------------------------------------------------------------------
// Request building (ChatRequest → Anthropic Messages JSON)
// ---------------------------------------------------------------------------

/// Native-document embedding: the CSV travels as a base64 document block
/// with media type `text/csv`, next to the question as a text block. The
/// model reads the file directly; nothing is decoded on our side.
pub(crate) fn build_request(
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
    api_key: &str,
    model: &str,
) -> Result<ProviderRequest> {
    let file_base64 = base64::engine::general_purpose::STANDARD.encode(&request.csv_bytes);

    let body = json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "messages": [
            {
                "role": "user",
                "content": [
                    {
                        "type": "text",
                        "text": format!(
                            "I have uploaded a CSV file named '{}'. Please analyze this data and answer the following question: {}",
                            request.csv_file_name, request.question
                        )
                    },
                    {
                        "type": "document",
                        "source": {
                            "type": "base64",
                            "media_type": "text/csv",
                            "data": file_base64
                        }
                    }
                ]
            }
        ]
    });

    Ok(ProviderRequest {
        provider: descriptor.kind,
        url: descriptor.endpoint_template.to_string(),
        headers: vec![
            ("x-api-key".to_string(), api_key.to_string()),
            ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ],
        body,
    })
}

// ---------------------------------------------------------------------------
// Answer extraction (Anthropic JSON → answer text)
// ---------------------------------------------------------------------------

/// The answer is the concatenation of the `content` array's text blocks.
pub(crate) fn extract_answer(body: &serde_json::Value) -> Option<String> {
    let content = body["content"].as_array()?;
    let text_parts: Vec<&str> = content
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();
    if text_parts.is_empty() {
        return None;
    }
    Some(text_parts.concat())
}
