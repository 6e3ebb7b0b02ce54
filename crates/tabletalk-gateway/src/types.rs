use serde::Serialize;

use crate::ProviderKind;

// ---------------------------------------------------------------------------
// ChatRequest
// ---------------------------------------------------------------------------

/// One inbound question about one CSV file. Created per call, owned by the
/// call, dropped when the call completes.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub csv_bytes: Vec<u8>,
    pub csv_file_name: String,
    pub question: String,
}

impl ChatRequest {
    pub fn new(
        csv_bytes: impl Into<Vec<u8>>,
        csv_file_name: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            csv_bytes: csv_bytes.into(),
            csv_file_name: csv_file_name.into(),
            question: question.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderRequest
// ---------------------------------------------------------------------------

/// A fully built provider-specific HTTP request, ready for the transport.
/// Headers are an ordered list so two identical builds serialize
/// identically.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub provider: ProviderKind,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// RawResponse
// ---------------------------------------------------------------------------

/// What the transport hands back: status and body, no interpretation.
/// Non-2xx statuses are data here, not errors; the error mapper decides.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

// ---------------------------------------------------------------------------
// ChatAnswer
// ---------------------------------------------------------------------------

/// The normalized success result, identical in shape for every provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub answer_text: String,
    pub provider_used: String,
    pub model_used: String,
}
