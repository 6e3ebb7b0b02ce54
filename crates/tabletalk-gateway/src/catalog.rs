use tabletalk_types::{GatewayError, Result};

use crate::GatewayConfig;

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// The closed set of supported providers. Adding a provider means adding a
/// variant here, a row to [`PROVIDERS`], and one builder/extractor module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "google",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EmbeddingStrategy
// ---------------------------------------------------------------------------

/// How the CSV payload travels to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingStrategy {
    /// Base64 document block the model ingests directly.
    NativeDocument,
    /// File bytes decoded as UTF-8 and inlined into the prompt text.
    DecodedText,
}

// ---------------------------------------------------------------------------
// ProviderDescriptor
// ---------------------------------------------------------------------------

/// Static description of one provider. Immutable; the table below is the
/// only place descriptors are created.
#[derive(Debug)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    pub credential_env: &'static str,
    pub embedding: EmbeddingStrategy,
    /// Endpoint URL; may contain a `{model}` placeholder.
    pub endpoint_template: &'static str,
    pub default_model: &'static str,
    pub max_payload_bytes: usize,
    pub max_context_tokens: usize,
}

/// The provider catalog in fixed priority order: native-document providers
/// first. The selector walks this slice top to bottom.
pub const PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        kind: ProviderKind::Anthropic,
        credential_env: "ANTHROPIC_API_KEY",
        embedding: EmbeddingStrategy::NativeDocument,
        endpoint_template: "https://api.anthropic.com/v1/messages",
        default_model: "claude-sonnet-4-5-20250929",
        max_payload_bytes: 4 * 1024 * 1024,
        max_context_tokens: 200_000,
    },
    ProviderDescriptor {
        kind: ProviderKind::OpenAi,
        credential_env: "OPENAI_API_KEY",
        embedding: EmbeddingStrategy::DecodedText,
        endpoint_template: "https://api.openai.com/v1/chat/completions",
        default_model: "gpt-4o",
        max_payload_bytes: 2 * 1024 * 1024,
        max_context_tokens: 128_000,
    },
    ProviderDescriptor {
        kind: ProviderKind::Gemini,
        credential_env: "GOOGLE_API_KEY",
        embedding: EmbeddingStrategy::DecodedText,
        endpoint_template:
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
        default_model: "gemini-2.5-pro",
        max_payload_bytes: 8 * 1024 * 1024,
        max_context_tokens: 1_000_000,
    },
];

/// The full catalog in priority order.
pub fn providers() -> &'static [ProviderDescriptor] {
    PROVIDERS
}

/// Look up a descriptor by kind.
pub fn descriptor_for(kind: ProviderKind) -> &'static ProviderDescriptor {
    PROVIDERS
        .iter()
        .find(|d| d.kind == kind)
        .expect("every ProviderKind has a catalog row")
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Choose exactly one provider for a payload of `csv_size_bytes`.
///
/// Walks the catalog in priority order, skipping descriptors without a
/// credential; the first size-compatible credentialed descriptor wins. With
/// no credentialed descriptors at all the failure is `NoProviderConfigured`;
/// with credentialed descriptors that all reject the size it is
/// `PayloadTooLarge`. No fallback happens after this point: one descriptor
/// per call, deterministically.
pub fn select(
    config: &GatewayConfig,
    csv_size_bytes: usize,
) -> Result<&'static ProviderDescriptor> {
    let mut saw_credentialed = false;

    for descriptor in PROVIDERS {
        if config.api_key_for(descriptor.kind).is_none() {
            continue;
        }
        saw_credentialed = true;
        if csv_size_bytes <= descriptor.max_payload_bytes {
            return Ok(descriptor);
        }
    }

    if saw_credentialed {
        Err(GatewayError::PayloadTooLarge {
            message: format!(
                "{csv_size_bytes} bytes exceeds every configured provider's file size limit"
            ),
        })
    } else {
        Err(GatewayError::NoProviderConfigured)
    }
}
