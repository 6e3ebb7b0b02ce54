//! Shared error taxonomy for the tabletalk gateway and server.
//!
//! Every failure inside the gateway is returned as a `GatewayError` value,
//! never raised as a panic: provider responses are untrusted input and must
//! not be able to take the process down.

/// Unified error type for the gateway pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No provider has a credential in the runtime configuration.
    #[error("no LLM provider is configured")]
    NoProviderConfigured,

    /// The payload does not fit any configured provider, or the decoded
    /// text does not fit the selected provider's context window.
    #[error("payload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("authentication rejected by {provider}: {message}")]
    UpstreamAuth { provider: String, message: String },

    #[error("rate limited by {provider}: {message}")]
    UpstreamRateLimited { provider: String, message: String },

    #[error("{provider} rejected the request: {message}")]
    UpstreamBadRequest { provider: String, message: String },

    #[error("transient failure reaching {provider}: {message}")]
    UpstreamTransient { provider: String, message: String },

    #[error("could not extract an answer from the {provider} response: {message}")]
    UpstreamUnparsable { provider: String, message: String },
}

impl GatewayError {
    /// The provider this error is attributed to, when there is one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            GatewayError::NoProviderConfigured | GatewayError::PayloadTooLarge { .. } => None,
            GatewayError::UpstreamAuth { provider, .. }
            | GatewayError::UpstreamRateLimited { provider, .. }
            | GatewayError::UpstreamBadRequest { provider, .. }
            | GatewayError::UpstreamTransient { provider, .. }
            | GatewayError::UpstreamUnparsable { provider, .. } => Some(provider),
        }
    }

    /// Returns `true` if the same call may succeed on retry. The gateway
    /// itself never retries; this is advisory for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::UpstreamRateLimited { .. } | GatewayError::UpstreamTransient { .. }
        )
    }

    /// Maps the error to the HTTP status the route layer serves.
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::NoProviderConfigured => 500,
            GatewayError::PayloadTooLarge { .. } => 400,
            GatewayError::UpstreamAuth { .. } => 500,
            GatewayError::UpstreamRateLimited { .. } => 429,
            GatewayError::UpstreamBadRequest { .. } => 400,
            GatewayError::UpstreamTransient { .. } => 502,
            GatewayError::UpstreamUnparsable { .. } => 500,
        }
    }
}

/// A convenience alias for `Result<T, GatewayError>`.
pub type Result<T> = std::result::Result<T, GatewayError>;
