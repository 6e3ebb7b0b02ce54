use std::collections::HashMap;
use std::time::Duration;

use crate::{ProviderDescriptor, ProviderKind, PROVIDERS};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Runtime configuration: which providers hold a credential, per-provider
/// model overrides, and the per-call timeout. Built once at process start
/// and read-only afterwards; every call shares it by reference.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    credentials: HashMap<ProviderKind, String>,
    model_overrides: HashMap<ProviderKind, String>,
    request_timeout: Duration,
}

impl GatewayConfig {
    /// Read credentials and overrides from the process environment.
    ///
    /// Credentials: `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `GOOGLE_API_KEY`
    /// (with `GEMINI_API_KEY` accepted as a fallback). Model overrides:
    /// `ANTHROPIC_MODEL`, `OPENAI_MODEL`, `GOOGLE_MODEL`. Timeout:
    /// `TABLETALK_TIMEOUT_SECS`, default 60.
    pub fn from_env() -> Self {
        let mut config = Self::empty();

        for descriptor in PROVIDERS {
            if let Ok(key) = std::env::var(descriptor.credential_env) {
                if !key.is_empty() {
                    config.credentials.insert(descriptor.kind, key);
                }
            }
        }
        // GEMINI_API_KEY is the older name for the Google credential.
        if !config.credentials.contains_key(&ProviderKind::Gemini) {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                if !key.is_empty() {
                    config.credentials.insert(ProviderKind::Gemini, key);
                }
            }
        }

        for (kind, var) in [
            (ProviderKind::Anthropic, "ANTHROPIC_MODEL"),
            (ProviderKind::OpenAi, "OPENAI_MODEL"),
            (ProviderKind::Gemini, "GOOGLE_MODEL"),
        ] {
            if let Ok(model) = std::env::var(var) {
                if !model.is_empty() {
                    config.model_overrides.insert(kind, model);
                }
            }
        }

        if let Some(secs) = std::env::var("TABLETALK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        config
    }

    /// A configuration with no credentials and default timeout.
    pub fn empty() -> Self {
        Self {
            credentials: HashMap::new(),
            model_overrides: HashMap::new(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_credential(mut self, kind: ProviderKind, key: impl Into<String>) -> Self {
        self.credentials.insert(kind, key.into());
        self
    }

    pub fn with_model(mut self, kind: ProviderKind, model: impl Into<String>) -> Self {
        self.model_overrides.insert(kind, model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn api_key_for(&self, kind: ProviderKind) -> Option<&str> {
        self.credentials.get(&kind).map(String::as_str)
    }

    /// The model to request from this provider: the override when set,
    /// otherwise the descriptor's default.
    pub fn model_for(&self, descriptor: &ProviderDescriptor) -> &str {
        self.model_overrides
            .get(&descriptor.kind)
            .map(String::as_str)
            .unwrap_or(descriptor.default_model)
    }

    /// Kinds holding a credential, in catalog priority order.
    pub fn configured_kinds(&self) -> Vec<ProviderKind> {
        PROVIDERS
            .iter()
            .filter(|d| self.credentials.contains_key(&d.kind))
            .map(|d| d.kind)
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
