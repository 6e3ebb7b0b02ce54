use std::sync::Arc;

use tabletalk_types::{GatewayError, Result};

use crate::{
    build, map_error, normalize, select, ChatAnswer, ChatRequest, GatewayConfig, HttpTransport,
    Transport,
};

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// The call pipeline: select → build → send → normalize or map.
///
/// Holds no mutable state; concurrent calls share only the immutable
/// catalog and configuration, so the whole thing sits behind an `Arc` in
/// the server with no locking. One provider per call, no fallback, no
/// retry: a failed call returns its error and nothing else happens.
pub struct Gateway {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Swap the transport; tests use this to substitute canned responses.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Answer one question about one CSV file.
    pub async fn answer_question(&self, request: ChatRequest) -> Result<ChatAnswer> {
        let descriptor = select(&self.config, request.csv_bytes.len())?;
        let api_key = self
            .config
            .api_key_for(descriptor.kind)
            .ok_or(GatewayError::NoProviderConfigured)?;
        let model = self.config.model_for(descriptor).to_string();

        let provider_request = build(descriptor, &request, api_key, &model)?;

        tracing::info!(
            provider = %descriptor.kind,
            model = %model,
            file = %request.csv_file_name,
            bytes = request.csv_bytes.len(),
            "dispatching chat request"
        );

        let raw = self
            .transport
            .send(&provider_request, self.config.request_timeout())
            .await?;

        if (200..300).contains(&raw.status) {
            let answer = normalize(descriptor, &model, &raw)?;
            tracing::info!(
                provider = %descriptor.kind,
                answer_chars = answer.answer_text.len(),
                "chat request answered"
            );
            Ok(answer)
        } else {
            let err = map_error(descriptor, raw.status, &raw.body);
            tracing::warn!(
                provider = %descriptor.kind,
                status = raw.status,
                error = %err,
                "chat request failed upstream"
            );
            Err(err)
        }
    }
}
