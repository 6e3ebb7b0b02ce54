use std::time::Duration;

use async_trait::async_trait;

use tabletalk_types::{GatewayError, Result};

use crate::{ProviderRequest, RawResponse};

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Executes one provider HTTP call with a bounded timeout.
///
/// Network-level failures (connect, timeout, body read) surface as
/// `UpstreamTransient` immediately; there is no retry here. Non-2xx
/// statuses are not errors at this layer; they come back as a
/// [`RawResponse`] for the error mapper to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProviderRequest, timeout: Duration) -> Result<RawResponse>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Production transport over a single shared `reqwest::Client`.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ProviderRequest, timeout: Duration) -> Result<RawResponse> {
        let provider = request.provider.as_str();

        let mut builder = self.client.post(&request.url).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send().await.map_err(|e| {
            GatewayError::UpstreamTransient {
                provider: provider.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamTransient {
                provider: provider.to_string(),
                message: format!("failed reading response body: {e}"),
            })?;

        Ok(RawResponse { status, body })
    }
}
