use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use tabletalk_gateway::{providers, ChatRequest};
use tabletalk_types::GatewayError;

use crate::{AppState, MAX_UPLOAD_BYTES};

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub question: String,
    pub answer: String,
    pub file_name: String,
    pub file_size: usize,
    pub provider_used: String,
    pub model_used: String,
}

#[derive(Debug, Serialize)]
pub struct UploadInfo {
    pub max_file_size_mb: u64,
    pub supported_formats: Vec<String>,
    pub description: String,
    pub llm_provider: Option<String>,
    pub available_providers: Vec<String>,
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Route-layer error: a status plus a JSON `{"error": ...}` body. Gateway
/// errors convert via the taxonomy's status table; validation failures are
/// plain 400s with the message the original clients already expect.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self {
            status: StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "message": "tabletalk is running" }))
}

pub(crate) async fn upload_info(State(state): State<AppState>) -> Json<UploadInfo> {
    let configured = state.gateway.config().configured_kinds();
    Json(UploadInfo {
        max_file_size_mb: (MAX_UPLOAD_BYTES / (1024 * 1024)) as u64,
        supported_formats: vec!["csv".to_string()],
        description: "Upload CSV files and ask questions about the data".to_string(),
        llm_provider: configured.first().map(|k| k.as_str().to_string()),
        available_providers: providers()
            .iter()
            .map(|d| d.kind.as_str().to_string())
            .collect(),
    })
}

/// `POST /chat`: multipart form with a `file` part and a `question` part.
pub(crate) async fn chat(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);
    handle_chat(state, multipart).instrument(span).await
}

async fn handle_chat(
    state: AppState,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut question: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed reading file: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("question") => {
                question = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading question: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let (file_name, file_bytes) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No question provided"))?;

    if file_name.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(ApiError::bad_request("Only CSV files are supported"));
    }
    if file_bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request("File size exceeds 16MB limit"));
    }

    let file_size = file_bytes.len();
    tracing::info!(file = %file_name, bytes = file_size, "chat upload accepted");

    let request = ChatRequest::new(file_bytes, file_name.clone(), question.clone());
    let answer = state.gateway.answer_question(request).await?;

    Ok(Json(ChatResponse {
        success: true,
        question,
        answer: answer.answer_text,
        file_name,
        file_size,
        provider_used: answer.provider_used,
        model_used: answer.model_used,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use tabletalk_gateway::{
        Gateway, GatewayConfig, ProviderKind, ProviderRequest, RawResponse, Transport,
    };

    struct StubTransport {
        response: RawResponse,
        calls: Mutex<usize>,
    }

    impl StubTransport {
        fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                response: RawResponse {
                    status,
                    body: body.into(),
                },
                calls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(
            &self,
            _request: &ProviderRequest,
            _timeout: Duration,
        ) -> tabletalk_types::Result<RawResponse> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.response.clone())
        }
    }

    fn app_with(config: GatewayConfig, transport: Arc<StubTransport>) -> axum::Router {
        crate::router(Arc::new(Gateway::with_transport(config, transport)))
    }

    fn app_without_providers() -> axum::Router {
        app_with(GatewayConfig::empty(), StubTransport::new(200, "{}"))
    }

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn multipart_body(file: Option<(&str, &[u8])>, question: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((name, content)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/csv\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(q) = question {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"question\"\r\n\r\n{q}\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn chat_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let app = app_without_providers();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn upload_info_reports_providers() {
        let app = app_with(
            GatewayConfig::empty().with_credential(ProviderKind::OpenAi, "sk-test"),
            StubTransport::new(200, "{}"),
        );
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/upload-info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["max_file_size_mb"], 16);
        assert_eq!(body["llm_provider"], "openai");
        assert_eq!(
            body["available_providers"],
            serde_json::json!(["anthropic", "openai", "google"])
        );
    }

    #[tokio::test]
    async fn chat_happy_path() {
        let app = app_with(
            GatewayConfig::empty().with_credential(ProviderKind::OpenAi, "sk-test"),
            StubTransport::new(
                200,
                serde_json::json!({
                    "choices": [{"message": {"content": "There are 2 rows."}}]
                })
                .to_string(),
            ),
        );

        let body = multipart_body(
            Some(("people.csv", b"name,age\nada,36\ngrace,45\n")),
            Some("How many rows?"),
        );
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["answer"], "There are 2 rows.");
        assert_eq!(body["file_name"], "people.csv");
        assert_eq!(body["provider_used"], "openai");
        assert_eq!(body["question"], "How many rows?");
    }

    #[tokio::test]
    async fn chat_rejects_non_csv_extension() {
        let app = app_without_providers();
        let body = multipart_body(Some(("notes.txt", b"hello")), Some("what?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Only CSV files are supported");
    }

    #[tokio::test]
    async fn chat_accepts_uppercase_csv_extension() {
        let app = app_with(
            GatewayConfig::empty().with_credential(ProviderKind::OpenAi, "sk-test"),
            StubTransport::new(
                200,
                serde_json::json!({
                    "choices": [{"message": {"content": "ok"}}]
                })
                .to_string(),
            ),
        );
        let body = multipart_body(Some(("DATA.CSV", b"a,b\n1,2\n")), Some("sum?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_rejects_missing_file() {
        let app = app_without_providers();
        let body = multipart_body(None, Some("what?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No file provided");
    }

    #[tokio::test]
    async fn chat_rejects_missing_question() {
        let app = app_without_providers();
        let body = multipart_body(Some(("data.csv", b"a,b\n1,2\n")), None);
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No question provided");
    }

    #[tokio::test]
    async fn chat_rejects_blank_question() {
        let app = app_without_providers();
        let body = multipart_body(Some(("data.csv", b"a,b\n1,2\n")), Some("   "));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_rejects_oversized_file() {
        let app = app_without_providers();
        let big = vec![b'x'; MAX_UPLOAD_BYTES + 1];
        let body = multipart_body(Some(("big.csv", &big)), Some("sum?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "File size exceeds 16MB limit");
    }

    #[tokio::test]
    async fn chat_with_no_providers_is_500() {
        let app = app_without_providers();
        let body = multipart_body(Some(("data.csv", b"a,b\n1,2\n")), Some("sum?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn chat_maps_rate_limit_to_429() {
        let app = app_with(
            GatewayConfig::empty().with_credential(ProviderKind::Anthropic, "sk-ant"),
            StubTransport::new(
                429,
                serde_json::json!({"error": {"message": "rate limited"}}).to_string(),
            ),
        );
        let body = multipart_body(Some(("data.csv", b"a,b\n1,2\n")), Some("sum?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn chat_maps_transient_to_502() {
        let app = app_with(
            GatewayConfig::empty().with_credential(ProviderKind::Anthropic, "sk-ant"),
            StubTransport::new(
                500,
                serde_json::json!({"error": {"message": "overloaded"}}).to_string(),
            ),
        );
        let body = multipart_body(Some(("data.csv", b"a,b\n1,2\n")), Some("sum?"));
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn api_error_from_gateway_error_uses_taxonomy_status() {
        let err = ApiError::from(GatewayError::NoProviderConfigured);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(GatewayError::UpstreamRateLimited {
            provider: "openai".into(),
            message: "m".into(),
        });
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);

        let err = ApiError::from(GatewayError::PayloadTooLarge {
            message: "m".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
