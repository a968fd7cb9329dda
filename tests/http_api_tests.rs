//! Integration tests for the HTTP API.
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! no socket is bound.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use leadagent::connector::router;
use leadagent::{
    AnalysisConfig, Container, ContainerConfig, GatewayError, GenerationRequest,
    GenerationResponse, MarketAnalysis, MockGateway, TextGenerationGateway,
};

enum AnalysisFault {
    Stall(Duration),
    Fail(GatewayError),
}

/// Answers the one-token credential check, then misbehaves on the analysis
/// request itself.
struct FaultyAnalysisGateway {
    fault: AnalysisFault,
}

#[async_trait]
impl TextGenerationGateway for FaultyAnalysisGateway {
    async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        if request.max_tokens == 1 {
            return Ok(GenerationResponse::from_text("Hi"));
        }

        match &self.fault {
            AnalysisFault::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(GenerationResponse::from_text("{}"))
            }
            AnalysisFault::Fail(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

fn faulty_app(fault: AnalysisFault, timeout_secs: u64) -> Router {
    let mut analysis = AnalysisConfig::new("test-key");
    analysis.timeout_secs = timeout_secs;
    let gateway = Arc::new(FaultyAnalysisGateway { fault });
    let container = Container::with_gateway(ContainerConfig::new(analysis), gateway)
        .expect("Failed to build container");
    router(Arc::new(container))
}

fn container_with(gateway: Arc<MockGateway>) -> Arc<Container> {
    let config = ContainerConfig::new(AnalysisConfig::new("test-key"));
    Arc::new(Container::with_gateway(config, gateway).expect("Failed to build container"))
}

fn app(gateway: Arc<MockGateway>) -> Router {
    router(container_with(gateway))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).unwrap())
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_reports_app_metadata() {
    let (status, body) = send(
        app(Arc::new(MockGateway::new())),
        Method::GET,
        "/api/health",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app_name"], "Lead Agent");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_analyze_product_success() {
    let gateway = Arc::new(MockGateway::new());
    let (status, body) = send(
        app(gateway.clone()),
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "A SaaS tool for scheduling social media posts"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        serde_json::to_value(MarketAnalysis::example()).unwrap()
    );
    // Credential probe plus the analysis itself.
    assert_eq!(gateway.call_count(), 2);
}

#[tokio::test]
async fn test_analyze_product_requires_description() {
    let gateway = Arc::new(MockGateway::new());
    let (status, body) = send(
        app(gateway.clone()),
        Method::POST,
        "/api/analyze-product",
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["detail"], "Product description is required");
    assert!(body["request_id"].is_string());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_product_rejects_blank_description() {
    let gateway = Arc::new(MockGateway::new());
    let (status, body) = send(
        app(gateway.clone()),
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Product description cannot be empty");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_product_credential_failure() {
    let gateway = Arc::new(MockGateway::failing(GatewayError::Authentication(
        "invalid x-api-key".to_string(),
    )));
    let (status, body) = send(
        app(gateway.clone()),
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "Payroll for restaurants"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "AI service is not properly configured. Please check API keys."
    );
    assert_eq!(body["error"], "configuration_error");
    // Only the probe ran.
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_analyze_product_malformed_reply() {
    let gateway = Arc::new(MockGateway::with_text("Sorry, I cannot help."));
    let (status, body) = send(
        app(gateway),
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "Payroll for restaurants"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "malformed_response_error");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("AI analysis failed"));
    assert!(!detail.contains("Sorry, I cannot help."));
}

#[tokio::test]
async fn test_analyze_product_times_out() {
    let app = faulty_app(AnalysisFault::Stall(Duration::from_secs(30)), 1);

    let started = Instant::now();
    let (status, body) = send(
        app,
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "Payroll for restaurants"})),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "upstream_error");
    assert_eq!(body["detail"], "AI analysis failed: Request timed out");
}

#[tokio::test]
async fn test_analyze_product_upstream_failure() {
    let app = faulty_app(
        AnalysisFault::Fail(GatewayError::transport("connection refused")),
        60,
    );

    let (status, body) = send(
        app,
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "Payroll for restaurants"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "upstream_error");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_analyze_product_returns_non_object_json() {
    let (status, body) = send(
        app(Arc::new(MockGateway::with_text("[1, 2, 3]"))),
        Method::POST,
        "/api/analyze-product",
        Some(json!({"description": "A CRM"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_generate_leads_returns_sample_batch() {
    let (status, body) = send(
        app(Arc::new(MockGateway::new())),
        Method::POST,
        "/api/generate-leads",
        Some(json!({"analysis": {}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["leads"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_send_sequence_validation() {
    let (status, body) = send(
        app(Arc::new(MockGateway::new())),
        Method::POST,
        "/api/send-sequence",
        Some(json!({"leads": [1, 2], "subject": "Hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Leads, subject, and template are required");
}

#[tokio::test]
async fn test_send_sequence_schedules_emails() {
    let (status, body) = send(
        app(Arc::new(MockGateway::new())),
        Method::POST,
        "/api/send-sequence",
        Some(json!({
            "leads": [1, 2, 3],
            "subject": "Quick question",
            "template": "Hi {{name}}",
            "schedule": "immediate"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["emails_sent"], 3);
    assert_eq!(body["data"]["status"], "scheduled");
}

#[tokio::test]
async fn test_static_frontend_is_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Lead Agent</h1>").unwrap();
    std::fs::write(dir.path().join("script.js"), "console.log('ok');").unwrap();

    let mut config = ContainerConfig::new(AnalysisConfig::new("test-key"));
    config.static_dir = Some(dir.path().to_path_buf());
    let container =
        Arc::new(Container::with_gateway(config, Arc::new(MockGateway::new())).unwrap());
    let app = router(container);

    let index = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(index.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>Lead Agent</h1>");

    let script = app
        .oneshot(
            Request::builder()
                .uri("/static/script.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(script.status(), StatusCode::OK);
}
