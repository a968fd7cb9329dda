use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::super::Container;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub app_name: String,
    pub version: String,
    pub environment: String,
}

/// Liveness only; never touches the model service.
pub async fn health_check(State(container): State<Arc<Container>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        app_name: container.app_name().to_string(),
        version: container.app_version().to_string(),
        environment: container.environment().to_string(),
    })
}
