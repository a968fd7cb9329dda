use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{AnalysisError, AnalysisReport, GatewayError, ProductDescription};

use super::super::{ApiError, Container};

#[derive(Debug, Deserialize)]
pub struct AnalyzeProductRequest {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeProductResponse {
    pub success: bool,
    pub data: AnalysisReport,
}

pub struct AnalyzeController<'a> {
    container: &'a Container,
}

impl<'a> AnalyzeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn analyze(
        &self,
        request: AnalyzeProductRequest,
    ) -> Result<AnalyzeProductResponse, ApiError> {
        let description = request
            .description
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::bad_request("Product description is required"))?;

        let description = ProductDescription::parse(description)
            .map_err(|_| ApiError::bad_request("Product description cannot be empty"))?;

        if !self.container.ensure_credential().await {
            return Err(ApiError::CredentialCheckFailed);
        }

        let client = self.container.analysis_client();
        let timeout = client.config().timeout();

        info!(
            "Analyzing product description ({} chars)",
            description.as_str().len()
        );

        let report = tokio::time::timeout(timeout, client.analyze_description(&description))
            .await
            .map_err(|_| AnalysisError::Upstream(GatewayError::Timeout))??;

        Ok(AnalyzeProductResponse {
            success: true,
            data: report,
        })
    }
}

pub async fn analyze_product(
    State(container): State<Arc<Container>>,
    payload: Result<Json<AnalyzeProductRequest>, JsonRejection>,
) -> Result<Json<AnalyzeProductResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    AnalyzeController::new(&container)
        .analyze(request)
        .await
        .map(Json)
}
