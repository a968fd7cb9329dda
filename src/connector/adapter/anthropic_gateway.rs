use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{GenerationRequest, GenerationResponse, TextGenerationGateway};
use crate::domain::{AnalysisConfig, GatewayError};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of the Messages API response we read.
#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// [`TextGenerationGateway`] backed by the Anthropic Messages API (or any
/// compatible endpoint, e.g. LM Studio via `ANTHROPIC_BASE_URL`).
///
/// The reqwest client carries the configured timeout; an elapsed timeout is
/// reported as [`GatewayError::Timeout`].
pub struct AnthropicGateway {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), MESSAGES_PATH);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            url,
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, GatewayError> {
        Self::new(config.api_key.clone(), &config.base_url, config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Prefer the API's own error message over the raw JSON body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl TextGenerationGateway for AnthropicGateway {
    async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        let body = ApiRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ApiMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::transport(format!("request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicGateway: API returned {status}: {body}");
            return Err(GatewayError::from_status(
                status.as_u16(),
                Self::error_message(&body),
            ));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::invalid_payload(format!("failed to parse response: {e}"))
            }
        })?;

        let segments: Vec<String> = api_response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        debug!(
            "AnthropicGateway: received {} text segment(s), stop_reason={:?}",
            segments.len(),
            api_response.stop_reason
        );

        Ok(GenerationResponse {
            segments,
            stop_reason: api_response.stop_reason,
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_messages_path() {
        let gateway =
            AnthropicGateway::new("key", "http://localhost:1234/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(gateway.url(), "http://localhost:1234/v1/messages");
    }

    #[test]
    fn error_message_prefers_api_message() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert_eq!(AnthropicGateway::error_message(body), "invalid x-api-key");
        assert_eq!(AnthropicGateway::error_message("upstream down"), "upstream down");
    }

    #[test]
    fn request_omits_unset_temperature() {
        let body = ApiRequest {
            model: "claude",
            max_tokens: 1,
            temperature: None,
            messages: vec![ApiMessage {
                role: "user",
                content: "Hello",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
