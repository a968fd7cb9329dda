use async_trait::async_trait;

use crate::domain::GatewayError;

/// One completion request sent to the external model service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    /// `None` leaves sampling at the service default.
    pub temperature: Option<f32>,
}

/// The text output of one completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub segments: Vec<String>,
    /// Why generation stopped (e.g. `end_turn`, `max_tokens`), when reported.
    pub stop_reason: Option<String>,
}

impl GenerationResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
            stop_reason: None,
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// True when the service cut the output at the token budget.
    pub fn is_truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }
}

/// Capability to turn a prompt into generated text.
///
/// Implementors own transport, authentication and serialization. Every
/// transport problem (network, non-2xx status, timeout) is reported as a
/// [`GatewayError`]; implementors never retry on their own.
#[async_trait]
pub trait TextGenerationGateway: Send + Sync {
    async fn complete(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, GatewayError>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}
