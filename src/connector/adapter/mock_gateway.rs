use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::{GenerationRequest, GenerationResponse, TextGenerationGateway};
use crate::domain::{GatewayError, MarketAnalysis};

enum Reply {
    Segments(Vec<String>),
    Error(GatewayError),
}

/// In-process gateway with a scripted reply. Records every request it sees.
///
/// `MockGateway::new()` answers with a complete, valid analysis, which is
/// what the `--mock-gateway` flag serves.
pub struct MockGateway {
    reply: Reply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        let canned = serde_json::to_string_pretty(&MarketAnalysis::example()).unwrap_or_default();
        Self::with_text(canned)
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_segments(vec![text.into()])
    }

    pub fn with_segments(segments: Vec<String>) -> Self {
        Self {
            reply: Reply::Segments(segments),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Reply::Error(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock_requests().clone()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<GenerationRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationGateway for MockGateway {
    async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        self.lock_requests().push(request.clone());

        match &self.reply {
            Reply::Segments(segments) => Ok(GenerationResponse {
                segments: segments.clone(),
                stop_reason: Some("end_turn".to_string()),
            }),
            Reply::Error(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
