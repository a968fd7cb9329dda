use thiserror::Error;

/// Transport-level failures of the text generation gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),
}

impl GatewayError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    /// Classify a non-2xx HTTP status returned by the model API.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Authentication(body),
            429 => Self::RateLimited(body),
            _ => Self::Status { status, body },
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("AI analysis failed: {0}")]
    Upstream(#[from] GatewayError),

    #[error("Failed to parse AI response: {message}")]
    MalformedResponse { message: String, raw: String },
}

impl AnalysisError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Configuration(_) => "configuration_error",
            AnalysisError::Validation(_) => "validation_error",
            AnalysisError::Upstream(_) => "upstream_error",
            AnalysisError::MalformedResponse { .. } => "malformed_response_error",
        }
    }

    /// Only transient upstream failures are worth retrying as-is. A rejected
    /// credential stays rejected, and a malformed reply usually means the
    /// prompt and the parser disagree.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Upstream(GatewayError::Authentication(_)) => false,
            AnalysisError::Upstream(_) => true,
            _ => false,
        }
    }

    /// The unmodified model output for malformed responses.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalysisError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
