use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::ApiError;

const SEQUENCE_ID: &str = "seq_123456";
const SENT_AT: &str = "2025-01-15T10:30:00Z";

#[derive(Debug, Deserialize)]
pub struct SendSequenceRequest {
    /// Lead identifiers; any JSON value is accepted.
    #[serde(default)]
    pub leads: Vec<Value>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl SendSequenceRequest {
    fn is_complete(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        !self.leads.is_empty() && present(&self.subject) && present(&self.template)
    }
}

#[derive(Debug, Serialize)]
pub struct SequenceReceipt {
    pub sequence_id: &'static str,
    pub emails_sent: usize,
    pub status: &'static str,
    pub sent_at: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SendSequenceResponse {
    pub success: bool,
    pub data: SequenceReceipt,
}

// Placeholder: validates the payload and acknowledges it; nothing is sent.
pub async fn send_sequence(
    payload: Result<Json<SendSequenceRequest>, JsonRejection>,
) -> Result<Json<SendSequenceResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if !request.is_complete() {
        return Err(ApiError::bad_request(
            "Leads, subject, and template are required",
        ));
    }

    Ok(Json(SendSequenceResponse {
        success: true,
        data: SequenceReceipt {
            sequence_id: SEQUENCE_ID,
            emails_sent: request.leads.len(),
            status: "scheduled",
            sent_at: SENT_AT,
        },
    }))
}
