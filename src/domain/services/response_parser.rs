use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{AnalysisError, AnalysisReport, MarketAnalysis, SchemaPolicy};

/// Parses the model's text output into an [`AnalysisReport`].
///
/// Every failure carries the original text untouched, since it is the only
/// diagnostic available when tuning the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    policy: SchemaPolicy,
}

impl ResponseParser {
    pub fn new(policy: SchemaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SchemaPolicy {
        self.policy
    }

    pub fn parse(&self, raw: &str) -> Result<AnalysisReport, AnalysisError> {
        let body = strip_code_fences(raw);

        let value: Value = serde_json::from_str(body)
            .map_err(|e| AnalysisError::malformed(e.to_string(), raw))?;

        if self.policy == SchemaPolicy::Strict {
            if !value.is_object() {
                return Err(AnalysisError::malformed(
                    format!("schema mismatch: expected a JSON object, got {}", json_type(&value)),
                    raw,
                ));
            }
            let analysis = MarketAnalysis::deserialize(&value)
                .map_err(|e| AnalysisError::malformed(format!("schema mismatch: {e}"), raw))?;
            analysis
                .validate()
                .map_err(|e| AnalysisError::malformed(format!("schema violation: {e}"), raw))?;
        }

        debug!(
            "Parsed {} from model output ({} policy)",
            json_type(&value),
            self.policy.as_str()
        );

        Ok(AnalysisReport::from_value(value))
    }
}

/// Trim whitespace and one surrounding Markdown code fence, with or without a
/// language tag, including fences that wrap the body on a single line.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    let body = match inner.find('\n') {
        Some(newline) if is_language_tag(&inner[..newline]) => &inner[newline + 1..],
        Some(_) => inner,
        None => strip_inline_tag(inner),
    };
    body.trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// `json {"a":1}` -> ` {"a":1}`; a lone word such as `true` is kept.
fn strip_inline_tag(inner: &str) -> &str {
    let tag_len = inner
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(inner.len());
    let rest = &inner[tag_len..];

    if tag_len > 0 && rest.trim_start().starts_with(['{', '[']) {
        rest
    } else {
        inner
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
