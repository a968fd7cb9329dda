use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::AnalysisError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How strictly a parsed model response is checked against the documented
/// analysis shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
    /// Any valid JSON value is accepted and returned as-is.
    #[default]
    Lenient,
    /// The object must deserialize into `MarketAnalysis` and pass its
    /// count and range checks.
    Strict,
}

impl SchemaPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaPolicy::Lenient => "lenient",
            SchemaPolicy::Strict => "strict",
        }
    }
}

impl FromStr for SchemaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" | "passthrough" => Ok(SchemaPolicy::Lenient),
            "strict" => Ok(SchemaPolicy::Strict),
            unknown => Err(format!("unknown schema policy '{}'", unknown)),
        }
    }
}

/// Immutable settings for the analysis pipeline.
///
/// Read once at startup; rotating the credential means building a new
/// `AnalysisClient`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    #[serde(default)]
    pub schema_policy: SchemaPolicy,
    /// Replaces the built-in persona preamble of the prompt.
    #[serde(default)]
    pub persona: Option<String>,
}

// Keeps the credential out of logs.
impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("schema_policy", &self.schema_policy)
            .field("persona", &self.persona)
            .finish()
    }
}

impl AnalysisConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            schema_policy: SchemaPolicy::default(),
            persona: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Load configuration from environment variables:
    ///
    /// | Variable                | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `ANTHROPIC_API_KEY`     | required                       |
    /// | `ANTHROPIC_MODEL`       | `claude-3-5-sonnet-20241022`   |
    /// | `ANTHROPIC_BASE_URL`    | `https://api.anthropic.com`    |
    /// | `ANALYSIS_MAX_TOKENS`   | `2000`                         |
    /// | `ANALYSIS_TEMPERATURE`  | `0.3`                          |
    /// | `ANALYSIS_TIMEOUT_SECS` | `60`                           |
    /// | `ANALYSIS_SCHEMA`       | `lenient`                      |
    /// | `ANALYSIS_PERSONA`      | built-in persona               |
    ///
    /// Unparseable optional values fall back to their defaults.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            AnalysisError::configuration("ANTHROPIC_API_KEY not found in environment variables")
        })?;

        if api_key.trim().is_empty() {
            return Err(AnalysisError::configuration("ANTHROPIC_API_KEY is empty"));
        }

        let mut config = Self::new(api_key);

        if let Ok(model) = env::var("ANTHROPIC_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }

        if let Ok(base_url) = env::var("ANTHROPIC_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }

        if let Some(max_tokens) = parse_var::<u32>("ANALYSIS_MAX_TOKENS") {
            config.max_tokens = max_tokens;
        }

        if let Some(temperature) = parse_var::<f32>("ANALYSIS_TEMPERATURE") {
            if (0.0..=1.0).contains(&temperature) {
                config.temperature = temperature;
            } else {
                warn!(
                    "ANALYSIS_TEMPERATURE {} outside 0.0..=1.0, using {}",
                    temperature, DEFAULT_TEMPERATURE
                );
            }
        }

        if let Some(timeout_secs) = parse_var::<u64>("ANALYSIS_TIMEOUT_SECS") {
            config.timeout_secs = timeout_secs;
        }

        if let Some(policy) = parse_var::<SchemaPolicy>("ANALYSIS_SCHEMA") {
            config.schema_policy = policy;
        }

        if let Ok(persona) = env::var("ANALYSIS_PERSONA") {
            if !persona.trim().is_empty() {
                config.persona = Some(persona);
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::configuration("API key is empty"));
        }

        if self.model.trim().is_empty() {
            return Err(AnalysisError::configuration("Model identifier is empty"));
        }

        if self.max_tokens == 0 {
            return Err(AnalysisError::configuration(
                "Max tokens must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AnalysisError::configuration(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AnalysisError::configuration(
                "Timeout must be greater than 0 seconds",
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_var<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring invalid {}='{}': {}", name, raw, e);
            None
        }
    }
}
