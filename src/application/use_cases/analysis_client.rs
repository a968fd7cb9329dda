use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::{GenerationRequest, TextGenerationGateway};
use crate::domain::{
    AnalysisConfig, AnalysisError, AnalysisReport, ProductDescription, PromptBuilder,
    ResponseParser,
};

/// Prompt sent by [`AnalysisClient::check_credential`].
const CREDENTIAL_PROBE_PROMPT: &str = "Hello";
/// Smallest output budget the model API accepts.
const CREDENTIAL_PROBE_MAX_TOKENS: u32 = 1;

/// Runs the analysis pipeline: validate the description, build the prompt,
/// call the gateway once, parse the first text segment.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent `analyze` calls. Failures are returned as [`AnalysisError`]
/// values and are never retried here.
pub struct AnalysisClient {
    gateway: Arc<dyn TextGenerationGateway>,
    config: AnalysisConfig,
    prompt_builder: PromptBuilder,
    parser: ResponseParser,
}

impl AnalysisClient {
    /// Fails with [`AnalysisError::Configuration`] when the configuration is
    /// incomplete, most notably when the credential is missing.
    pub fn new(
        config: AnalysisConfig,
        gateway: Arc<dyn TextGenerationGateway>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;

        let prompt_builder = match &config.persona {
            Some(persona) => PromptBuilder::new().with_persona(persona.clone()),
            None => PromptBuilder::new(),
        };
        let parser = ResponseParser::new(config.schema_policy);

        Ok(Self {
            gateway,
            config,
            prompt_builder,
            parser,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompt_builder
    }

    pub async fn analyze(&self, description: &str) -> Result<AnalysisReport, AnalysisError> {
        let description = ProductDescription::parse(description)?;
        self.analyze_description(&description).await
    }

    pub async fn analyze_description(
        &self,
        description: &ProductDescription,
    ) -> Result<AnalysisReport, AnalysisError> {
        let prompt = self.prompt_builder.build(description);

        debug!(
            "Sending analysis prompt to {} (model={}, prompt_chars={}, max_tokens={})",
            self.gateway.name(),
            self.config.model,
            prompt.len(),
            self.config.max_tokens
        );

        let request = GenerationRequest {
            model: self.config.model.clone(),
            prompt: prompt.into_string(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let start_time = Instant::now();

        let response = self.gateway.complete(&request).await.map_err(|e| {
            warn!("Analysis request to {} failed: {}", self.gateway.name(), e);
            AnalysisError::Upstream(e)
        })?;

        if response.is_truncated() {
            warn!(
                "Model output hit the {} token limit; the JSON is likely incomplete",
                self.config.max_tokens
            );
        }

        let text = response.first_text().ok_or_else(|| {
            warn!("Model response contained no text content");
            AnalysisError::malformed("response contained no text content", "")
        })?;

        let report = self.parser.parse(text).inspect_err(|e| {
            warn!("Could not parse model response: {e}. Raw response: {text}");
        })?;

        info!(
            "Analysis completed in {:.2}s ({} top-level fields)",
            start_time.elapsed().as_secs_f64(),
            report.as_object().map_or(0, |fields| fields.len())
        );

        Ok(report)
    }

    /// Sends a minimal billed request to confirm the credential works.
    ///
    /// Call at startup or from a health check, not per analysis.
    pub async fn check_credential(&self) -> bool {
        let request = GenerationRequest {
            model: self.config.model.clone(),
            prompt: CREDENTIAL_PROBE_PROMPT.to_string(),
            max_tokens: CREDENTIAL_PROBE_MAX_TOKENS,
            temperature: None,
        };

        match self.gateway.complete(&request).await {
            Ok(_) => {
                info!("Credential check against {} succeeded", self.gateway.name());
                true
            }
            Err(e) => {
                warn!("Credential check against {} failed: {}", self.gateway.name(), e);
                false
            }
        }
    }
}
