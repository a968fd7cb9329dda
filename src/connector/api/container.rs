use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::application::{AnalysisClient, TextGenerationGateway};
use crate::connector::{AnthropicGateway, MockGateway};
use crate::domain::{AnalysisConfig, AnalysisError};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_APP_NAME: &str = "Lead Agent";
pub const DEFAULT_ENVIRONMENT: &str = "development";
/// Frontend directory picked up from the working directory when present.
pub const DEFAULT_STATIC_DIR: &str = "static";

pub struct ContainerConfig {
    pub analysis: AnalysisConfig,
    /// Serve canned analyses from [`MockGateway`] instead of calling the API.
    pub mock_gateway: bool,
    pub allowed_origins: Vec<String>,
    /// Directory holding the frontend; served at `/` (index.html) and `/static`.
    pub static_dir: Option<PathBuf>,
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
}

impl ContainerConfig {
    pub fn new(analysis: AnalysisConfig) -> Self {
        Self {
            analysis,
            mock_gateway: false,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            static_dir: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    /// Reads `ALLOWED_ORIGINS`, `APP_NAME`, `APP_VERSION`, `ENVIRONMENT` and
    /// `STATIC_DIR`. Without `STATIC_DIR`, `./static` is served if it exists.
    pub fn from_env(analysis: AnalysisConfig) -> Self {
        let mut config = Self::new(analysis);

        config.static_dir = match std::env::var("STATIC_DIR") {
            Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ => default_static_dir(Path::new(".")),
        };

        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }
        if let Ok(name) = std::env::var("APP_NAME") {
            config.app_name = name;
        }
        if let Ok(version) = std::env::var("APP_VERSION") {
            config.app_version = version;
        }
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }

        config
    }
}

fn default_static_dir(base: &Path) -> Option<PathBuf> {
    let dir = base.join(DEFAULT_STATIC_DIR);
    dir.is_dir().then_some(dir)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

pub struct Container {
    analysis_client: Arc<AnalysisClient>,
    /// Set once a credential check has passed; failed checks are not cached.
    credential_verified: OnceCell<()>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let gateway: Arc<dyn TextGenerationGateway> = if config.mock_gateway {
            debug!("Using mock text generation gateway");
            Arc::new(MockGateway::new())
        } else {
            debug!(
                "Using Anthropic gateway at {} (model {})",
                config.analysis.base_url, config.analysis.model
            );
            Arc::new(AnthropicGateway::from_config(&config.analysis)?)
        };

        Ok(Self::with_gateway(config, gateway)?)
    }

    /// Build around an explicit gateway, bypassing `mock_gateway`.
    pub fn with_gateway(
        config: ContainerConfig,
        gateway: Arc<dyn TextGenerationGateway>,
    ) -> Result<Self, AnalysisError> {
        let analysis_client = Arc::new(AnalysisClient::new(config.analysis.clone(), gateway)?);

        Ok(Self {
            analysis_client,
            credential_verified: OnceCell::new(),
            config,
        })
    }

    pub fn analysis_client(&self) -> Arc<AnalysisClient> {
        self.analysis_client.clone()
    }

    /// Runs the credential check until it first succeeds, then answers from
    /// the cached result.
    pub async fn ensure_credential(&self) -> bool {
        let result = self
            .credential_verified
            .get_or_try_init(|| async {
                if self.analysis_client.check_credential().await {
                    info!("Model service credential verified");
                    Ok(())
                } else {
                    Err(())
                }
            })
            .await;

        result.is_ok()
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.config.allowed_origins
    }

    pub fn static_dir(&self) -> Option<&Path> {
        self.config.static_dir.as_deref()
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn app_version(&self) -> &str {
        &self.config.app_version
    }

    pub fn environment(&self) -> &str {
        &self.config.environment
    }
}
