use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use leadagent::cli::logging::{init_logging, LoggingConfig};
use leadagent::cli::{Cli, Commands};
use leadagent::connector::serve;
use leadagent::{AnalysisConfig, Container, ContainerConfig};

/// Placeholder credential so `--mock-gateway` runs without an API key.
const MOCK_API_KEY: &str = "mock-api-key";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    // Held until exit so the file writer flushes.
    let _log_guard = init_logging(&LoggingConfig::from_env(cli.verbose))?;

    let analysis = load_analysis_config(cli.mock_gateway)?;
    let mut config = ContainerConfig::from_env(analysis);
    config.mock_gateway = cli.mock_gateway;

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }

            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid listen address {host}:{port}"))?;

            let container = Arc::new(Container::new(config)?);
            info!(
                "Starting {} {} ({})",
                container.app_name(),
                container.app_version(),
                container.environment()
            );

            serve(container, addr).await?;
        }

        Commands::Analyze {
            description,
            pretty,
        } => {
            let container = Container::new(config)?;
            let client = container.analysis_client();

            match client.analyze(&description).await {
                Ok(report) => {
                    let rendered = if pretty {
                        serde_json::to_string_pretty(&report)?
                    } else {
                        serde_json::to_string(&report)?
                    };
                    println!("{}", rendered);
                }
                Err(e) => {
                    if let Some(raw) = e.raw_response() {
                        eprintln!("Raw model response:\n{}", raw);
                    }
                    return Err(e.into());
                }
            }
        }

        Commands::CheckCredential => {
            let container = Container::new(config)?;
            let client = container.analysis_client();

            if client.check_credential().await {
                println!("Credential OK (model: {})", client.config().model);
            } else {
                bail!(
                    "credential check failed for model {}",
                    client.config().model
                );
            }
        }
    }

    Ok(())
}

fn load_analysis_config(mock_gateway: bool) -> Result<AnalysisConfig> {
    match AnalysisConfig::from_env() {
        Ok(config) => Ok(config),
        Err(e) if mock_gateway => {
            info!("{e}; continuing with the mock gateway");
            Ok(AnalysisConfig::new(MOCK_API_KEY))
        }
        Err(e) => Err(e.into()),
    }
}
