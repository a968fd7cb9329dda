pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leadagent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer with a canned analysis instead of calling the model API
    #[arg(long, global = true)]
    pub mock_gateway: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Directory with the frontend (index.html and assets); defaults to
        /// `./static` when it exists
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Analyze one product description and print the report as JSON
    Analyze {
        description: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Send a minimal request to confirm the API key works (billed)
    CheckCredential,
}
