//! scanhub command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scanhub::config::ServiceConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scanhub", version, about = "Barcode/QR and OCR image scan service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Path to a scanhub.toml config file (default: upward discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let config = ServiceConfig::load(config.as_deref())?;
            scanhub::api::serve(&host, port, config).await?;
        }
    }

    Ok(())
}
