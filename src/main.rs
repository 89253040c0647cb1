//! Fezz Netlify CLI
//!
//! `fezz-netlify build <config.json>` writes the Netlify deploy artifacts.
//! `fezz-netlify preview [port]` serves a demo echo function through the
//! Netlify Functions adapter.

use clap::{Parser, Subcommand};
use fezz_netlify::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Echoes the canonical request back as JSON.
struct EchoFunction;

#[async_trait]
impl FezzFunction for EchoFunction {
    async fn fetch(
        &self,
        request: FezzRequest,
        ctx: &FunctionContext,
    ) -> Result<FezzResponse, FezzError> {
        let response_body = serde_json::json!({
            "method": request.method.to_string(),
            "path": &request.path,
            "url": &request.url,
            "headers": &request.headers,
            "query": &request.query,
            "body": request.text(),
            "request_id": ctx.request_id,
        });

        Ok(FezzResponse::json(&response_body)?)
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[derive(Parser)]
#[command(name = "fezz-netlify")]
#[command(version, about = "Package Fezz functions for Netlify", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write _redirects, _headers and the function manifests
    Build {
        /// Path to the preset config (JSON)
        config: PathBuf,
    },
    /// Serve the echo function through the Netlify Functions adapter
    Preview {
        /// Port to listen on
        #[arg(default_value_t = 8888)]
        port: u16,
    },
}

fn build(config_path: &Path) -> Result<(), BuildError> {
    let config = PresetConfig::load(config_path)?;
    tracing::info!(
        "Building {:?} preset into {}",
        config.preset,
        config.public_path().display()
    );

    let report = NetlifyBuild::new(config).run()?;
    for path in &report.written {
        tracing::info!("  written: {}", path.display());
    }
    for path in &report.skipped {
        tracing::info!("  kept existing: {}", path.display());
    }
    Ok(())
}

async fn preview(port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = PreviewConfig::new().port(port);
    let server = PreviewServer::new(config, Box::new(EchoFunction)).await?;
    tracing::info!("Try: curl 'http://localhost:{}/hello?x=1&x=2'", port);
    server.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result: Result<(), Box<dyn std::error::Error + Send + Sync>> = match cli.command {
        Commands::Build { config } => build(&config).map_err(Into::into),
        Commands::Preview { port } => preview(port).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
