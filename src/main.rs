mod cli;
mod commands;
mod config;
mod error;
mod http;
mod mcp;
mod payload;
mod pdf;
mod selection;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::ServerConfig;
use selection::SelectionRequest;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to MCP traffic and command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            bind,
            response_format,
            max_upload_mb,
        } => {
            let config = ServerConfig::new(bind, response_format, max_upload_mb);
            http::serve(config).await?;
        }
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Trim {
            path,
            pages,
            output,
        } => {
            commands::select::run(&path, SelectionRequest::TrimToFirst(pages), &output)?;
        }
        Commands::Last {
            path,
            pages,
            output,
        } => {
            commands::select::run(&path, SelectionRequest::LastN(pages), &output)?;
        }
        Commands::FirstLast {
            path,
            first,
            last,
            output,
        } => {
            if first == 0 && last == 0 {
                anyhow::bail!("--first or --last must be greater than 0");
            }
            let request = SelectionRequest::FirstAndLast { first, last };
            commands::select::run(&path, request, &output)?;
        }
    }

    Ok(())
}
