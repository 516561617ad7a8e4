use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::ResponseFormat;

#[derive(Parser)]
#[command(name = "pdftrim")]
#[command(about = "Trim PDFs to their first and/or last pages, over HTTP, MCP or the command line")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service (primary mode)
    Serve {
        /// Address to listen on
        #[arg(long, env = "PDFTRIM_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        /// Encoding of successful responses
        #[arg(long, env = "PDFTRIM_RESPONSE_FORMAT", value_enum, default_value_t = ResponseFormat::Binary)]
        response_format: ResponseFormat,

        /// Maximum request body size in megabytes
        #[arg(long, env = "PDFTRIM_MAX_UPLOAD_MB", default_value = "50")]
        max_upload_mb: usize,
    },

    /// Run as MCP server over stdio
    Mcp,

    /// Keep only the first N pages
    #[command(alias = "first")]
    Trim {
        /// PDF file to trim
        path: PathBuf,

        /// Number of pages to keep
        pages: u32,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Keep only the last N pages
    Last {
        /// PDF file to trim
        path: PathBuf,

        /// Number of pages to keep
        #[arg(default_value = "2")]
        pages: u32,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Keep the first N and last M pages
    FirstLast {
        /// PDF file to trim
        path: PathBuf,

        /// Number of leading pages
        #[arg(short, long, default_value = "0")]
        first: u32,

        /// Number of trailing pages
        #[arg(short, long, default_value = "0")]
        last: u32,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}
