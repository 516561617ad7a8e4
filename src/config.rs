use clap::ValueEnum;
use std::net::SocketAddr;

/// How a derived PDF is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResponseFormat {
    /// Raw `application/pdf` body
    #[default]
    Binary,
    /// JSON body with the PDF base64-encoded next to selection metadata
    Base64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub response_format: ResponseFormat,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn new(bind: SocketAddr, response_format: ResponseFormat, max_upload_mb: usize) -> Self {
        ServerConfig {
            bind,
            response_format,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}
