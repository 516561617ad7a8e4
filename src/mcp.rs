use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};

use crate::pdf::PdfDocument;
use crate::selection::{Selection, SelectionRequest};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfTrimRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Number of leading pages to keep")]
    pub pages: u32,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfLastPagesRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Number of trailing pages to keep (default: 2)")]
    #[serde(default = "default_last_pages")]
    pub pages: u32,
    #[schemars(description = "Output file path")]
    pub output: String,
}

fn default_last_pages() -> u32 {
    2
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfFirstLastRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Number of leading pages to keep (default: 0)")]
    #[serde(default)]
    pub first_pages: u32,
    #[schemars(description = "Number of trailing pages to keep (default: 0)")]
    #[serde(default)]
    pub last_pages: u32,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the number of pages in a PDF")]
    fn pdf_page_count(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let result = PageCountResult {
                    page_count: doc.page_count(),
                    path,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Keep only the first N pages of a PDF and save them to a new file")]
    fn pdf_trim(&self, Parameters(req): Parameters<PdfTrimRequest>) -> String {
        select_to_file(&req.path, SelectionRequest::TrimToFirst(req.pages), req.output)
    }

    #[tool(description = "Keep only the last N pages of a PDF and save them to a new file")]
    fn pdf_last_pages(&self, Parameters(req): Parameters<PdfLastPagesRequest>) -> String {
        select_to_file(&req.path, SelectionRequest::LastN(req.pages), req.output)
    }

    #[tool(description = "Keep the first N and last M pages of a PDF and save them to a new file. \
                          Overlapping pages are included once; the last block is kept whole.")]
    fn pdf_first_last_pages(&self, Parameters(req): Parameters<PdfFirstLastRequest>) -> String {
        if req.first_pages == 0 && req.last_pages == 0 {
            return "Error: first_pages or last_pages must be greater than 0".to_string();
        }
        let request = SelectionRequest::FirstAndLast {
            first: req.first_pages,
            last: req.last_pages,
        };
        select_to_file(&req.path, request, req.output)
    }
}

fn select_to_file(path: &str, request: SelectionRequest, output: String) -> String {
    match write_selection(path, request, &output) {
        Ok(selection) => {
            let result = SelectionFileResult {
                output_path: output,
                original_page_count: selection.page_count,
                page_count: selection.returned(),
                first_pages: selection.first_count,
                last_pages: selection.last_count,
            };
            serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => format!("Error: {}", e),
    }
}

fn write_selection(path: &str, request: SelectionRequest, output: &str) -> Result<Selection> {
    let doc = PdfDocument::open(path)?;
    let selection = request.select(doc.page_count())?;
    let mut new_doc = doc.extract_indices(&selection.indices)?;
    PdfDocument::save(&mut new_doc, output)?;
    Ok(selection)
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageCountResult {
    pub path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SelectionFileResult {
    pub output_path: String,
    pub original_page_count: u32,
    pub page_count: u32,
    pub first_pages: u32,
    pub last_pages: u32,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF trimming tools. Use pdf_page_count to inspect a document, pdf_trim to keep \
                 its first pages, pdf_last_pages to keep its last pages, and pdf_first_last_pages \
                 to keep both ends."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    tracing::info!("serving MCP over stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
