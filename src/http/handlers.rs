use axum::{extract::State, response::Response, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use super::request::SelectionInput;
use super::response::{encode, Endpoint};
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::pdf::PdfDocument;
use crate::selection::{Selection, SelectionRequest};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn trim(
    State(config): State<Arc<ServerConfig>>,
    input: SelectionInput,
) -> Result<Response, AppError> {
    let request = SelectionRequest::TrimToFirst(input.counts.pages()?);
    respond(&config, Endpoint::Trim, request, input).await
}

pub async fn last_pages(
    State(config): State<Arc<ServerConfig>>,
    input: SelectionInput,
) -> Result<Response, AppError> {
    let request = SelectionRequest::LastN(input.counts.pages()?);
    respond(&config, Endpoint::LastPages, request, input).await
}

pub async fn last_two_pages(
    State(config): State<Arc<ServerConfig>>,
    input: SelectionInput,
) -> Result<Response, AppError> {
    respond(&config, Endpoint::LastTwoPages, SelectionRequest::last_two(), input).await
}

pub async fn first_last_pages(
    State(config): State<Arc<ServerConfig>>,
    input: SelectionInput,
) -> Result<Response, AppError> {
    let (first, last) = input.counts.first_and_last()?;
    let request = SelectionRequest::FirstAndLast { first, last };
    respond(&config, Endpoint::FirstLastPages, request, input).await
}

async fn respond(
    config: &ServerConfig,
    endpoint: Endpoint,
    request: SelectionRequest,
    input: SelectionInput,
) -> Result<Response, AppError> {
    let SelectionInput {
        bytes, file_name, ..
    } = input;

    let (selection, pdf) = tokio::task::spawn_blocking(move || apply(&bytes, request))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    tracing::info!(
        ?endpoint,
        original = selection.page_count,
        returned = selection.returned(),
        bytes = pdf.len(),
        "selection complete"
    );

    Ok(encode(
        config.response_format,
        endpoint,
        &selection,
        pdf,
        file_name.as_deref(),
    ))
}

/// Load, select and re-serialize. CPU-bound, so callers run it off the runtime.
fn apply(bytes: &[u8], request: SelectionRequest) -> Result<(Selection, Vec<u8>), AppError> {
    let doc =
        PdfDocument::from_bytes(bytes).map_err(|e| AppError::InvalidDocument(format!("{e:#}")))?;
    let selection = request.select(doc.page_count())?;

    tracing::debug!(
        ?request,
        page_count = selection.page_count,
        first = selection.first_count,
        last = selection.last_count,
        "pages selected"
    );

    let mut new_doc = doc.extract_indices(&selection.indices)?;
    let pdf = PdfDocument::to_bytes(&mut new_doc)?;
    Ok((selection, pdf))
}
