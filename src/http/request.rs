use axum::{
    extract::{FromRequest, Json, Multipart, Request},
    http::{header, StatusCode},
};
use serde_json::Value;

use crate::error::AppError;
use crate::payload::{decode_base64, json_count, RawCounts};

const FILE_FIELDS: &[&str] = &["file", "pdf"];
const BASE64_FIELDS: &[&str] = &["base64", "pdfBase64", "data"];
const COUNT_FIELDS: &[&str] = &["pages", "firstPages", "lastPages"];

/// A document plus the count parameters that came with it, from either a
/// multipart upload or a JSON body carrying base64.
#[derive(Debug)]
pub struct SelectionInput {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub counts: RawCounts,
}

impl<S> FromRequest<S> for SelectionInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            from_json(&value)
        } else {
            Err(AppError::MalformedRequest(format!(
                "unsupported content type {:?}; send multipart/form-data or application/json",
                content_type
            )))
        }
    }
}

fn body_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::MalformedRequest(text)
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<SelectionInput, AppError> {
    let mut bytes = None;
    let mut file_name = None;
    let mut counts = RawCounts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_error(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let upload_name = field.file_name().map(str::to_string);

        if is_binary_part(&name, upload_name.as_deref(), field.content_type()) {
            let data = field
                .bytes()
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            bytes = Some(data.to_vec());
            file_name = upload_name;
        } else if BASE64_FIELDS.contains(&name.as_str()) {
            let text = field
                .text()
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            bytes = Some(decode_base64(&text)?);
        } else if COUNT_FIELDS.contains(&name.as_str()) {
            let text = field
                .text()
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            counts.set(&name, text);
        } else {
            tracing::debug!(field = %name, "ignoring unknown multipart field");
        }
    }

    let bytes = bytes.ok_or_else(|| AppError::MissingField("file or base64".to_string()))?;
    Ok(SelectionInput {
        bytes,
        file_name,
        counts,
    })
}

/// `file` and `pdf` parts always carry raw bytes. `data` may hold either raw
/// bytes or base64 text; a filename or a non-text content type means bytes.
fn is_binary_part(name: &str, file_name: Option<&str>, content_type: Option<&str>) -> bool {
    if FILE_FIELDS.contains(&name) {
        return true;
    }
    name == "data"
        && (file_name.is_some()
            || content_type.is_some_and(|ct| !ct.to_ascii_lowercase().starts_with("text/")))
}

fn from_json(value: &Value) -> Result<SelectionInput, AppError> {
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::MalformedRequest("expected a JSON object".to_string()))?;

    let encoded = BASE64_FIELDS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .ok_or_else(|| AppError::MissingField("base64".to_string()))?;
    let bytes = decode_base64(encoded)?;

    let mut counts = RawCounts::default();
    for field in COUNT_FIELDS {
        if let Some(value) = obj.get(*field) {
            if let Some(raw) = json_count(field, value)? {
                counts.set(field, raw);
            }
        }
    }

    let file_name = ["fileName", "filename"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    Ok(SelectionInput {
        bytes,
        file_name,
        counts,
    })
}
