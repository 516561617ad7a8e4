use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::config::ResponseFormat;
use crate::selection::Selection;

/// Which endpoint produced a selection; decides naming and the metadata
/// fields reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Trim,
    LastPages,
    LastTwoPages,
    FirstLastPages,
}

impl Endpoint {
    fn suffix(self) -> &'static str {
        match self {
            Endpoint::Trim => "trimmed",
            Endpoint::LastPages => "last-pages",
            Endpoint::LastTwoPages => "last-2-pages",
            Endpoint::FirstLastPages => "first-last-pages",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedResponse {
    pub success: bool,
    pub data: String,
    pub file_name: String,
    pub original_page_count: u32,
    pub returned_page_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_trimmed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_pages_extracted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pages_extracted: Option<u32>,
}

pub fn encode(
    format: ResponseFormat,
    endpoint: Endpoint,
    selection: &Selection,
    pdf: Vec<u8>,
    upload_name: Option<&str>,
) -> Response {
    let file_name = output_name(upload_name, endpoint);

    match format {
        ResponseFormat::Binary => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
                (
                    header::HeaderName::from_static("x-original-page-count"),
                    selection.page_count.to_string(),
                ),
                (
                    header::HeaderName::from_static("x-returned-page-count"),
                    selection.returned().to_string(),
                ),
            ],
            pdf,
        )
            .into_response(),
        ResponseFormat::Base64 => {
            let (pages_trimmed, first, last) = match endpoint {
                Endpoint::Trim => (Some(selection.removed()), None, None),
                Endpoint::LastPages | Endpoint::LastTwoPages => {
                    (None, None, Some(selection.last_count))
                }
                Endpoint::FirstLastPages => {
                    (None, Some(selection.first_count), Some(selection.last_count))
                }
            };

            Json(EncodedResponse {
                success: true,
                data: STANDARD.encode(&pdf),
                file_name,
                original_page_count: selection.page_count,
                returned_page_count: selection.returned(),
                pages_trimmed,
                first_pages_extracted: first,
                last_pages_extracted: last,
            })
            .into_response()
        }
    }
}

/// `<upload stem>-<endpoint suffix>.pdf`, restricted to header-safe characters.
fn output_name(upload_name: Option<&str>, endpoint: Endpoint) -> String {
    let stem = upload_name
        .map(|name| {
            let name = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
            match name.rsplit_once('.') {
                Some((stem, ext)) if ext.eq_ignore_ascii_case("pdf") => stem,
                _ => name,
            }
        })
        .map(|stem| {
            stem.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string());

    format!("{}-{}.pdf", stem, endpoint.suffix())
}
