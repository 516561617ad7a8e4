mod handlers;
mod request;
mod response;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;

pub fn router(config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/trim", post(handlers::trim))
        .route("/last-pages", post(handlers::last_pages))
        .route("/last-two-pages", post(handlers::last_two_pages))
        .route("/first-last-pages", post(handlers::first_last_pages))
        .with_state(Arc::new(config))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!(
        addr = %config.bind,
        format = ?config.response_format,
        max_upload_bytes = config.max_upload_bytes,
        "listening"
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseFormat;
    use crate::pdf::tests::{page_labels, sample_pdf};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "pdftrim-test-boundary";

    fn config(format: ResponseFormat) -> ServerConfig {
        ServerConfig::new("127.0.0.1:0".parse().unwrap(), format, 10)
    }

    fn multipart_body(pdf: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(pdf);
        body.extend_from_slice(b"\r\n");
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_multipart(
        format: ResponseFormat,
        uri: &str,
        pdf: &[u8],
        fields: &[(&str, &str)],
    ) -> Response {
        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(pdf, fields)))
            .unwrap();
        router(config(format)).oneshot(request).await.unwrap()
    }

    async fn post_json(format: ResponseFormat, uri: &str, body: Value) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router(config(format)).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = router(config(ResponseFormat::Binary))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_trim_multipart_binary() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/trim",
            &sample_pdf(5),
            &[("pages", "2")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report-trimmed.pdf\""
        );
        assert_eq!(headers["x-original-page-count"], "5");
        assert_eq!(headers["x-returned-page-count"], "2");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 1", "Page 2"]);
    }

    async fn post_parts(uri: &str, parts: &[(&str, &[u8])]) -> Response {
        let mut body = Vec::new();
        for (headers, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n{headers}\r\n\r\n").as_bytes());
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        router(config(ResponseFormat::Binary))
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_file_part_without_filename() {
        let pdf = sample_pdf(3);
        let response = post_parts(
            "/trim",
            &[
                ("Content-Disposition: form-data; name=\"file\"", pdf.as_slice()),
                ("Content-Disposition: form-data; name=\"pages\"", b"1".as_slice()),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"document-trimmed.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 1"]);
    }

    #[tokio::test]
    async fn test_data_part_binary_or_base64() {
        let pdf = sample_pdf(4);
        let response = post_parts(
            "/last-pages",
            &[
                (
                    "Content-Disposition: form-data; name=\"data\"\r\nContent-Type: application/pdf",
                    pdf.as_slice(),
                ),
                ("Content-Disposition: form-data; name=\"pages\"", b"1".as_slice()),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 4"]);

        let encoded = STANDARD.encode(&pdf);
        let response = post_parts(
            "/last-pages",
            &[
                (
                    "Content-Disposition: form-data; name=\"data\"",
                    encoded.as_bytes(),
                ),
                ("Content-Disposition: form-data; name=\"pages\"", b"2".as_slice()),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 3", "Page 4"]);
    }

    #[tokio::test]
    async fn test_trim_reports_pages_removed() {
        let response = post_multipart(
            ResponseFormat::Base64,
            "/trim",
            &sample_pdf(5),
            &[("pages", "3")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["pagesTrimmed"], 2);
        assert_eq!(body["returnedPageCount"], 3);
        assert!(body.get("lastPagesExtracted").is_none());
    }

    #[tokio::test]
    async fn test_last_pages_json_base64() {
        let encoded = format!("data:application/pdf;base64,{}", STANDARD.encode(sample_pdf(5)));
        let response = post_json(
            ResponseFormat::Base64,
            "/last-pages",
            json!({ "base64": encoded, "pages": 2 }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["originalPageCount"], 5);
        assert_eq!(body["returnedPageCount"], 2);
        assert_eq!(body["lastPagesExtracted"], 2);
        assert_eq!(body["fileName"], "document-last-pages.pdf");

        let pdf = STANDARD.decode(body["data"].as_str().unwrap()).unwrap();
        assert_eq!(page_labels(&pdf), vec!["Page 4", "Page 5"]);
    }

    #[tokio::test]
    async fn test_last_two_pages() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/last-two-pages",
            &sample_pdf(4),
            &[],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 3", "Page 4"]);
    }

    #[tokio::test]
    async fn test_last_two_pages_single_page_document() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/last-two-pages",
            &sample_pdf(1),
            &[],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("(1)"));
    }

    #[tokio::test]
    async fn test_first_last_pages_overlap() {
        let response = post_multipart(
            ResponseFormat::Base64,
            "/first-last-pages",
            &sample_pdf(4),
            &[("firstPages", "3"), ("lastPages", "3")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["firstPagesExtracted"], 1);
        assert_eq!(body["lastPagesExtracted"], 3);
        assert_eq!(body["returnedPageCount"], 4);
    }

    #[tokio::test]
    async fn test_first_last_pages_binary() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/first-last-pages",
            &sample_pdf(6),
            &[("firstPages", "2"), ("lastPages", "1")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 1", "Page 2", "Page 6"]);
    }

    #[tokio::test]
    async fn test_first_last_pages_both_zero() {
        let encoded = STANDARD.encode(sample_pdf(5));
        let response = post_json(
            ResponseFormat::Base64,
            "/first-last-pages",
            json!({ "base64": encoded, "firstPages": 0, "lastPages": 0 }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing required field"));
    }

    #[tokio::test]
    async fn test_pages_exceed_document() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/trim",
            &sample_pdf(3),
            &[("pages", "4")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("(3)"));
    }

    #[tokio::test]
    async fn test_invalid_pages_value() {
        for value in ["abc", "0", "-2"] {
            let response = post_multipart(
                ResponseFormat::Binary,
                "/last-pages",
                &sample_pdf(3),
                &[("pages", value)],
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{value}");
            let body = json_body(response).await;
            assert!(body["error"].as_str().unwrap().contains("pages"));
        }
    }

    #[tokio::test]
    async fn test_missing_pages() {
        let response =
            post_multipart(ResponseFormat::Binary, "/trim", &sample_pdf(3), &[]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Missing required field: pages");
    }

    #[tokio::test]
    async fn test_invalid_document() {
        let response = post_multipart(
            ResponseFormat::Binary,
            "/trim",
            b"this is not a pdf",
            &[("pages", "1")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid PDF document"));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let response = post_json(ResponseFormat::Binary, "/trim", json!({ "pages": 1 })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let request = Request::post("/trim")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("pages=1"))
            .unwrap();
        let response = router(config(ResponseFormat::Binary))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = config(ResponseFormat::Base64);
        config.max_upload_bytes = 64;

        let encoded = STANDARD.encode(sample_pdf(3));
        let request = Request::post("/trim")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "base64": encoded, "pages": 1 }).to_string()))
            .unwrap();
        let response = router(config).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
