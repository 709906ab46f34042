//! Request logging middleware
//!
//! Logs who called which ETSI method for which SAE, with query parameters
//! and POST payloads. Logging only: the request is passed on unchanged, and
//! bodies are buffered up to the router's own limit so the logger never
//! refuses a request the handlers would accept.
//! Payloads are `size`/`number` or key IDs; responses (key material) are
//! never logged.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::CONTENT_LENGTH, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::error::ApiError;
use crate::api::handlers::AppState;
use crate::api::MAX_REQUEST_BODY_BYTES;

/// Bytes of a POST body written to the log
const MAX_LOGGED_MEDIA: usize = 4096;

/// Headers never written to the log
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie"];

/// Split `/api/v1/keys/{sae_id}/{method}` into its parameters
pub fn etsi_target(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix("/api/v1/keys/")?;
    let (sae_id, method) = rest.split_once('/')?;
    if sae_id.is_empty() || method.is_empty() || method.contains('/') {
        return None;
    }
    Some((sae_id, method))
}

fn sanitize_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let val = if REDACTED_HEADERS.contains(&name.as_str()) {
                "<redacted>".to_string()
            } else {
                value.to_str().unwrap_or("<non-utf8>").to_string()
            };
            (name.as_str().to_string(), val)
        })
        .collect()
}

/// Log each ETSI request before it reaches the handler
pub async fn log_request(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let Some((sae_id, method)) = etsi_target(&path) else {
        return next.run(request).await;
    };

    let caller = request
        .headers()
        .get(state.config.identity_header.as_str())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<none>")
        .to_string();

    info!(
        verb = %request.method(),
        caller = %caller,
        sae_id = %sae_id,
        method = %method,
        "Received ETSI request"
    );
    debug!(headers = ?sanitize_headers(request.headers()), "Request headers");

    if let Some(query) = request.uri().query() {
        info!(params = %query, "Request parameters");
    }

    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if let Some(length) = declared.filter(|length| *length > MAX_REQUEST_BODY_BYTES) {
        warn!(length, "Request media too large to log");
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(bytes) => bytes,
        // Consumed and past the router limit: the body extractor refuses it too
        Err(e) => return ApiError::PayloadTooLarge(e.to_string()).into_response(),
    };
    info!(
        media = %media_preview(&bytes),
        length = bytes.len(),
        "Request media"
    );

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn media_preview(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(MAX_LOGGED_MEDIA)];
    let mut preview = String::from_utf8_lossy(shown).into_owned();
    if bytes.len() > MAX_LOGGED_MEDIA {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etsi_target() {
        assert_eq!(etsi_target("/api/v1/keys/sae-B/enc_keys"), Some(("sae-B", "enc_keys")));
        assert_eq!(etsi_target("/api/v1/keys/sae-B/"), None);
        assert_eq!(etsi_target("/api/v1/keys/sae-B/enc_keys/x"), None);
        assert_eq!(etsi_target("/health"), None);
    }

    #[test]
    fn test_sanitize_headers_redacts_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer secret".parse().unwrap());
        headers.insert("x-cert-cn", "sae-A".parse().unwrap());

        let sanitized = sanitize_headers(&headers);
        assert!(sanitized.contains(&("authorization".into(), "<redacted>".into())));
        assert!(sanitized.contains(&("x-cert-cn".into(), "sae-A".into())));
    }

    #[test]
    fn test_media_preview_truncates_large_bodies() {
        assert_eq!(media_preview(br#"{"number":2}"#), r#"{"number":2}"#);

        let padded = vec![b'x'; MAX_LOGGED_MEDIA * 2];
        let preview = media_preview(&padded);
        assert_eq!(preview.len(), MAX_LOGGED_MEDIA + 3);
        assert!(preview.ends_with("..."));
    }
}
