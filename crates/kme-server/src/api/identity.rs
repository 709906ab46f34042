//! Caller identity binding
//!
//! The TLS terminator authenticates the SAE's client certificate and copies
//! its common name into a trusted header (`X-CERT-CN` by default). The
//! payload never names the caller. A request without the header is refused.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Verified identity of the calling SAE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaeIdentity(pub String);

impl SaeIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the identity from `header`, failing closed when absent or unreadable
    pub fn from_parts(parts: &Parts, header: &str) -> Result<Self, ApiError> {
        let value = parts
            .headers
            .get(header)
            .ok_or_else(|| ApiError::Unauthorized("Client certificate identity missing".into()))?;

        let identity = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Client certificate identity unreadable".into()))?
            .trim();

        if identity.is_empty() {
            return Err(ApiError::Unauthorized("Client certificate identity missing".into()));
        }

        Ok(Self(identity.to_string()))
    }
}

impl FromRequestParts<Arc<AppState>> for SaeIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts, &state.config.identity_header).inspect_err(|_| {
            warn!(
                uri = %parts.uri,
                header = %state.config.identity_header,
                "SECURITY: request without client certificate identity"
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/keys/sae-B/status");
        if let Some(value) = header {
            builder = builder.header("X-CERT-CN", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_identity_from_header() {
        let identity = SaeIdentity::from_parts(&parts(Some("sae-A")), "X-CERT-CN").unwrap();
        assert_eq!(identity.as_str(), "sae-A");
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let identity = SaeIdentity::from_parts(&parts(Some("sae-A")), "x-cert-cn").unwrap();
        assert_eq!(identity, SaeIdentity("sae-A".into()));
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = SaeIdentity::from_parts(&parts(None), "X-CERT-CN").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_blank_header_rejected() {
        let err = SaeIdentity::from_parts(&parts(Some("  ")), "X-CERT-CN").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
