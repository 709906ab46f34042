//! ETSI key delivery handlers
//!
//! ETSI GS QKD 014 layers its own "methods" on top of HTTP verbs:
//! `/api/v1/keys/{sae_id}/{method}` with `method` one of `status`,
//! `enc_keys` or `dec_keys`.
//!
//! Role assignment differs per method:
//! - `enc_keys`: the caller is the master, the path SAE is the slave
//! - `dec_keys`: the path SAE is the master, the caller is the slave

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use kme_core::{KeyContainers, KeyIdList, KeyIdRef};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::status::status_descriptor;
use crate::api::identity::SaeIdentity;
use crate::config::KmeConfig;
use crate::kme::KeyManagementEntity;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// Key lifecycle engine
    pub kme: KeyManagementEntity,
    /// KME configuration
    pub config: KmeConfig,
}

/// The ETSI method named in the last path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtsiMethod {
    Status,
    EncKeys,
    DecKeys,
}

impl EtsiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtsiMethod::Status => "status",
            EtsiMethod::EncKeys => "enc_keys",
            EtsiMethod::DecKeys => "dec_keys",
        }
    }
}

impl FromStr for EtsiMethod {
    type Err = ApiError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "status" => Ok(EtsiMethod::Status),
            "enc_keys" => Ok(EtsiMethod::EncKeys),
            "dec_keys" => Ok(EtsiMethod::DecKeys),
            other => Err(ApiError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// `enc_keys` parameters, from the query string (GET) or JSON body (POST)
///
/// Other ETSI body fields (`additional_slave_SAE_IDs`, extensions) are
/// accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EncKeysRequest {
    pub size: Option<u32>,
    pub number: Option<u32>,
}

impl EncKeysRequest {
    /// Parse GET query parameters; only `size` and `number` are allowed
    pub fn from_query(params: &[(String, String)]) -> Result<Self, ApiError> {
        let mut request = Self::default();

        for (name, value) in params {
            match name.as_str() {
                "size" => request.size = Some(parse_integer(name, value)?),
                "number" => request.number = Some(parse_integer(name, value)?),
                other => {
                    return Err(ApiError::BadRequest(format!(
                        "unexpected query parameter '{}'",
                        other
                    )))
                }
            }
        }

        Ok(request)
    }

    /// Parse a POST body; an empty body means all defaults
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }
}

fn parse_integer(name: &str, value: &str) -> Result<u32, ApiError> {
    value.trim().parse().map_err(|_| {
        ApiError::BadRequest(format!("'{}' must be a positive integer, got '{}'", name, value))
    })
}

/// Extract the single `key_ID` of a `dec_keys` GET
fn key_id_from_query(params: &[(String, String)]) -> Result<KeyIdRef, ApiError> {
    params
        .iter()
        .rev()
        .find(|(name, _)| name == "key_ID")
        .map(|(_, value)| KeyIdRef::new(value.as_str()))
        .ok_or_else(|| ApiError::BadRequest("missing key_ID".into()))
}

/// GET /api/v1/keys/{sae_id}/{method}
pub async fn get_keys(
    State(state): State<Arc<AppState>>,
    caller: SaeIdentity,
    Path((sae_id, method)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    match method.parse::<EtsiMethod>()? {
        EtsiMethod::Status => {
            Ok(Json(status_descriptor(&state, caller.as_str(), &sae_id)).into_response())
        }
        EtsiMethod::EncKeys => {
            let request = EncKeysRequest::from_query(&params)?;
            enc_keys(&state, &caller, &sae_id, request).await
        }
        EtsiMethod::DecKeys => {
            let key_ref = key_id_from_query(&params)?;
            dec_keys(&state, &caller, &sae_id, &[key_ref]).await
        }
    }
}

/// POST /api/v1/keys/{sae_id}/{method}
pub async fn post_keys(
    State(state): State<Arc<AppState>>,
    caller: SaeIdentity,
    Path((sae_id, method)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    match method.parse::<EtsiMethod>()? {
        EtsiMethod::EncKeys => {
            let request = EncKeysRequest::from_body(&body)?;
            enc_keys(&state, &caller, &sae_id, request).await
        }
        EtsiMethod::DecKeys => {
            let list: KeyIdList = serde_json::from_slice(&body)?;
            dec_keys(&state, &caller, &sae_id, &list.key_ids).await
        }
        EtsiMethod::Status => Err(ApiError::UnsupportedMethod("POST status".into())),
    }
}

async fn enc_keys(
    state: &AppState,
    caller: &SaeIdentity,
    slave: &str,
    request: EncKeysRequest,
) -> Result<Response, ApiError> {
    let keys = state
        .kme
        .create(caller.as_str(), slave, request.size, request.number)
        .await?;
    Ok(Json(KeyContainers::from(keys)).into_response())
}

async fn dec_keys(
    state: &AppState,
    caller: &SaeIdentity,
    master: &str,
    key_refs: &[KeyIdRef],
) -> Result<Response, ApiError> {
    let keys = state.kme.retrieve(master, caller.as_str(), key_refs).await?;
    Ok(Json(KeyContainers::from(keys)).into_response())
}
