//! KME configuration
//!
//! Loaded from `KME_*` environment variables at start-up.

use kme_core::{DEFAULT_KEY_NUMBER, DEFAULT_KEY_SIZE_BITS, MAX_KEY_SIZE_BITS, MIN_KEY_SIZE_BITS};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Header the TLS terminator fills with the client certificate common name
pub const DEFAULT_IDENTITY_HEADER: &str = "X-CERT-CN";

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Capacity figures advertised by the `status` method
///
/// These are static, advisory values: nothing updates them from actual
/// store occupancy and nothing enforces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLimits {
    pub target_kme_id: String,
    pub stored_key_count: u64,
    pub max_key_count: u64,
    pub max_key_per_request: u32,
    pub max_key_size: u32,
    pub min_key_size: u32,
    pub max_sae_id_count: u32,
}

impl Default for StatusLimits {
    fn default() -> Self {
        Self {
            target_kme_id: "0".into(),
            stored_key_count: 25_000,
            max_key_count: 100_000,
            max_key_per_request: 128,
            max_key_size: MAX_KEY_SIZE_BITS,
            min_key_size: MIN_KEY_SIZE_BITS,
            max_sae_id_count: 0,
        }
    }
}

/// Key Management Entity configuration
#[derive(Debug, Clone)]
pub struct KmeConfig {
    /// Identity of this KME, reported as `source_KME_ID`
    pub kme_id: String,
    /// Address to bind
    pub bind_addr: String,
    /// Port to listen on
    pub port: u16,
    /// Networked key store; in-memory storage when unset
    pub database_url: Option<String>,
    /// Key size in bits when a request does not name one
    pub default_key_size: u32,
    /// Number of keys when a request does not name one
    pub default_key_number: u32,
    /// Trusted header carrying the caller's certificate identity
    pub identity_header: String,
    /// Advertised status figures
    pub limits: StatusLimits,
}

impl KmeConfig {
    /// Configuration with defaults for everything but the KME identity
    pub fn new(kme_id: impl Into<String>) -> Self {
        Self {
            kme_id: kme_id.into(),
            bind_addr: "127.0.0.1".into(),
            port: 8001,
            database_url: None,
            default_key_size: DEFAULT_KEY_SIZE_BITS,
            default_key_number: DEFAULT_KEY_NUMBER,
            identity_header: DEFAULT_IDENTITY_HEADER.into(),
            limits: StatusLimits::default(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kme_id = lookup("KME_ID").unwrap_or_else(|| format!("kme-{}", uuid::Uuid::new_v4()));
        let mut config = Self::new(kme_id);

        if let Some(bind) = lookup("KME_BIND") {
            config.bind_addr = bind;
        }
        if let Some(port) = lookup("KME_PORT") {
            config.port = parse_var("KME_PORT", &port, "a valid port number")?;
        }
        config.database_url = lookup("KME_DATABASE_URL").filter(|url| !url.trim().is_empty());
        if let Some(size) = lookup("KME_DEFAULT_KEY_SIZE") {
            config.default_key_size = parse_positive("KME_DEFAULT_KEY_SIZE", &size)?;
        }
        if let Some(number) = lookup("KME_DEFAULT_KEY_NUMBER") {
            config.default_key_number = parse_positive("KME_DEFAULT_KEY_NUMBER", &number)?;
        }
        if let Some(header) = lookup("KME_IDENTITY_HEADER") {
            config.identity_header = header;
        }
        if let Some(target) = lookup("KME_TARGET_ID") {
            config.limits.target_kme_id = target;
        }

        Ok(config)
    }

    /// `bind_addr:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T: FromStr>(
    name: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
        expected,
    })
}

fn parse_positive(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    match parse_var::<u32>(name, value, "a positive integer")? {
        0 => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            expected: "a positive integer",
        }),
        n => Ok(n),
    }
}
