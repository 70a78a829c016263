use crate::audit::IdentifierPrecedence;
use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Request body limit for `POST /scan`
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_upload_bytes() -> ByteSize {
    ByteSize::mib(10)
}

/// Cross-origin policy. A single `"*"` entry allows anything.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "wildcard")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "wildcard")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "wildcard")]
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: wildcard(),
            allowed_methods: wildcard(),
            allowed_headers: wildcard(),
        }
    }
}

fn wildcard() -> Vec<String> {
    vec!["*".to_string()]
}

/// Scan pipeline settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub identifier_precedence: IdentifierPrecedence,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    #[serde(default)]
    pub image: ImageConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            identifier_precedence: IdentifierPrecedence::default(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            image: ImageConfig::default(),
        }
    }
}

fn default_lookup_timeout_ms() -> u64 {
    5000
}

/// Decoder limits applied while validating uploads
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    #[serde(default = "default_max_alloc")]
    pub max_alloc: ByteSize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            max_alloc: default_max_alloc(),
        }
    }
}

fn default_max_dimension() -> u32 {
    16384
}

fn default_max_alloc() -> ByteSize {
    ByteSize::mib(512)
}
