use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use super::types::{AuditRecord, ImageInfo};

#[derive(Debug, Error)]
pub enum ImageValidationError {
    #[error("empty image payload")]
    Empty,
    #[error("cannot identify image format")]
    UnknownFormat,
    #[error("{0} data is truncated (missing end marker)")]
    Truncated(String),
    #[error("decoded image has zero dimensions")]
    ZeroDimensions,
    #[error("{0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("product not found: {0}")]
    NotFound(String),
    #[error("lookup timed out after {0} ms")]
    Timeout(u64),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Structural image check.
///
/// Synchronous because decoding is CPU-bound; the handler runs it on the
/// blocking pool.
pub trait ImageValidator: Send + Sync {
    fn validate(&self, bytes: &[u8]) -> Result<ImageInfo, ImageValidationError>;
}

/// Extracts a product identifier from image content.
///
/// Only called with bytes that already passed validation. Returning `None`
/// means the image carried no readable code.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, image: &Bytes, info: &ImageInfo) -> Option<String>;
}

/// Resolves an identifier to an audit record
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn lookup(&self, identifier: &str) -> Result<AuditRecord, LookupError>;
}
