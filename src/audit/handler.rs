use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::decoder::NoopDecoder;
use super::lookup::StaticLookup;
use super::traits::{ImageDecoder, ImageValidator, LookupError, ProductLookup};
use super::types::{AuditRecord, IdentifierPrecedence, ImageInfo, ScanRequest};
use super::validator::DecodingValidator;
use crate::config::AuditConfig;

/// Logical scan failures. These are reported to the caller in the response
/// body, never as transport errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid Image: {0}")]
    InvalidImage(String),
    #[error("No ID or Image provided")]
    MissingInput,
    #[error("Lookup Failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Audit request handler.
///
/// Validates an optional image, resolves the effective identifier and
/// performs a single lookup. Holds no per-request state.
#[derive(Clone)]
pub struct AuditHandler {
    validator: Arc<dyn ImageValidator>,
    decoder: Arc<dyn ImageDecoder>,
    lookup: Arc<dyn ProductLookup>,
    precedence: IdentifierPrecedence,
    lookup_timeout: Duration,
}

impl AuditHandler {
    pub fn new(
        validator: Arc<dyn ImageValidator>,
        decoder: Arc<dyn ImageDecoder>,
        lookup: Arc<dyn ProductLookup>,
    ) -> Self {
        let defaults = AuditConfig::default();
        Self {
            validator,
            decoder,
            lookup,
            precedence: defaults.identifier_precedence,
            lookup_timeout: Duration::from_millis(defaults.lookup_timeout_ms),
        }
    }

    /// Built-in collaborators configured from `[audit]`
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(
            Arc::new(DecodingValidator::from_config(&config.image)),
            Arc::new(NoopDecoder),
            Arc::new(StaticLookup),
        )
        .with_precedence(config.identifier_precedence)
        .with_lookup_timeout(Duration::from_millis(config.lookup_timeout_ms))
    }

    pub fn with_precedence(mut self, precedence: IdentifierPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn ProductLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn precedence(&self) -> IdentifierPrecedence {
        self.precedence
    }

    pub async fn scan(&self, request: ScanRequest) -> Result<Vec<AuditRecord>, ScanError> {
        let ScanRequest { identifier, image } = request;

        let decoded = match image {
            Some(image) => {
                let info = self.validate_image(image.clone()).await?;
                tracing::debug!(
                    format = %info.format,
                    width = info.width,
                    height = info.height,
                    "Image passed validation"
                );
                self.decoder.decode(&image, &info).await
            }
            None => None,
        };

        let identifier = self
            .precedence
            .resolve(identifier, decoded)
            .ok_or(ScanError::MissingInput)?;

        let record = tokio::time::timeout(self.lookup_timeout, self.lookup.lookup(&identifier))
            .await
            .map_err(|_| LookupError::Timeout(self.lookup_timeout.as_millis() as u64))??;

        Ok(vec![record])
    }

    async fn validate_image(&self, image: Bytes) -> Result<ImageInfo, ScanError> {
        let validator = Arc::clone(&self.validator);

        tokio::task::spawn_blocking(move || validator.validate(&image))
            .await
            .map_err(|e| ScanError::InvalidImage(format!("decoder aborted: {}", e)))?
            .map_err(|e| ScanError::InvalidImage(e.to_string()))
    }
}

impl Default for AuditHandler {
    fn default() -> Self {
        Self::from_config(&AuditConfig::default())
    }
}
