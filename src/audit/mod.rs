//! Product audit scanning
//!
//! The [`AuditHandler`] composes three collaborators, each behind a trait so
//! it can be replaced independently:
//!
//! - [`ImageValidator`] - structural check of uploaded bytes
//! - [`ImageDecoder`] - optional identifier extraction from a valid image
//! - [`ProductLookup`] - identifier to [`AuditRecord`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use auditscan::audit::{AuditHandler, ScanRequest};
//!
//! let handler = AuditHandler::default();
//! let records = handler.scan(ScanRequest::with_identifier("ABC123")).await?;
//! assert_eq!(records[0].barcode, "ABC123");
//! ```

mod decoder;
mod handler;
mod lookup;
mod traits;
pub(crate) mod types;
pub(crate) mod validator;

pub use decoder::NoopDecoder;
pub use handler::{AuditHandler, ScanError};
pub use lookup::StaticLookup;
pub use traits::{ImageDecoder, ImageValidationError, ImageValidator, LookupError, ProductLookup};
pub use types::{
    AuditRecord, HealthSummary, IdentifierPrecedence, ImageInfo, SafetyStatus, ScanRequest,
};
pub use validator::DecodingValidator;
