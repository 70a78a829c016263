use super::models::{Config, CorsConfig};
use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;

/// Hard ceiling for `server.max_upload_bytes`
pub const MAX_UPLOAD_LIMIT: u64 = 100 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max_upload_bytes must be positive")]
    ZeroUploadLimit,

    #[error("max_upload_bytes ({actual}) exceeds limit of 100MB ({limit})")]
    UploadLimitTooLarge { actual: u64, limit: u64 },

    #[error("lookup_timeout_ms must be positive")]
    ZeroLookupTimeout,

    #[error("Image limit must be positive: {field}")]
    ZeroImageLimit { field: &'static str },

    #[error("CORS {field} mixes '*' with explicit entries")]
    MixedWildcard { field: &'static str },

    #[error("CORS {field} entry '{value}' is invalid")]
    InvalidCorsEntry { field: &'static str, value: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_audit(config)?;
    validate_cors(&config.cors)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let actual = config.server.max_upload_bytes.as_u64();
    if actual == 0 {
        return Err(ValidationError::ZeroUploadLimit);
    }
    if actual > MAX_UPLOAD_LIMIT {
        return Err(ValidationError::UploadLimitTooLarge {
            actual,
            limit: MAX_UPLOAD_LIMIT,
        });
    }
    Ok(())
}

fn validate_audit(config: &Config) -> Result<(), ValidationError> {
    let audit = &config.audit;
    if audit.lookup_timeout_ms == 0 {
        return Err(ValidationError::ZeroLookupTimeout);
    }

    let image = &audit.image;
    if image.max_width == 0 {
        return Err(ValidationError::ZeroImageLimit { field: "max_width" });
    }
    if image.max_height == 0 {
        return Err(ValidationError::ZeroImageLimit { field: "max_height" });
    }
    if image.max_alloc.as_u64() == 0 {
        return Err(ValidationError::ZeroImageLimit { field: "max_alloc" });
    }
    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ValidationError> {
    check_entries("allowed_origins", &cors.allowed_origins, |v| {
        HeaderValue::from_str(v).is_ok()
    })?;
    check_entries("allowed_methods", &cors.allowed_methods, |v| {
        Method::from_bytes(v.as_bytes()).is_ok()
    })?;
    check_entries("allowed_headers", &cors.allowed_headers, |v| {
        HeaderName::from_bytes(v.as_bytes()).is_ok()
    })?;
    Ok(())
}

/// `*` must stand alone; everything else has to parse
fn check_entries(
    field: &'static str,
    entries: &[String],
    parses: impl Fn(&str) -> bool,
) -> Result<(), ValidationError> {
    let has_wildcard = entries.iter().any(|e| e == "*");
    if has_wildcard && entries.len() > 1 {
        return Err(ValidationError::MixedWildcard { field });
    }
    if has_wildcard {
        return Ok(());
    }

    match entries.iter().find(|e| !parses(e.as_str())) {
        Some(bad) => Err(ValidationError::InvalidCorsEntry {
            field,
            value: bad.clone(),
        }),
        None => Ok(()),
    }
}
