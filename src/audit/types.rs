use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Inputs of a single scan: a typed product code, an uploaded image, both, or neither.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub identifier: Option<String>,
    pub image: Option<Bytes>,
}

impl ScanRequest {
    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            image: None,
        }
    }

    pub fn with_image(image: impl Into<Bytes>) -> Self {
        Self {
            identifier: None,
            image: Some(image.into()),
        }
    }
}

/// Product audit record returned for an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub found: bool,
    pub barcode: String,
    pub name: String,
    pub brand: String,
    pub origin: String,
    pub ingredients: String,
    pub health: HealthSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyStatus {
    Good,
    Warn,
    Bad,
}

/// Ingredient safety summary.
///
/// `chemical_count` always equals `chemical_list.len()`; build values through
/// [`HealthSummary::new`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub safety_status: SafetyStatus,
    #[serde(rename = "processing_lvl")]
    pub processing_level: String,
    pub chemical_count: u32,
    pub chemical_list: Vec<String>,
}

impl HealthSummary {
    pub fn new(
        safety_status: SafetyStatus,
        processing_level: impl Into<String>,
        chemical_list: Vec<String>,
    ) -> Self {
        Self {
            safety_status,
            processing_level: processing_level.into(),
            chemical_count: chemical_list.len() as u32,
            chemical_list,
        }
    }
}

/// Which identifier wins when both a manual code and an image-derived code exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPrecedence {
    #[default]
    Manual,
    Image,
}

impl IdentifierPrecedence {
    /// Picks the effective identifier. Empty strings never count.
    pub fn resolve(
        self,
        manual: Option<String>,
        decoded: Option<String>,
    ) -> Option<String> {
        let manual = manual.filter(|value| !value.is_empty());
        let decoded = decoded.filter(|value| !value.is_empty());

        match self {
            IdentifierPrecedence::Manual => manual.or(decoded),
            IdentifierPrecedence::Image => decoded.or(manual),
        }
    }
}

/// Format and dimensions of an image that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: String,
    pub width: u32,
    pub height: u32,
}
