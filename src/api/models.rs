//! Wire models for the scan API.
//!
//! - `GET /` returns a [`HealthResponse`]
//! - `POST /scan` returns a [`ScanResponse`], always with status 200 unless the
//!   request itself could not be read
//!
//! # Scan Response
//!
//! ```json
//! {
//!   "success": true,
//!   "data": [
//!     {
//!       "details": {
//!         "found": true,
//!         "barcode": "ABC123",
//!         "name": "Authenticated Product Sample",
//!         "brand": "Audit Core Labs",
//!         "origin": "Verified Registry",
//!         "ingredients": "Sample ingredient data for verification purposes.",
//!         "health": {
//!           "safety_status": "GOOD",
//!           "processing_lvl": "Level 1 (Natural)",
//!           "chemical_count": 0,
//!           "chemical_list": []
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! or, on a logical failure:
//!
//! ```json
//! { "success": false, "error": "No ID or Image provided" }
//! ```

use serde::{Deserialize, Serialize};

use crate::audit::{AuditRecord, ScanError};

pub const FRAMEWORK: &str = "axum";
pub const HEALTH_STATUS: &str = "Registry Link Active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub details: AuditRecord,
}

/// Outcome of `POST /scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ScanResponseWire", try_from = "ScanResponseWire")]
pub enum ScanResponse {
    Success(Vec<ScanEntry>),
    Failure(String),
}

impl ScanResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanResponse::Success(_))
    }

    pub fn records(&self) -> impl Iterator<Item = &AuditRecord> {
        let entries: &[ScanEntry] = match self {
            ScanResponse::Success(entries) => entries,
            ScanResponse::Failure(_) => &[],
        };
        entries.iter().map(|entry| &entry.details)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScanResponse::Success(_) => None,
            ScanResponse::Failure(message) => Some(message),
        }
    }
}

impl From<Result<Vec<AuditRecord>, ScanError>> for ScanResponse {
    fn from(outcome: Result<Vec<AuditRecord>, ScanError>) -> Self {
        match outcome {
            Ok(records) => ScanResponse::Success(
                records
                    .into_iter()
                    .map(|details| ScanEntry { details })
                    .collect(),
            ),
            Err(err) => ScanResponse::Failure(err.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ScanResponseWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<ScanEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<ScanResponse> for ScanResponseWire {
    fn from(response: ScanResponse) -> Self {
        match response {
            ScanResponse::Success(entries) => Self {
                success: true,
                data: Some(entries),
                error: None,
            },
            ScanResponse::Failure(message) => Self {
                success: false,
                data: None,
                error: Some(message),
            },
        }
    }
}

impl TryFrom<ScanResponseWire> for ScanResponse {
    type Error = String;

    fn try_from(wire: ScanResponseWire) -> Result<Self, Self::Error> {
        match (wire.success, wire.data, wire.error) {
            (true, Some(entries), None) => Ok(ScanResponse::Success(entries)),
            (false, None, Some(message)) => Ok(ScanResponse::Failure(message)),
            (true, _, _) => Err("successful response must carry data and no error".into()),
            (false, _, _) => Err("failed response must carry an error and no data".into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub framework: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: HEALTH_STATUS.to_string(),
            framework: FRAMEWORK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StaticLookup;
    use serde_json::json;

    #[test]
    fn success_serializes_without_error_key() {
        let outcome: Result<_, ScanError> = Ok(vec![StaticLookup::record_for("ABC123")]);
        let response = ScanResponse::from(outcome);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"][0]["details"]["barcode"], "ABC123");
        assert_eq!(value["data"][0]["details"]["health"]["processing_lvl"], "Level 1 (Natural)");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_serializes_without_data_key() {
        let outcome: Result<Vec<AuditRecord>, _> = Err(ScanError::MissingInput);
        let response = ScanResponse::from(outcome);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({"success": false, "error": "No ID or Image provided"}));
    }

    #[test]
    fn inconsistent_wire_shape_is_rejected() {
        let result: Result<ScanResponse, _> =
            serde_json::from_value(json!({"success": true, "error": "boom"}));
        assert!(result.is_err());
    }

    #[test]
    fn accessors_follow_variant() {
        let failure = ScanResponse::Failure("Invalid Image: truncated".into());
        assert!(!failure.is_success());
        assert_eq!(failure.records().count(), 0);
        assert_eq!(failure.error(), Some("Invalid Image: truncated"));
    }
}
