use async_trait::async_trait;

use super::traits::{LookupError, ProductLookup};
use super::types::{AuditRecord, HealthSummary, SafetyStatus};

/// Fixed sample lookup.
///
/// Every identifier maps to the same verified record with no flagged
/// chemicals. Swap in a registry-backed [`ProductLookup`] for real data.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLookup;

impl StaticLookup {
    pub fn record_for(identifier: &str) -> AuditRecord {
        AuditRecord {
            found: true,
            barcode: identifier.to_string(),
            name: "Authenticated Product Sample".to_string(),
            brand: "Audit Core Labs".to_string(),
            origin: "Verified Registry".to_string(),
            ingredients: "Sample ingredient data for verification purposes.".to_string(),
            health: HealthSummary::new(SafetyStatus::Good, "Level 1 (Natural)", Vec::new()),
        }
    }
}

#[async_trait]
impl ProductLookup for StaticLookup {
    async fn lookup(&self, identifier: &str) -> Result<AuditRecord, LookupError> {
        Ok(Self::record_for(identifier))
    }
}
