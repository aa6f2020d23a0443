//! Persisted last-good dataset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::ProviderDataset;
use crate::constants::CACHE_SCHEMA_VERSION;

/// The dataset of the last successful fetch, stamped with when it was taken.
///
/// Serialized flat: `{version, cachedAt, transactions, reimbursements, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub version: String,
    pub cached_at: DateTime<Utc>,
    #[serde(flatten)]
    pub dataset: ProviderDataset,
}

impl CachedSnapshot {
    pub fn new(dataset: ProviderDataset, cached_at: DateTime<Utc>) -> Self {
        Self { version: CACHE_SCHEMA_VERSION.to_string(), cached_at, dataset }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_flat_with_version_and_timestamp() {
        let snapshot = CachedSnapshot::new(
            ProviderDataset { transactions: vec![json!({"id": "t1"})], ..Default::default() },
            DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z").unwrap().with_timezone(&Utc),
        );

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["version"], CACHE_SCHEMA_VERSION);
        assert_eq!(json["cachedAt"], "2025-03-01T12:00:00Z");
        assert_eq!(json["transactions"][0]["id"], "t1");
        assert!(json["reimbursements"].is_array());

        let back: CachedSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
