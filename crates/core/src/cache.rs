//! Snapshot cache over an injected [`CacheStore`]
//!
//! Holds the raw dataset of the last successful fetch. Writes replace the
//! stored snapshot wholesale; a failed write is logged and otherwise
//! ignored. Reads hand back nothing for a missing, stale or unreadable
//! entry, and an entry that cannot be parsed at all is removed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use spendview_domain::constants::{
    CACHE_CLOCK_SKEW_SECS, CACHE_MAX_AGE_HOURS, CACHE_SCHEMA_VERSION,
};
use spendview_domain::{CachedSnapshot, ProviderDataset};
use tracing::{debug, warn};

use crate::dashboard::ports::CacheStore;

#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn CacheStore>,
    max_age: Duration,
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache").field("max_age", &self.max_age).finish_non_exhaustive()
    }
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store, max_age: Duration::hours(CACHE_MAX_AGE_HOURS) }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn save(&self, dataset: &ProviderDataset) {
        self.save_at(dataset, Utc::now());
    }

    pub fn save_at(&self, dataset: &ProviderDataset, now: DateTime<Utc>) {
        let snapshot = CachedSnapshot::new(dataset.clone(), now);
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize dataset snapshot");
                return;
            }
        };

        match self.store.write(&payload) {
            Ok(()) => debug!(
                transactions = dataset.transactions.len(),
                reimbursements = dataset.reimbursements.len(),
                "dataset snapshot cached"
            ),
            Err(err) => warn!(error = %err, "failed to write dataset snapshot"),
        }
    }

    pub fn load(&self) -> Option<CachedSnapshot> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Option<CachedSnapshot> {
        let payload = match self.store.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read dataset snapshot");
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&payload) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "discarding unreadable dataset snapshot");
                self.clear();
                return None;
            }
        };

        if !is_valid(&value, now, self.max_age) {
            debug!("cached snapshot is stale or incomplete");
            return None;
        }

        match serde_json::from_value(value) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "discarding malformed dataset snapshot");
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear dataset snapshot");
        }
    }
}

/// Whether a stored snapshot may be used at `now`.
///
/// Requires the current schema version, a `cachedAt` no older than `max_age`
/// and not ahead of `now` beyond clock skew, and array-valued `transactions`
/// and `reimbursements`.
pub fn is_valid(snapshot: &Value, now: DateTime<Utc>, max_age: Duration) -> bool {
    let Some(cached_at) = snapshot
        .get("cachedAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    else {
        return false;
    };

    let age = now.signed_duration_since(cached_at.with_timezone(&Utc));
    if age > max_age || age < -Duration::seconds(CACHE_CLOCK_SKEW_SECS) {
        return false;
    }

    snapshot.get("version").and_then(Value::as_str) == Some(CACHE_SCHEMA_VERSION)
        && snapshot.get("transactions").is_some_and(Value::is_array)
        && snapshot.get("reimbursements").is_some_and(Value::is_array)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::engine::test_rows::instant;

    fn stored(cached_at: &str) -> Value {
        json!({
            "version": CACHE_SCHEMA_VERSION,
            "cachedAt": cached_at,
            "transactions": [],
            "reimbursements": [],
        })
    }

    #[test]
    fn freshness_boundary_is_twenty_four_hours() {
        let now = instant("2025-03-02T12:00:00Z");
        let max_age = Duration::hours(24);

        assert!(is_valid(&stored("2025-03-01T12:00:01Z"), now, max_age));
        assert!(is_valid(&stored("2025-03-01T12:00:00Z"), now, max_age));
        assert!(!is_valid(&stored("2025-03-01T11:59:59Z"), now, max_age));
    }

    #[test]
    fn future_timestamps_are_rejected_beyond_clock_skew() {
        let now = instant("2025-03-02T12:00:00Z");
        let max_age = Duration::hours(24);

        assert!(is_valid(&stored("2025-03-02T12:00:30Z"), now, max_age));
        assert!(!is_valid(&stored("2025-03-02T12:05:00Z"), now, max_age));
        assert!(!is_valid(&stored("2035-03-02T12:00:00Z"), now, max_age));
    }

    #[test]
    fn requires_timestamp_arrays_and_version() {
        let now = instant("2025-03-02T12:00:00Z");
        let max_age = Duration::hours(24);

        let mut missing_time = stored("2025-03-02T11:00:00Z");
        missing_time.as_object_mut().unwrap().remove("cachedAt");
        assert!(!is_valid(&missing_time, now, max_age));

        let mut not_array = stored("2025-03-02T11:00:00Z");
        not_array["reimbursements"] = json!({"data": []});
        assert!(!is_valid(&not_array, now, max_age));

        let mut old_version = stored("2025-03-02T11:00:00Z");
        old_version["version"] = json!("1");
        assert!(!is_valid(&old_version, now, max_age));

        assert!(!is_valid(&json!("garbage"), now, max_age));
    }
}
