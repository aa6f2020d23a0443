//! Liveness report for `/api/health`

use chrono::{DateTime, Utc};
use serde::Serialize;
use spendview_domain::ProviderEnvironment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    /// Provider deployment the server reads from
    pub environment: ProviderEnvironment,
}

impl HealthReport {
    pub fn healthy(environment: ProviderEnvironment, now: DateTime<Utc>) -> Self {
        Self {
            status: "healthy",
            timestamp: now,
            version: env!("CARGO_PKG_VERSION"),
            environment,
        }
    }
}
