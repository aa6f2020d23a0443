//! Port interfaces for the dashboard
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use spendview_domain::{ProviderDataset, Result};

/// Source of raw expense data (the provider API in production)
#[async_trait]
pub trait ExpenseDataSource: Send + Sync {
    /// Fetch every listing once.
    ///
    /// Partial failures are reported through `ProviderDataset::warnings`;
    /// an `Err` means nothing could be retrieved.
    async fn fetch_dataset(&self) -> Result<ProviderDataset>;
}

/// Storage slot for a single serialized snapshot
pub trait CacheStore: Send + Sync {
    /// The stored payload, if any
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored payload
    fn write(&self, payload: &str) -> Result<()>;

    /// Remove the stored payload; a no-op when empty
    fn clear(&self) -> Result<()>;
}
