//! Dashboard service - cached dataset, live refresh with fallback, filtering

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use spendview_domain::{FilterSpec, ProviderDataset, Result, SortSpec, UnifiedTransaction};
use tracing::{info, warn};

use super::ports::ExpenseDataSource;
use crate::cache::SnapshotCache;
use crate::engine::{DepartmentTotal, FilterEngine, FilterOptions, MonthTotal, Summary};
use crate::export::to_csv;
use crate::normalize::normalize_with_report;

/// Where the dataset behind a view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Cache,
}

/// A dataset together with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: ProviderDataset,
    pub origin: DataOrigin,
    /// Fetch time for live data, snapshot time for cached data
    pub last_updated: DateTime<Utc>,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub rows: Vec<UnifiedTransaction>,
    pub summary: Summary,
    pub departments: Vec<DepartmentTotal>,
    pub monthly: Vec<MonthTotal>,
    pub options: FilterOptions,
    pub origin: DataOrigin,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

pub struct DashboardService {
    source: Arc<dyn ExpenseDataSource>,
    cache: SnapshotCache,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ExpenseDataSource>, cache: SnapshotCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Fetch from the provider and replace the cached snapshot.
    pub async fn fetch_live(&self) -> Result<ProviderDataset> {
        let dataset = self.source.fetch_dataset().await?;
        self.cache.save(&dataset);
        Ok(dataset)
    }

    /// Live data when the provider answers, otherwise the cached snapshot
    /// if one is still valid.
    pub async fn refresh(&self) -> Result<LoadedDataset> {
        match self.fetch_live().await {
            Ok(dataset) => Ok(LoadedDataset {
                dataset,
                origin: DataOrigin::Live,
                last_updated: Utc::now(),
            }),
            Err(err) => {
                let Some(snapshot) = self.cache.load() else {
                    warn!(error = %err, "live fetch failed and no usable snapshot is cached");
                    return Err(err);
                };
                warn!(error = %err, cached_at = %snapshot.cached_at, "serving cached snapshot");

                let mut dataset = snapshot.dataset;
                dataset.warnings.push(format!(
                    "Live data unavailable ({}); showing data cached at {}",
                    err.reason_code(),
                    snapshot.cached_at.to_rfc3339()
                ));
                Ok(LoadedDataset {
                    dataset,
                    origin: DataOrigin::Cache,
                    last_updated: snapshot.cached_at,
                })
            }
        }
    }

    /// The cached snapshot while it is valid; a refresh otherwise.
    ///
    /// Filter and sort changes recompute over the same dataset, so a view
    /// and the export that follows it see identical rows.
    pub async fn current(&self) -> Result<LoadedDataset> {
        match self.cache.load() {
            Some(snapshot) => Ok(LoadedDataset {
                dataset: snapshot.dataset,
                origin: DataOrigin::Cache,
                last_updated: snapshot.cached_at,
            }),
            None => self.refresh().await,
        }
    }

    pub async fn view(&self, filters: &FilterSpec, sort: &SortSpec) -> Result<DashboardView> {
        let loaded = self.current().await?;
        Ok(build_view(loaded, filters, sort, Utc::now()))
    }

    /// Refresh from the provider, then build the view.
    pub async fn refreshed_view(
        &self,
        filters: &FilterSpec,
        sort: &SortSpec,
    ) -> Result<DashboardView> {
        let loaded = self.refresh().await?;
        Ok(build_view(loaded, filters, sort, Utc::now()))
    }

    /// CSV of the rows `view` would show for the same filters and sort.
    pub async fn export_csv(&self, filters: &FilterSpec, sort: &SortSpec) -> Result<String> {
        let loaded = self.current().await?;
        let rows = normalize_with_report(&loaded.dataset).rows;
        let view = FilterEngine::new(&loaded.dataset.receipt_table()).apply(&rows, filters, sort);
        to_csv(&view.rows)
    }
}

/// Normalise `loaded` and derive the view as of `now`.
pub fn build_view(
    loaded: LoadedDataset,
    filters: &FilterSpec,
    sort: &SortSpec,
    now: DateTime<Utc>,
) -> DashboardView {
    let normalized = normalize_with_report(&loaded.dataset);
    let engine = FilterEngine::new(&loaded.dataset.receipt_table()).at(now);
    let filtered = engine.apply(&normalized.rows, filters, sort);

    info!(
        origin = ?loaded.origin,
        total = normalized.rows.len(),
        visible = filtered.rows.len(),
        skipped = normalized.skipped,
        "dashboard view built"
    );

    let mut warnings = loaded.dataset.warnings;
    if normalized.skipped > 0 {
        warnings.push(format!("{} malformed records were skipped", normalized.skipped));
    }

    DashboardView {
        options: engine.options(&normalized.rows),
        rows: filtered.rows,
        summary: filtered.summary,
        departments: filtered.departments,
        monthly: filtered.monthly,
        origin: loaded.origin,
        warnings,
        last_updated: loaded.last_updated,
    }
}
