//! # SpendView Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Record normalisation of provider data
//! - The filter / sort / aggregate engine and CSV export
//! - The snapshot cache and the dashboard service
//! - Port interfaces (traits) for data sources and cache storage
//!
//! ## Architecture Principles
//! - Only depends on `spendview-domain`
//! - No HTTP, filesystem, or platform code
//! - All external dependencies via traits

pub mod cache;
pub mod dashboard;
pub mod engine;
pub mod export;
pub mod normalize;

pub use cache::{is_valid, SnapshotCache};
pub use dashboard::{
    build_view, CacheStore, DashboardService, DashboardView, DataOrigin, ExpenseDataSource,
    LoadedDataset,
};
pub use engine::{
    DepartmentTotal, FilterEngine, FilterOptions, FilteredView, MonthOption, MonthTotal, Summary,
    TypeOption,
};
pub use export::to_csv;
pub use normalize::{normalize, normalize_with_report, Normalized};
