//! Dashboard orchestration

pub mod ports;
pub mod service;

pub use ports::{CacheStore, ExpenseDataSource};
pub use service::{build_view, DashboardService, DashboardView, DataOrigin, LoadedDataset};
