//! Domain types and models
//!
//! - `raw`: provider record shapes, exactly as the spend API returns them
//! - `unified`: the single view model both record kinds normalise into
//! - `filters`: filter and sort specifications consumed by the engine
//! - `snapshot`: the persisted last-good dataset

pub mod filters;
pub mod raw;
pub mod snapshot;
pub mod unified;

pub use filters::{FilterSpec, MonthSelection, Selection, SortColumn, SortDirection, SortSpec};
pub use raw::{
    Memo, ProviderDataset, RawAccountingCategory, RawCardHolder, RawCardTransaction,
    RawCategoryInfo, RawFieldSelection, RawMerchantLocation, RawReimbursement, Receipt,
    SpendProgram,
};
pub use snapshot::CachedSnapshot;
pub use unified::{TransactionKind, UnifiedTransaction};
