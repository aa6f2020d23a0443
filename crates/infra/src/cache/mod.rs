//! [`CacheStore`](spendview_core::CacheStore) adapters

pub mod file;
pub mod memory;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;
