//! # SpendView Domain
//!
//! Business domain types and models for SpendView.
//!
//! This crate contains:
//! - Raw provider record shapes (card transactions, reimbursements, reference tables)
//! - The unified transaction view model and filter/sort specifications
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other SpendView crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::dates::parse_instant;
