//! Small parsing helpers shared by the domain types.

pub mod dates;
pub mod lenient;
