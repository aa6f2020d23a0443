//! Ramp (spend-management provider) integration

pub mod client;
pub mod pagination;
pub mod source;

pub use client::{Paged, RampClient, Resource};
pub use pagination::{next_page, NextPage};
pub use source::RampDataSource;
