//! # drizzle-core
//! Foundation types, trait seams, and the pure pipeline stages of the
//! Drizzle distribution engine: holder aggregation, eligibility filtering,
//! and proportional allocation.

pub mod allocation;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod holders;
pub mod traits;
pub mod types;
