//! sdg-core
//!
//! Pure domain types for SDG impact tracking: the 17-goal catalog,
//! activities, impacts, benchmarking metrics and peer institutions, and storage
//! key conventions.
//! No network or AWS SDK dependency.

pub mod error;
pub mod models;
pub mod storage_keys;
