//! sdg-tracker
//!
//! The classifier's caller: persists activities, runs classification,
//! replaces impact sets, and computes goal and dashboard summaries.

pub mod audit;
pub mod error;
pub mod service;
pub mod stats;

pub use error::TrackerError;
pub use service::{ActivityDetail, ActivityFilter, DEFAULT_INSTITUTION, ImpactTracker};
