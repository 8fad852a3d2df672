//! Object key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! the tracker's bucket.

use uuid::Uuid;

pub const ACTIVITIES_PREFIX: &str = "activities/";
pub const IMPACTS_PREFIX: &str = "impacts/";
pub const METRICS_PREFIX: &str = "metrics/";
pub const BENCHMARKS_PREFIX: &str = "benchmarks/";

pub fn activity(id: Uuid) -> String {
    format!("activities/{id}.json")
}

/// The whole impact set for one activity lives in a single object, so
/// replacing it is one write.
pub fn activity_impacts(id: Uuid) -> String {
    format!("impacts/{id}.json")
}

pub fn evidence_prefix(id: Uuid) -> String {
    format!("evidence/{id}/")
}

pub fn evidence(id: Uuid, filename: &str) -> String {
    format!("evidence/{id}/{filename}")
}

pub fn metric(id: Uuid) -> String {
    format!("metrics/{id}.json")
}

pub fn benchmark(id: Uuid) -> String {
    format!("benchmarks/{id}.json")
}
