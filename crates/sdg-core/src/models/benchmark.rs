use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// Stored headline figures for a peer institution, compared against the
/// live figures of the home institution.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BenchmarkInstitution {
    pub id: Uuid,
    /// Unique, compared case-insensitively.
    pub name: String,
    pub total_sdg_score: u32,
    pub projects_count: u32,
    pub publications_count: u32,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBenchmark {
    pub name: String,
    #[serde(default)]
    pub total_sdg_score: u32,
    #[serde(default)]
    pub projects_count: u32,
    #[serde(default)]
    pub publications_count: u32,
}

impl BenchmarkInstitution {
    pub fn create(input: NewBenchmark, now: jiff::Timestamp) -> Result<Self, CoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CoreError::MissingField("name".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            total_sdg_score: input.total_sdg_score,
            projects_count: input.projects_count,
            publications_count: input.publications_count,
            updated_at: now,
        })
    }
}
