use async_trait::async_trait;
use uuid::Uuid;

use sdg_core::models::activity::{Activity, EvidenceDocument};
use sdg_core::models::benchmark::BenchmarkInstitution;
use sdg_core::models::impact::Impact;
use sdg_core::models::metric::InstitutionMetric;

use crate::error::StorageError;

/// Persistence collaborator for the tracker.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn get_activity(&self, id: Uuid) -> Result<Activity, StorageError>;

    /// Load an activity with the version tag needed for `put_activity_if_match`.
    async fn get_activity_with_etag(&self, id: Uuid) -> Result<(Activity, String), StorageError>;

    async fn list_activities(&self) -> Result<Vec<Activity>, StorageError>;

    /// Insert or overwrite an activity.
    async fn put_activity(&self, activity: &Activity) -> Result<(), StorageError>;

    /// Overwrite an activity only if it is unchanged since it was loaded.
    ///
    /// `PreconditionFailed` if it changed, `NotFound` if it was deleted.
    /// Returns the new version tag.
    async fn put_activity_if_match(
        &self,
        activity: &Activity,
        expected_etag: &str,
    ) -> Result<String, StorageError>;

    /// Remove an activity along with its impacts and evidence.
    async fn delete_activity(&self, id: Uuid) -> Result<(), StorageError>;

    /// Impacts of one activity; empty if it was never classified.
    async fn get_impacts(&self, activity_id: Uuid) -> Result<Vec<Impact>, StorageError>;

    async fn list_impacts(&self) -> Result<Vec<Impact>, StorageError>;

    /// Replace the activity's whole impact set in one step. Prior rows never
    /// survive, even when `impacts` is empty.
    async fn replace_impacts(
        &self,
        activity_id: Uuid,
        impacts: &[Impact],
    ) -> Result<(), StorageError>;

    /// Drop the activity's impact set entirely.
    async fn delete_impacts(&self, activity_id: Uuid) -> Result<(), StorageError>;

    /// Store an evidence document and return its reference.
    async fn put_evidence(
        &self,
        activity_id: Uuid,
        filename: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<EvidenceDocument, StorageError>;

    async fn list_metrics(&self) -> Result<Vec<InstitutionMetric>, StorageError>;

    async fn put_metric(&self, metric: &InstitutionMetric) -> Result<(), StorageError>;

    async fn list_benchmarks(&self) -> Result<Vec<BenchmarkInstitution>, StorageError>;

    async fn put_benchmark(&self, benchmark: &BenchmarkInstitution) -> Result<(), StorageError>;
}
