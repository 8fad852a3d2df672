use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use sdg_core::models::activity::{Activity, EvidenceDocument};
use sdg_core::models::benchmark::BenchmarkInstitution;
use sdg_core::models::impact::Impact;
use sdg_core::models::metric::InstitutionMetric;
use sdg_core::storage_keys;

use crate::error::StorageError;
use crate::store::ActivityStore;

/// A stored activity and its write counter, which serves as the ETag.
struct Versioned {
    activity: Activity,
    version: u64,
}

/// In-process store. Used for tests and when no bucket is configured.
#[derive(Default)]
pub struct MemoryStore {
    activities: RwLock<HashMap<Uuid, Versioned>>,
    impacts: RwLock<HashMap<Uuid, Vec<Impact>>>,
    evidence: RwLock<HashMap<String, Vec<u8>>>,
    metrics: RwLock<HashMap<Uuid, InstitutionMetric>>,
    benchmarks: RwLock<HashMap<Uuid, BenchmarkInstitution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of a stored evidence document.
    pub async fn evidence_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.evidence.read().await.get(key).cloned()
    }
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::NotFound {
        key: storage_keys::activity(id),
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn get_activity(&self, id: Uuid) -> Result<Activity, StorageError> {
        self.activities
            .read()
            .await
            .get(&id)
            .map(|v| v.activity.clone())
            .ok_or_else(|| not_found(id))
    }

    async fn get_activity_with_etag(&self, id: Uuid) -> Result<(Activity, String), StorageError> {
        self.activities
            .read()
            .await
            .get(&id)
            .map(|v| (v.activity.clone(), v.version.to_string()))
            .ok_or_else(|| not_found(id))
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, StorageError> {
        Ok(self
            .activities
            .read()
            .await
            .values()
            .map(|v| v.activity.clone())
            .collect())
    }

    async fn put_activity(&self, activity: &Activity) -> Result<(), StorageError> {
        let mut activities = self.activities.write().await;
        let version = activities.get(&activity.id).map_or(0, |v| v.version + 1);
        activities.insert(
            activity.id,
            Versioned {
                activity: activity.clone(),
                version,
            },
        );
        Ok(())
    }

    async fn put_activity_if_match(
        &self,
        activity: &Activity,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let mut activities = self.activities.write().await;
        let entry = activities
            .get_mut(&activity.id)
            .ok_or_else(|| not_found(activity.id))?;

        if entry.version.to_string() != expected_etag {
            return Err(StorageError::PreconditionFailed {
                key: storage_keys::activity(activity.id),
            });
        }
        entry.activity = activity.clone();
        entry.version += 1;
        Ok(entry.version.to_string())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<(), StorageError> {
        // Activity first, so a concurrent conditional write sees NotFound.
        self.activities.write().await.remove(&id);
        self.impacts.write().await.remove(&id);
        let prefix = storage_keys::evidence_prefix(id);
        self.evidence
            .write()
            .await
            .retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    async fn get_impacts(&self, activity_id: Uuid) -> Result<Vec<Impact>, StorageError> {
        Ok(self
            .impacts
            .read()
            .await
            .get(&activity_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_impacts(&self) -> Result<Vec<Impact>, StorageError> {
        Ok(self.impacts.read().await.values().flatten().cloned().collect())
    }

    async fn replace_impacts(
        &self,
        activity_id: Uuid,
        impacts: &[Impact],
    ) -> Result<(), StorageError> {
        self.impacts
            .write()
            .await
            .insert(activity_id, impacts.to_vec());
        Ok(())
    }

    async fn delete_impacts(&self, activity_id: Uuid) -> Result<(), StorageError> {
        self.impacts.write().await.remove(&activity_id);
        Ok(())
    }

    async fn put_evidence(
        &self,
        activity_id: Uuid,
        filename: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<EvidenceDocument, StorageError> {
        let key = storage_keys::evidence(activity_id, filename);
        let size = body.len() as u64;
        self.evidence.write().await.insert(key.clone(), body);

        Ok(EvidenceDocument {
            filename: filename.to_string(),
            key,
            content_type: content_type.map(str::to_string),
            size,
        })
    }

    async fn list_metrics(&self) -> Result<Vec<InstitutionMetric>, StorageError> {
        Ok(self.metrics.read().await.values().cloned().collect())
    }

    async fn put_metric(&self, metric: &InstitutionMetric) -> Result<(), StorageError> {
        self.metrics.write().await.insert(metric.id, metric.clone());
        Ok(())
    }

    async fn list_benchmarks(&self) -> Result<Vec<BenchmarkInstitution>, StorageError> {
        Ok(self.benchmarks.read().await.values().cloned().collect())
    }

    async fn put_benchmark(&self, benchmark: &BenchmarkInstitution) -> Result<(), StorageError> {
        self.benchmarks
            .write()
            .await
            .insert(benchmark.id, benchmark.clone());
        Ok(())
    }
}
