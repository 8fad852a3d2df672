use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::info;
use uuid::Uuid;

use sdg_core::models::activity::{Activity, EvidenceDocument};
use sdg_core::models::benchmark::BenchmarkInstitution;
use sdg_core::models::impact::Impact;
use sdg_core::models::metric::InstitutionMetric;
use sdg_core::storage_keys;

use crate::error::StorageError;
use crate::objects;
use crate::state;
use crate::store::ActivityStore;

/// Store backed by one S3 bucket, laid out per `storage_keys`.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ActivityStore for S3Store {
    async fn get_activity(&self, id: Uuid) -> Result<Activity, StorageError> {
        state::load_json(&self.client, &self.bucket, &storage_keys::activity(id)).await
    }

    async fn get_activity_with_etag(&self, id: Uuid) -> Result<(Activity, String), StorageError> {
        state::load_json_with_etag(&self.client, &self.bucket, &storage_keys::activity(id)).await
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, StorageError> {
        state::load_all_json(&self.client, &self.bucket, storage_keys::ACTIVITIES_PREFIX).await
    }

    async fn put_activity(&self, activity: &Activity) -> Result<(), StorageError> {
        let key = storage_keys::activity(activity.id);
        state::save_json(&self.client, &self.bucket, &key, activity).await?;
        Ok(())
    }

    async fn put_activity_if_match(
        &self,
        activity: &Activity,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let key = storage_keys::activity(activity.id);
        state::save_json_if_match(&self.client, &self.bucket, &key, activity, expected_etag).await
    }

    async fn delete_activity(&self, id: Uuid) -> Result<(), StorageError> {
        // Activity first, so a concurrent conditional write sees NotFound.
        objects::delete_object(&self.client, &self.bucket, &storage_keys::activity(id)).await?;
        objects::delete_object(&self.client, &self.bucket, &storage_keys::activity_impacts(id))
            .await?;
        let evidence = objects::delete_objects_by_prefix(
            &self.client,
            &self.bucket,
            &storage_keys::evidence_prefix(id),
        )
        .await?;

        info!(activity_id = %id, evidence, "activity deleted");
        Ok(())
    }

    async fn get_impacts(&self, activity_id: Uuid) -> Result<Vec<Impact>, StorageError> {
        let key = storage_keys::activity_impacts(activity_id);
        Ok(state::load_json_opt(&self.client, &self.bucket, &key)
            .await?
            .unwrap_or_default())
    }

    async fn list_impacts(&self) -> Result<Vec<Impact>, StorageError> {
        let sets: Vec<Vec<Impact>> =
            state::load_all_json(&self.client, &self.bucket, storage_keys::IMPACTS_PREFIX).await?;
        Ok(sets.into_iter().flatten().collect())
    }

    async fn replace_impacts(
        &self,
        activity_id: Uuid,
        impacts: &[Impact],
    ) -> Result<(), StorageError> {
        let key = storage_keys::activity_impacts(activity_id);
        state::save_json(&self.client, &self.bucket, &key, &impacts).await?;
        Ok(())
    }

    async fn delete_impacts(&self, activity_id: Uuid) -> Result<(), StorageError> {
        let key = storage_keys::activity_impacts(activity_id);
        objects::delete_object(&self.client, &self.bucket, &key).await
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
        objects::put_object(&self.client, &self.bucket, &key, body, content_type).await?;

        Ok(EvidenceDocument {
            filename: filename.to_string(),
            key,
            content_type: content_type.map(str::to_string),
            size,
        })
    }

    async fn list_metrics(&self) -> Result<Vec<InstitutionMetric>, StorageError> {
        state::load_all_json(&self.client, &self.bucket, storage_keys::METRICS_PREFIX).await
    }

    async fn put_metric(&self, metric: &InstitutionMetric) -> Result<(), StorageError> {
        let key = storage_keys::metric(metric.id);
        state::save_json(&self.client, &self.bucket, &key, metric).await?;
        Ok(())
    }

    async fn list_benchmarks(&self) -> Result<Vec<BenchmarkInstitution>, StorageError> {
        state::load_all_json(&self.client, &self.bucket, storage_keys::BENCHMARKS_PREFIX).await
    }

    async fn put_benchmark(&self, benchmark: &BenchmarkInstitution) -> Result<(), StorageError> {
        let key = storage_keys::benchmark(benchmark.id);
        state::save_json(&self.client, &self.bucket, &key, benchmark).await?;
        Ok(())
    }
}
