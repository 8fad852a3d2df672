use std::collections::HashSet;
use std::sync::Arc;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sdg_classifier::Classifier;
use sdg_core::models::activity::{Activity, ActivityCategory, ActivityUpdate, NewActivity};
use sdg_core::models::benchmark::{BenchmarkInstitution, NewBenchmark};
use sdg_core::models::goal::GoalNumber;
use sdg_core::models::impact::Impact;
use sdg_core::models::metric::{InstitutionMetric, NewMetric};
use sdg_storage::ActivityStore;
use sdg_storage::error::StorageError;

use crate::audit::AuditEvent;
use crate::error::TrackerError;
use crate::stats::{self, BenchmarkRow, DashboardStats, GoalSummary, Trends};

/// Name of the live row in benchmark comparisons unless configured.
pub const DEFAULT_INSTITUTION: &str = "Home institution";

/// Conditional writes retried before giving up with `Conflict`.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// An activity with its current impact set.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityDetail {
    pub activity: Activity,
    pub impacts: Vec<Impact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub goal: Option<GoalNumber>,
    pub category: Option<ActivityCategory>,
    pub author_id: Option<Uuid>,
}

/// Activity lifecycle around the classifier.
///
/// The classifier never touches storage; this service persists whatever it
/// returns and keeps `auto_classified` in step with the stored impact set.
/// Activity writes are conditional on the version that was read, so edits
/// and deletes made while a classification is in flight are never undone.
#[derive(Clone)]
pub struct ImpactTracker {
    store: Arc<dyn ActivityStore>,
    classifier: Arc<Classifier>,
    institution: String,
}

impl ImpactTracker {
    pub fn new(store: Arc<dyn ActivityStore>, classifier: Arc<Classifier>) -> Self {
        Self {
            store,
            classifier,
            institution: DEFAULT_INSTITUTION.to_string(),
        }
    }

    /// Name used for the live row of `benchmark_comparison`.
    pub fn with_institution(mut self, name: impl Into<String>) -> Self {
        self.institution = name.into();
        self
    }

    pub fn institution(&self) -> &str {
        &self.institution
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Persist a new activity, then classify it.
    ///
    /// Succeeds whatever the classifier outcome; an unclassified activity is
    /// stored with `auto_classified = false` and no impacts.
    pub async fn create_activity(
        &self,
        author_id: Uuid,
        input: NewActivity,
    ) -> Result<ActivityDetail, TrackerError> {
        let activity = Activity::create(author_id, input, jiff::Timestamp::now())?;
        self.store.put_activity(&activity).await?;

        let (activity, impacts) = self.classify_and_store(&activity).await?;

        AuditEvent::new("activity.create", activity.id, Some(author_id))
            .with_details(json!({ "impacts": impacts.len() }))
            .emit();

        Ok(ActivityDetail { activity, impacts })
    }

    /// Classify again and replace the whole impact set.
    ///
    /// Prior impacts never survive: if the classifier returns nothing, the
    /// activity ends up unclassified. An activity deleted while the provider
    /// call is in flight stays deleted and yields `NotFound`.
    pub async fn reclassify(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<ActivityDetail, TrackerError> {
        let activity = self.load(id).await?;
        let previous = self.store.get_impacts(id).await?.len();

        let (activity, impacts) = self.classify_and_store(&activity).await?;

        AuditEvent::new("activity.reclassify", id, actor)
            .with_details(json!({ "previous": previous, "current": impacts.len() }))
            .emit();

        Ok(ActivityDetail { activity, impacts })
    }

    pub async fn get_activity(&self, id: Uuid) -> Result<ActivityDetail, TrackerError> {
        let activity = self.load(id).await?;
        let impacts = self.store.get_impacts(id).await?;
        Ok(ActivityDetail { activity, impacts })
    }

    /// Activities matching every set filter, newest first.
    pub async fn list_activities(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<Activity>, TrackerError> {
        let linked: Option<HashSet<Uuid>> = match filter.goal {
            Some(goal) => Some(
                self.store
                    .list_impacts()
                    .await?
                    .into_iter()
                    .filter(|i| i.goal_number == goal)
                    .map(|i| i.activity_id)
                    .collect(),
            ),
            None => None,
        };

        let mut activities: Vec<Activity> = self
            .store
            .list_activities()
            .await?
            .into_iter()
            .filter(|a| filter.category.is_none_or(|c| a.category == c))
            .filter(|a| filter.author_id.is_none_or(|id| a.author_id == id))
            .filter(|a| linked.as_ref().is_none_or(|ids| ids.contains(&a.id)))
            .collect();

        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(activities)
    }

    /// Author-only partial update. Does not reclassify.
    pub async fn update_activity(
        &self,
        id: Uuid,
        actor: Uuid,
        update: ActivityUpdate,
    ) -> Result<Activity, TrackerError> {
        let now = jiff::Timestamp::now();
        let activity = self
            .modify(id, Some(actor), |a| Ok(a.apply(update.clone(), now)?))
            .await?;

        AuditEvent::new("activity.update", id, Some(actor)).emit();
        Ok(activity)
    }

    pub async fn delete_activity(&self, id: Uuid, actor: Uuid) -> Result<(), TrackerError> {
        self.load_owned(id, actor).await?;
        self.store.delete_activity(id).await?;

        AuditEvent::new("activity.delete", id, Some(actor)).emit();
        Ok(())
    }

    /// Store an evidence document and attach it to the activity.
    pub async fn attach_evidence(
        &self,
        id: Uuid,
        actor: Uuid,
        filename: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Activity, TrackerError> {
        self.load_owned(id, actor).await?;
        let filename = sanitize_filename(filename);

        let document = self
            .store
            .put_evidence(id, &filename, content_type, body)
            .await?;
        let now = jiff::Timestamp::now();
        let activity = self
            .modify(id, Some(actor), |a| {
                a.evidence = Some(document.clone());
                a.updated_at = now;
                Ok(())
            })
            .await?;

        AuditEvent::new("activity.evidence", id, Some(actor))
            .with_details(json!({ "filename": filename }))
            .emit();
        Ok(activity)
    }

    pub async fn goal_summary(&self, goal: GoalNumber) -> Result<GoalSummary, TrackerError> {
        let impacts = self.store.list_impacts().await?;
        Ok(stats::goal_summary(goal, &impacts))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, TrackerError> {
        let activities = self.store.list_activities().await?;
        let impacts = self.store.list_impacts().await?;
        Ok(stats::dashboard_stats(&activities, &impacts))
    }

    pub async fn list_metrics(&self) -> Result<Vec<InstitutionMetric>, TrackerError> {
        let mut metrics = self.store.list_metrics().await?;
        metrics.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(a.goal_number.cmp(&b.goal_number))
                .then(a.institution.cmp(&b.institution))
        });
        Ok(metrics)
    }

    /// Record a metric with a server-assigned id. A metric for the same
    /// institution, year and goal is replaced, keeping its id.
    pub async fn record_metric(&self, input: NewMetric) -> Result<InstitutionMetric, TrackerError> {
        let mut metric = InstitutionMetric::create(input)?;
        let existing = self.store.list_metrics().await?;
        if let Some(prior) = existing.iter().find(|m| m.same_slot(&metric)) {
            metric.id = prior.id;
        }
        self.store.put_metric(&metric).await?;
        info!(
            metric_id = %metric.id,
            institution = %metric.institution,
            year = metric.year,
            goal = %metric.goal_number,
            "metric recorded"
        );
        Ok(metric)
    }

    /// Per-year score trends, optionally for one goal.
    pub async fn trends(&self, goal: Option<GoalNumber>) -> Result<Trends, TrackerError> {
        let impacts = self.store.list_impacts().await?;
        let current_year = jiff::Timestamp::now().to_zoned(TimeZone::UTC).year();
        Ok(stats::trends(&impacts, goal, current_year))
    }

    /// Live figures for this institution next to the stored peers.
    pub async fn benchmark_comparison(&self) -> Result<Vec<BenchmarkRow>, TrackerError> {
        let activities = self.store.list_activities().await?;
        let impacts = self.store.list_impacts().await?;
        let peers = self.store.list_benchmarks().await?;
        Ok(stats::benchmark_comparison(
            &self.institution,
            &activities,
            &impacts,
            &peers,
        ))
    }

    /// Record a peer institution. A peer with the same name (ignoring case)
    /// is replaced, keeping its id.
    pub async fn record_benchmark(
        &self,
        input: NewBenchmark,
    ) -> Result<BenchmarkInstitution, TrackerError> {
        let mut benchmark = BenchmarkInstitution::create(input, jiff::Timestamp::now())?;
        let existing = self.store.list_benchmarks().await?;
        if let Some(prior) = existing
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(&benchmark.name))
        {
            benchmark.id = prior.id;
        }
        self.store.put_benchmark(&benchmark).await?;
        info!(benchmark_id = %benchmark.id, name = %benchmark.name, "benchmark recorded");
        Ok(benchmark)
    }

    /// Classify `activity` and store the result against the current copy.
    ///
    /// Only `auto_classified` is written back, so edits made during the
    /// provider call survive.
    async fn classify_and_store(
        &self,
        activity: &Activity,
    ) -> Result<(Activity, Vec<Impact>), TrackerError> {
        let candidates = self
            .classifier
            .classify(&activity.title, &activity.description)
            .await;
        let impacts = Impact::from_candidates(activity.id, &candidates, jiff::Timestamp::now());

        // Deleted during the call: write nothing.
        self.load(activity.id).await?;

        self.store.replace_impacts(activity.id, &impacts).await?;
        let classified = !impacts.is_empty();
        let updated = match self
            .modify(activity.id, None, |a| {
                a.auto_classified = classified;
                Ok(())
            })
            .await
        {
            Ok(updated) => updated,
            Err(TrackerError::NotFound(id)) => {
                // Deleted between the two writes.
                self.store.delete_impacts(id).await?;
                return Err(TrackerError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        info!(
            activity_id = %updated.id,
            impacts = impacts.len(),
            auto_classified = updated.auto_classified,
            "activity classified"
        );
        Ok((updated, impacts))
    }

    /// Read-modify-write with an ETag precondition, retried on conflict.
    ///
    /// With `owner` set, only that author may modify the activity.
    async fn modify<F>(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        mut change: F,
    ) -> Result<Activity, TrackerError>
    where
        F: FnMut(&mut Activity) -> Result<(), TrackerError> + Send,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (mut activity, etag) = match self.store.get_activity_with_etag(id).await {
                Ok(loaded) => loaded,
                Err(StorageError::NotFound { .. }) => return Err(TrackerError::NotFound(id)),
                Err(e) => return Err(e.into()),
            };
            if let Some(actor) = owner
                && activity.author_id != actor
            {
                return Err(TrackerError::Forbidden(id));
            }

            change(&mut activity)?;

            match self.store.put_activity_if_match(&activity, &etag).await {
                Ok(_) => return Ok(activity),
                Err(StorageError::PreconditionFailed { .. }) => {
                    debug!(activity_id = %id, attempt, "activity changed concurrently, retrying");
                }
                Err(StorageError::NotFound { .. }) => return Err(TrackerError::NotFound(id)),
                Err(e) => return Err(e.into()),
            }
        }

        warn!(activity_id = %id, attempts = MAX_WRITE_ATTEMPTS, "gave up on conflicting writes");
        Err(TrackerError::Conflict(id))
    }

    async fn load(&self, id: Uuid) -> Result<Activity, TrackerError> {
        match self.store.get_activity(id).await {
            Ok(activity) => Ok(activity),
            Err(StorageError::NotFound { .. }) => Err(TrackerError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_owned(&self, id: Uuid, actor: Uuid) -> Result<Activity, TrackerError> {
        let activity = self.load(id).await?;
        if activity.author_id != actor {
            return Err(TrackerError::Forbidden(id));
        }
        Ok(activity)
    }
}

/// Reduce a client-supplied filename to a safe single key segment.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "evidence".to_string()
    } else {
        cleaned.to_string()
    }
}
