use uuid::Uuid;

use sdg_core::models::activity::{Activity, ActivityCategory, NewActivity};
use sdg_core::models::impact::{Impact, ImpactCandidate};
use sdg_storage::error::StorageError;
use sdg_storage::{ActivityStore, MemoryStore};

fn activity() -> Activity {
    Activity::create(
        Uuid::new_v4(),
        NewActivity {
            title: "Community networks".to_string(),
            description: "Bridging the digital divide.".to_string(),
            category: ActivityCategory::Outreach,
            status: None,
            external_url: None,
        },
        jiff::Timestamp::now(),
    )
    .unwrap()
}

fn impacts(activity_id: Uuid, goals: &[(i64, i64)]) -> Vec<Impact> {
    let candidates: Vec<ImpactCandidate> = goals
        .iter()
        .map(|(g, s)| ImpactCandidate::new(*g, *s, "reason").unwrap())
        .collect();
    Impact::from_candidates(activity_id, &candidates, jiff::Timestamp::now())
}

#[tokio::test]
async fn missing_activity_is_not_found() {
    let store = MemoryStore::new();
    let err = store.get_activity(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn unclassified_activity_has_no_impacts() {
    let store = MemoryStore::new();
    let a = activity();
    store.put_activity(&a).await.unwrap();
    assert!(store.get_impacts(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn replace_impacts_discards_previous_set() {
    let store = MemoryStore::new();
    let a = activity();
    store.put_activity(&a).await.unwrap();

    store
        .replace_impacts(a.id, &impacts(a.id, &[(9, 80), (4, 60)]))
        .await
        .unwrap();
    store
        .replace_impacts(a.id, &impacts(a.id, &[(10, 55)]))
        .await
        .unwrap();

    let stored = store.get_impacts(a.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].goal_number.get(), 10);

    store.replace_impacts(a.id, &[]).await.unwrap();
    assert!(store.get_impacts(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_cascades_to_impacts_and_evidence() {
    let store = MemoryStore::new();
    let a = activity();
    let other = activity();
    store.put_activity(&a).await.unwrap();
    store.put_activity(&other).await.unwrap();
    store
        .replace_impacts(a.id, &impacts(a.id, &[(9, 80)]))
        .await
        .unwrap();
    store
        .replace_impacts(other.id, &impacts(other.id, &[(4, 30)]))
        .await
        .unwrap();
    let doc = store
        .put_evidence(a.id, "report.pdf", Some("application/pdf"), b"%PDF".to_vec())
        .await
        .unwrap();
    assert_eq!(doc.size, 4);

    store.delete_activity(a.id).await.unwrap();

    assert!(store.get_activity(a.id).await.is_err());
    assert!(store.evidence_bytes(&doc.key).await.is_none());
    let remaining = store.list_impacts().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].activity_id, other.id);
}

#[tokio::test]
async fn conditional_put_rejects_stale_version() {
    let store = MemoryStore::new();
    let a = activity();
    store.put_activity(&a).await.unwrap();

    let (mut first, etag) = store.get_activity_with_etag(a.id).await.unwrap();
    let (mut second, stale) = store.get_activity_with_etag(a.id).await.unwrap();
    assert_eq!(etag, stale);

    first.title = "Edited".to_string();
    let next = store.put_activity_if_match(&first, &etag).await.unwrap();
    assert_ne!(next, etag);

    second.auto_classified = true;
    let err = store.put_activity_if_match(&second, &stale).await.unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
    assert_eq!(store.get_activity(a.id).await.unwrap().title, "Edited");
}

#[tokio::test]
async fn conditional_put_after_delete_is_not_found() {
    let store = MemoryStore::new();
    let a = activity();
    store.put_activity(&a).await.unwrap();
    let (loaded, etag) = store.get_activity_with_etag(a.id).await.unwrap();

    store.delete_activity(a.id).await.unwrap();

    let err = store.put_activity_if_match(&loaded, &etag).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(store.get_activity(a.id).await.is_err());
}
