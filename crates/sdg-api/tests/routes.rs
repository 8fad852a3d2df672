use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use sdg_api::router;
use sdg_api::state::AppState;
use sdg_classifier::provider::{ClassificationProvider, MockProvider};
use sdg_classifier::{Classifier, ClassifierSettings};
use sdg_storage::{ActivityStore, MemoryStore};

const REPLY: &str = r#"```json
{"impacts": [
    {"sdg_number": 4, "relevance_score": 88, "justification": "Teacher training."},
    {"sdg_number": 10, "relevance_score": 41, "justification": "Rural access."}
]}
```"#;

fn app(classifier: Classifier) -> Router {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn ActivityStore>;
    router(AppState::new(store, Arc::new(classifier)))
}

fn mock_app() -> Router {
    app(Classifier::new(
        ClassifierSettings::default(),
        Some(Arc::new(MockProvider::replying(REPLY)) as Arc<dyn ClassificationProvider>),
    ))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, user: Uuid) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user.to_string())
        .body(Body::empty())
        .unwrap()
}

fn activity_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Training rural primary school teachers in digital literacy.",
        "category": "outreach",
    })
}

async fn create(app: &Router, user: Uuid, title: &str) -> Value {
    let (status, body) = send(
        app,
        json_request("POST", "/activities", Some(user), activity_body(title)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_reports_unconfigured_classifier() {
    let app = app(Classifier::unconfigured());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier"], "unconfigured");
    assert!(body["provider"].is_null());
}

#[tokio::test]
async fn goal_catalog_and_unknown_goal() {
    let app = app(Classifier::unconfigured());

    let (status, body) = send(&app, get("/goals")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 17);

    let (status, body) = send(&app, get("/goals/13")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], 13);

    let (status, _) = send(&app, get("/goals/18")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get("/goals/0/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_user_header() {
    let app = mock_app();
    let (status, body) = send(
        &app,
        json_request("POST", "/activities", None, activity_body("Digital literacy")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let app = mock_app();
    let (status, body) = send(
        &app,
        json_request("POST", "/activities", Some(Uuid::new_v4()), activity_body("   ")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_classifies_and_lists_by_goal() {
    let app = mock_app();
    let user = Uuid::new_v4();
    let created = create(&app, user, "Digital literacy").await;

    assert_eq!(created["activity"]["auto_classified"], true);
    let impacts = created["impacts"].as_array().unwrap();
    assert_eq!(impacts.len(), 2);
    assert_eq!(impacts[0]["goal_number"], 4);
    assert_eq!(impacts[0]["score"], 88);

    let (status, body) = send(&app, get("/goals/4/activities")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, get("/activities?goal=16")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/activities?category=poetry")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, summary) = send(&app, get("/goals/4/summary")).await;
    assert_eq!(summary["total_activities"], 1);
    assert_eq!(summary["max_score"], 88);

    let (_, stats) = send(&app, get("/dashboard/stats")).await;
    assert_eq!(stats["total_activities"], 1);
    assert_eq!(stats["total_impacts"], 2);
    assert_eq!(stats["by_category"]["outreach"]["count"], 1);
    assert_eq!(stats["by_category"]["outreach"]["average_score"], 64.5);
    assert_eq!(stats["top_authors"][0]["author_id"], user.to_string());
}

#[tokio::test]
async fn reclassify_replaces_impacts() {
    let app = mock_app();
    let user = Uuid::new_v4();
    let created = create(&app, user, "Digital literacy").await;
    let id = created["activity"]["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            empty_request("POST", &format!("/activities/{id}/reclassify"), user),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["impacts"].as_array().unwrap().len(), 2);
    }

    let (_, detail) = send(&app, get(&format!("/activities/{id}"))).await;
    assert_eq!(detail["impacts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn only_owner_may_modify() {
    let app = mock_app();
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let created = create(&app, owner, "Digital literacy").await;
    let id = created["activity"]["id"].as_str().unwrap().to_string();
    let uri = format!("/activities/{id}");

    let (status, _) = send(
        &app,
        json_request("PUT", &uri, Some(other), json!({"title": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, empty_request("DELETE", &uri, other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request("PUT", &uri, Some(owner), json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (status, _) = send(&app, empty_request("DELETE", &uri, owner)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_activity_is_not_found() {
    let app = mock_app();
    let (status, _) = send(&app, get(&format!("/activities/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        empty_request(
            "POST",
            &format!("/activities/{}/reclassify", Uuid::new_v4()),
            Uuid::new_v4(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evidence_upload_attaches_document() {
    let app = mock_app();
    let user = Uuid::new_v4();
    let created = create(&app, user, "Digital literacy").await;
    let id = created["activity"]["id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("PUT")
        .uri(format!("/activities/{id}/evidence?filename=report.pdf"))
        .header("x-user-id", user.to_string())
        .header(header::CONTENT_TYPE, "application/pdf")
        .body(Body::from(vec![0x25, 0x50, 0x44, 0x46]))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["evidence"]["filename"], "report.pdf");
    assert_eq!(body["evidence"]["size"], 4);
    assert_eq!(body["evidence"]["content_type"], "application/pdf");
}

#[tokio::test]
async fn metrics_record_and_list() {
    let app = mock_app();
    let user = Uuid::new_v4();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/metrics",
            Some(user),
            json!({"institution": "UoN", "year": 1990, "goal_number": 4, "score": 50.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/metrics",
            Some(user),
            json!({"institution": "UoN", "year": 2024, "goal_number": 4, "score": 71.5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/metrics")).await;
    let metrics = body.as_array().unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0]["year"], 2024);
}

#[tokio::test]
async fn metric_id_comes_from_server() {
    let app = mock_app();
    let supplied = Uuid::new_v4();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/metrics",
            Some(Uuid::new_v4()),
            json!({
                "id": supplied,
                "institution": "UoN",
                "year": 2024,
                "goal_number": 4,
                "score": 71.5,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert_ne!(id, supplied);
}

#[tokio::test]
async fn malformed_body_is_json_bad_request() {
    let app = mock_app();
    let user = Uuid::new_v4();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/metrics",
            Some(user),
            json!({"institution": "UoN", "year": 2024, "goal_number": 99, "score": 10.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        json_request("POST", "/activities", Some(user), json!({"title": "t"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let req = Request::post("/activities")
        .header("x-user-id", user.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_path_and_query_are_json_bad_request() {
    let app = mock_app();

    let (status, body) = send(&app, get("/activities/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/goals/four")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/activities?goal=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn trends_group_impacts_by_year_and_goal() {
    let app = mock_app();
    create(&app, Uuid::new_v4(), "Digital literacy").await;
    create(&app, Uuid::new_v4(), "Teacher mentoring").await;

    let (status, body) = send(&app, get("/analytics/trends")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0]["goal_number"], 4);
    assert_eq!(trends[0]["count"], 2);
    assert_eq!(trends[0]["average_score"], 88.0);
    assert_eq!(body["date_range"]["start"], 2020);

    let (_, body) = send(&app, get("/analytics/trends?goal=10")).await;
    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0]["goal_number"], 10);

    let (status, _) = send(&app, get("/analytics/trends?goal=18")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn benchmarks_compare_home_with_peers() {
    let app = mock_app();
    let user = Uuid::new_v4();
    create(&app, user, "Digital literacy").await;

    let peer = json!({"name": "Strathmore", "total_sdg_score": 9, "projects_count": 12});
    let (status, _) = send(&app, json_request("POST", "/benchmarks", None, peer.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, json_request("POST", "/benchmarks", Some(user), peer)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Strathmore");

    let (status, body) = send(
        &app,
        json_request("POST", "/benchmarks", Some(user), json!({"name": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/benchmarks")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["is_home"], true);
    assert_eq!(rows[0]["total_sdg_score"], 2);
    assert_eq!(rows[1]["name"], "Strathmore");
    assert_eq!(rows[1]["projects_count"], 12);
}
