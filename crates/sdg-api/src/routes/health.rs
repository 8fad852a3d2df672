use axum::Json;
use axum::extract::State;
use serde::Serialize;

use sdg_classifier::ClassifierStats;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub classifier: &'static str,
    pub provider: Option<String>,
    pub classifier_stats: ClassifierStats,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    let classifier = state.tracker.classifier();
    Json(Health {
        status: "ok",
        classifier: if classifier.is_configured() {
            "configured"
        } else {
            "unconfigured"
        },
        provider: classifier.provider_name().map(str::to_string),
        classifier_stats: classifier.stats(),
    })
}
