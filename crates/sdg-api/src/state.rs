use std::sync::Arc;

use sdg_classifier::Classifier;
use sdg_storage::ActivityStore;
use sdg_tracker::ImpactTracker;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub tracker: ImpactTracker,
}

impl AppState {
    pub fn new(store: Arc<dyn ActivityStore>, classifier: Arc<Classifier>) -> Self {
        Self {
            tracker: ImpactTracker::new(store, classifier),
        }
    }
}
