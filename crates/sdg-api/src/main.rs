use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sdg_api::config::ApiConfig;
use sdg_api::router;
use sdg_api::state::AppState;
use sdg_classifier::Classifier;
use sdg_storage::{ActivityStore, MemoryStore, S3Store};
use sdg_tracker::ImpactTracker;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let store: Arc<dyn ActivityStore> = match &config.bucket {
        Some(bucket) => {
            let s3 = sdg_storage::client::build_client().await;
            tracing::info!(bucket = %bucket, "using s3 store");
            Arc::new(S3Store::new(s3, bucket.clone()))
        }
        None => {
            tracing::warn!("SDG_BUCKET not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let classifier = Arc::new(Classifier::from_config(config.classifier.clone()).await?);
    let tracker = ImpactTracker::new(store, classifier).with_institution(config.institution.clone());
    let app = router(AppState { tracker });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
