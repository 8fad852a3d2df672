pub mod activities;
pub mod analytics;
pub mod benchmarks;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod metrics;
