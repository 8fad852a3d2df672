//! sdg-classifier
//!
//! Maps activity text to scored goal associations through an external
//! generative-AI provider, with a silent degraded mode when the provider is
//! unconfigured or failing.

pub mod classifier;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod response;

pub use classifier::{Classifier, ClassifierConfig, ClassifierSettings, ClassifierStats};
pub use error::ClassifierError;
