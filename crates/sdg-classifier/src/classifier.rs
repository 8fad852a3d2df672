//! The goal classifier.
//!
//! `classify` never fails: an unconfigured provider, a provider error, a
//! timeout, or an unreadable reply all yield an empty result, which callers
//! treat as "needs manual classification". Failures are logged and counted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use sdg_core::models::goal::{self, Goal};
use sdg_core::models::impact::ImpactCandidate;

use crate::error::ClassifierError;
use crate::prompt;
use crate::provider::{BedrockProvider, ClassificationProvider, GeminiProvider, gemini};
use crate::response;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierSettings {
    /// Keep at most this many goals, highest score first.
    pub max_results: usize,
    /// Bound on a single provider call.
    pub timeout: Duration,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Which provider to call, with its credential.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        model: String,
        base_url: String,
    },
    Bedrock {
        model_id: String,
        region: Option<String>,
    },
}

impl ProviderConfig {
    /// Gemini against the public endpoint with the default model.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        ProviderConfig::Gemini {
            api_key: api_key.into(),
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
        }
    }

    // An empty credential counts as absent.
    fn is_blank(&self) -> bool {
        match self {
            ProviderConfig::Gemini { api_key, .. } => api_key.trim().is_empty(),
            ProviderConfig::Bedrock { model_id, .. } => model_id.trim().is_empty(),
        }
    }
}

/// Explicit classifier configuration. `provider: None` is a valid,
/// silent state: every classification returns no impacts.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    pub provider: Option<ProviderConfig>,
    pub settings: ClassifierSettings,
}

/// Counter snapshot for operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassifierStats {
    pub attempts: u64,
    pub failures: u64,
    pub unconfigured: u64,
}

pub struct Classifier {
    provider: Option<Arc<dyn ClassificationProvider>>,
    settings: ClassifierSettings,
    goals: Vec<Goal>,
    attempts: AtomicU64,
    failures: AtomicU64,
    unconfigured: AtomicU64,
}

impl Classifier {
    pub fn new(
        settings: ClassifierSettings,
        provider: Option<Arc<dyn ClassificationProvider>>,
    ) -> Self {
        Self {
            provider,
            settings,
            goals: goal::catalog(),
            attempts: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            unconfigured: AtomicU64::new(0),
        }
    }

    /// A classifier with no provider.
    pub fn unconfigured() -> Self {
        Self::new(ClassifierSettings::default(), None)
    }

    /// Build the configured provider, if any.
    pub async fn from_config(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let provider: Option<Arc<dyn ClassificationProvider>> =
            match config.provider.filter(|p| !p.is_blank()) {
                None => None,
                Some(ProviderConfig::Gemini {
                    api_key,
                    model,
                    base_url,
                }) => {
                    let gemini = GeminiProvider::new(api_key, model, base_url)?;
                    Some(Arc::new(gemini) as Arc<dyn ClassificationProvider>)
                }
                Some(ProviderConfig::Bedrock { model_id, region }) => {
                    let bedrock = BedrockProvider::from_env(model_id, region).await;
                    Some(Arc::new(bedrock) as Arc<dyn ClassificationProvider>)
                }
            };

        match &provider {
            Some(p) => info!(provider = p.name(), "classifier configured"),
            None => warn!("no classification provider configured; activities will need manual classification"),
        }

        Ok(Self::new(config.settings, provider))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    pub fn stats(&self) -> ClassifierStats {
        ClassifierStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            unconfigured: self.unconfigured.load(Ordering::Relaxed),
        }
    }

    /// Classify an activity. Never fails; see the module docs.
    pub async fn classify(&self, title: &str, description: &str) -> Vec<ImpactCandidate> {
        match self.try_classify(title, description).await {
            Ok(candidates) => candidates,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    provider = self.provider_name().unwrap_or("none"),
                    error = %e,
                    "classification failed; returning no impacts"
                );
                Vec::new()
            }
        }
    }

    /// Classify an activity, surfacing provider and parse errors.
    ///
    /// An unconfigured classifier returns `Ok` with no candidates.
    pub async fn try_classify(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Vec<ImpactCandidate>, ClassifierError> {
        let Some(provider) = self.provider.as_deref() else {
            self.unconfigured.fetch_add(1, Ordering::Relaxed);
            debug!("classifier unconfigured; skipping");
            return Ok(Vec::new());
        };

        self.attempts.fetch_add(1, Ordering::Relaxed);

        let system_prompt = prompt::build_system_prompt(&self.goals, self.settings.max_results);
        let user_message = prompt::build_user_message(title, description);

        let reply = tokio::time::timeout(
            self.settings.timeout,
            provider.complete(&system_prompt, &user_message),
        )
        .await
        .map_err(|_| ClassifierError::Timeout(self.settings.timeout))??;

        let parsed = response::parse_response(&reply.text)?;
        let candidates = response::rank(parsed.candidates, self.settings.max_results);

        info!(
            provider = provider.name(),
            candidates = candidates.len(),
            rejected = parsed.rejected,
            input_tokens = reply.usage.map(|u| u.input),
            output_tokens = reply.usage.map(|u| u.output),
            "classification complete"
        );

        Ok(candidates)
    }
}
