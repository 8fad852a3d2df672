use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use eyre::{WrapErr, eyre};

use sdg_classifier::classifier::{ClassifierSettings, ProviderConfig};
use sdg_classifier::ClassifierConfig;
use sdg_classifier::provider::gemini;
use sdg_tracker::DEFAULT_INSTITUTION;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Unset means the in-memory store.
    pub bucket: Option<String>,
    /// Name of the live row in benchmark comparisons.
    pub institution: String,
    pub classifier: ClassifierConfig,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        // Empty values are treated as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("SDG_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .wrap_err("SDG_BIND_ADDR is not a socket address")?;

        let mut settings = ClassifierSettings::default();
        if let Some(secs) = var("SDG_CLASSIFIER_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .wrap_err("SDG_CLASSIFIER_TIMEOUT_SECS is not a whole number")?;
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = var("SDG_CLASSIFIER_MAX_RESULTS") {
            settings.max_results = max
                .trim()
                .parse()
                .wrap_err("SDG_CLASSIFIER_MAX_RESULTS is not a whole number")?;
            if settings.max_results == 0 {
                return Err(eyre!("SDG_CLASSIFIER_MAX_RESULTS must be at least 1"));
            }
        }

        let provider_kind = var("SDG_CLASSIFIER_PROVIDER").unwrap_or_else(|| "gemini".to_string());
        let provider = match provider_kind.trim().to_ascii_lowercase().as_str() {
            "gemini" => var("GEMINI_API_KEY").map(|api_key| ProviderConfig::Gemini {
                api_key,
                model: var("SDG_GEMINI_MODEL").unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
            }),
            "bedrock" => var("SDG_BEDROCK_MODEL_ID").map(|model_id| ProviderConfig::Bedrock {
                model_id,
                region: var("AWS_REGION"),
            }),
            other => return Err(eyre!("unknown SDG_CLASSIFIER_PROVIDER '{other}'")),
        };

        Ok(Self {
            bind_addr,
            bucket: var("SDG_BUCKET"),
            institution: var("SDG_INSTITUTION_NAME")
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| DEFAULT_INSTITUTION.to_string()),
            classifier: ClassifierConfig { provider, settings },
        })
    }
}
