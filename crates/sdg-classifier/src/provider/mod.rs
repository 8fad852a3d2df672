//! Outbound classification providers.
//!
//! A provider turns a system prompt and a user message into the model's raw
//! text reply. Parsing and validation happen in the classifier, so providers
//! stay thin.

pub mod bedrock;
pub mod gemini;
pub mod mock;

use async_trait::async_trait;

use sdg_core::models::token_count::TokenCount;

use crate::error::ClassifierError;

pub use bedrock::BedrockProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;

/// Raw reply from a provider, before parsing.
#[derive(Debug, Clone, Default)]
pub struct ProviderReply {
    pub text: String,
    pub usage: Option<TokenCount>,
}

#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    /// Identifier used in logs, e.g. `gemini:gemini-1.5-flash`.
    fn name(&self) -> &str;

    /// Send one request and return the model's text reply.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ProviderReply, ClassifierError>;
}
