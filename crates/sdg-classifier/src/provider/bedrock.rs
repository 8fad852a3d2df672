//! AWS Bedrock provider using the Converse API.
//!
//! Credentials come from the AWS default chain; the classifier treats the
//! provider as configured once a model ID is set.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};

use sdg_core::models::token_count::TokenCount;

use super::{ClassificationProvider, ProviderReply};
use crate::error::ClassifierError;

pub struct BedrockProvider {
    client: Client,
    model_id: String,
    name: String,
}

impl BedrockProvider {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        Self {
            client: Client::new(config),
            name: format!("bedrock:{model_id}"),
            model_id,
        }
    }

    /// Load the AWS default config (optionally pinned to a region) and build a provider.
    pub async fn from_env(model_id: impl Into<String>, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(&config, model_id)
    }
}

#[async_trait]
impl ClassificationProvider for BedrockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ProviderReply, ClassifierError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|e| ClassifierError::Invocation(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(message)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_throttling_exception() {
                    ClassifierError::RateLimited
                } else {
                    ClassifierError::Invocation(err.to_string())
                }
            })?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| ClassifierError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = response
            .usage()
            .map(|u| token_count(u.input_tokens, u.output_tokens));

        Ok(ProviderReply { text, usage })
    }
}

/// Bedrock reports usage as `i32`; a negative count is treated as zero.
fn token_count(input: i32, output: i32) -> TokenCount {
    TokenCount {
        input: u64::try_from(input).unwrap_or_default(),
        output: u64::try_from(output).unwrap_or_default(),
    }
}
