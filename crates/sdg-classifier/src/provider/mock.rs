//! Scripted provider for tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{ClassificationProvider, ProviderReply};
use crate::error::ClassifierError;

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail(String),
}

/// Provider that returns a fixed reply (or failure), optionally after a delay.
pub struct MockProvider {
    script: Script,
    delay: Option<Duration>,
    call_count: AtomicU32,
}

impl MockProvider {
    /// Reply with the given raw text on every call.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            script: Script::Reply(text.into()),
            delay: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Fail every call with an invocation error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(message.into()),
            delay: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        _user_message: &str,
    ) -> Result<ProviderReply, ClassifierError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Reply(text) => Ok(ProviderReply {
                text: text.clone(),
                usage: None,
            }),
            Script::Fail(message) => Err(ClassifierError::Invocation(message.clone())),
        }
    }
}
