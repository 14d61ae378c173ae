mod settings;

pub mod gemini;

use anyhow::{bail, Result};
use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use settings::ModelSettings;

/// Failure of a single model backend call (transport, auth, quota, or
/// backend fault), carrying the underlying message for diagnostics.
#[derive(Debug, Clone, Error)]
#[error("model invocation failed: {message}")]
pub struct ModelInvocationError {
    message: String,
}

impl ModelInvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Client abstraction over the generative-text backend: one prompt in, one
/// raw text blob out, a single error channel. No retry, no streaming.
#[async_trait]
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    async fn generate(&self, prompt: &str) -> Result<String, ModelInvocationError>;
}

#[async_trait]
impl ModelClient for Box<dyn ModelClient> {
    async fn generate(&self, prompt: &str) -> Result<String, ModelInvocationError> {
        (**self).generate(prompt).await
    }
}

/// Client that returns a fixed response without touching the network. Used
/// by the `canned` provider for smoke tests and offline runs.
#[derive(Debug, Clone)]
pub struct CannedModelClient {
    response: String,
}

impl CannedModelClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Default for CannedModelClient {
    fn default() -> Self {
        Self::new(
            r#"{
    "key_points": ["Canned provider configured; no real analysis performed"],
    "privacy_issues": [],
    "major_concerns": [],
    "data_misuse": [],
    "advantages": [],
    "disadvantages": []
}"#,
        )
    }
}

#[async_trait]
impl ModelClient for CannedModelClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelInvocationError> {
        Ok(self.response.clone())
    }
}

/// Build the client named by `settings.provider`.
pub fn client_from_settings(settings: &ModelSettings) -> Result<Box<dyn ModelClient>> {
    match settings.provider.to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiClient::new(settings)?)),
        "canned" => Ok(Box::new(CannedModelClient::default())),
        other => bail!("unknown model provider `{other}` (expected `gemini` or `canned`)"),
    }
}
