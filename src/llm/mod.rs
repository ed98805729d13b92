//! Language-model capability.
//!
//! The rest of the crate only sees [`Llm`]: either a live [`LanguageModel`]
//! or `Absent` when no credential was configured. Callers pick their own
//! fallback for the absent case.

mod gemini;
pub mod parse;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

use crate::config::Config;
use crate::models::GroundingSource;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no language model is configured")]
    Unavailable,
    #[error("request to language model failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("language model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("language model returned no text")]
    EmptyResponse,
}

/// Inline binary attachment, e.g. an uploaded audio file.
#[derive(Debug, Clone)]
pub struct InlineData {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub prompt: String,
    /// JSON schema the response must follow. Ignored when `grounded` is set,
    /// because search-grounded generation cannot enforce a schema.
    pub response_schema: Option<serde_json::Value>,
    /// Allow the model to use live web search.
    pub grounded: bool,
    pub attachment: Option<InlineData>,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    #[must_use]
    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachment = Some(InlineData {
            mime_type: mime_type.into(),
            data,
        });
        self
    }
}

/// Model output: raw text plus any citations from grounded search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// A text-generation backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Submit a prompt and return the generated text.
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError>;
}

/// The LLM capability as injected into every component that needs it.
#[derive(Clone)]
pub enum Llm {
    Available(Arc<dyn LanguageModel>),
    Absent,
}

impl Llm {
    /// Build the capability from configuration, `Absent` without a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.gemini_api_key.as_deref() {
            Some(key) => {
                let client = GeminiClient::new(
                    &config.gemini_api_base,
                    key,
                    &config.gemini_model,
                    config.http_timeout * 3,
                )?;
                Ok(Self::Available(Arc::new(client)))
            }
            None => Ok(Self::Absent),
        }
    }

    #[must_use]
    pub fn new(model: impl LanguageModel + 'static) -> Self {
        Self::Available(Arc::new(model))
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Forward to the model, or fail with [`LlmError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns an error if no model is configured or the model call fails.
    pub async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError> {
        match self {
            Self::Available(model) => model.generate(request).await,
            Self::Absent => Err(LlmError::Unavailable),
        }
    }
}

impl std::fmt::Debug for Llm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Llm::Available"),
            Self::Absent => f.write_str("Llm::Absent"),
        }
    }
}
