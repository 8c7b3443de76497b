//! Prompt building and the generation proxy.

pub mod output;
pub mod prompt;
pub mod provider;

pub use output::normalize;
pub use prompt::{build_prompt, PromptFields, STYLE_CLAUSE};
pub use provider::{ImageProvider, ModelRef, ProviderInput, ReplicateProvider};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

pub const DEFAULT_ASPECT_RATIO: &str = "3:2";
pub const DEFAULT_MODEL: &str = "ideogram-ai/ideogram-v3-turbo";

/// Body of `POST /generateposter`. Every field is optional.
#[derive(ToSchema, Deserialize, Serialize, Debug, Default, Clone)]
pub struct GenerationRequest {
    /// Used verbatim when non-blank; otherwise the prompt is built from the
    /// descriptive fields.
    pub prompt: Option<String>,
    pub aspect_ratio: Option<String>,
    #[serde(rename = "generationType")]
    pub generation_type: Option<String>,
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,
    pub theme: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
    #[serde(rename = "extraPrompt")]
    pub extra_prompt: Option<String>,
}

impl GenerationRequest {
    #[must_use]
    pub fn fields(&self) -> PromptFields<'_> {
        PromptFields {
            generation_type: self.generation_type.as_deref(),
            event_name: self.event_name.as_deref(),
            theme: self.theme.as_deref(),
            location: self.location.as_deref(),
            date: self.date.as_deref(),
            event_type: self.event_type.as_deref(),
            extra_prompt: self.extra_prompt.as_deref(),
        }
    }

    /// The prompt to send: the explicit one if it has any non-whitespace
    /// content, else the built one.
    ///
    /// # Errors
    /// `MissingPrompt` when there is no explicit prompt and no descriptive
    /// field to build one from.
    pub fn resolve_prompt(&self) -> Result<String, GenerationError> {
        if let Some(prompt) = self.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            return Ok(prompt.to_string());
        }

        let fields = self.fields();
        if fields.is_blank() {
            return Err(GenerationError::MissingPrompt);
        }
        Ok(build_prompt(&fields))
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> &str {
        self.aspect_ratio
            .as_deref()
            .filter(|ratio| !ratio.is_empty())
            .unwrap_or(DEFAULT_ASPECT_RATIO)
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub href: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("missing prompt")]
    MissingPrompt,
    #[error("unexpected provider output shape")]
    UnexpectedOutputShape { output: Value },
    #[error("generation failed: {0:#}")]
    Failed(anyhow::Error),
}

/// Resolves prompts, calls the provider, and normalizes its output.
pub struct Generator {
    provider: Arc<dyn ImageProvider>,
    model: ModelRef,
}

impl Generator {
    #[must_use]
    pub fn new(provider: Arc<dyn ImageProvider>, model: ModelRef) -> Self {
        Self { provider, model }
    }

    #[must_use]
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// # Errors
    /// `MissingPrompt` before any provider call, `Failed` when the provider
    /// call fails, `UnexpectedOutputShape` when no URL can be extracted.
    #[instrument(skip(self, request), fields(model = %self.model))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let input = ProviderInput {
            prompt: request.resolve_prompt()?,
            aspect_ratio: request.aspect_ratio().to_string(),
        };
        debug!(prompt = %input.prompt, aspect_ratio = %input.aspect_ratio, "running provider");

        let output = self
            .provider
            .run(&self.model, &input)
            .await
            .map_err(|err| {
                error!("provider call failed: {err:#}");
                GenerationError::Failed(err)
            })?;

        match normalize(&output) {
            Some(href) => Ok(GenerationResult { href }),
            None => {
                error!("unexpected provider output shape: {output}");
                Err(GenerationError::UnexpectedOutputShape { output })
            }
        }
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{ImageProvider, ModelRef, ProviderInput};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Provider that records its inputs and replies with a canned result.
    pub(crate) struct StubProvider {
        reply: std::result::Result<Value, String>,
        pub(crate) calls: Mutex<Vec<(String, ProviderInput)>>,
    }

    impl StubProvider {
        pub(crate) fn replying(output: Value) -> Self {
            Self {
                reply: Ok(output),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<(String, ProviderInput)> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        async fn run(&self, model: &ModelRef, input: &ProviderInput) -> Result<Value> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((model.to_string(), input.clone()));
            }
            self.reply.clone().map_err(|message| anyhow!(message))
        }
    }
}
