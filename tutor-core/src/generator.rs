//! The seam between the tutor and the language model.
//!
//! [`Generator`] is the only thing [`crate::Tutor`] knows about the remote
//! model. [`ClaudeGenerator`] is the production implementation; tests use
//! [`crate::testing::ScriptedGenerator`].

use crate::config::TutorConfig;
use async_trait::async_trait;
use claude::{Claude, Message, Request, Tool};
use thiserror::Error;

/// Which model a prompt should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTier {
    /// Slower model for step-by-step problem solving.
    #[default]
    Reasoning,
    /// Cheaper model for lessons, topic lists and quizzes.
    Fast,
}

/// A single request to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
    pub tier: ModelTier,
    pub thinking_budget: Option<usize>,
}

impl Prompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            tier: ModelTier::Fast,
            thinking_budget: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_thinking(mut self, budget: Option<usize>) -> Self {
        self.thinking_budget = budget;
        self
    }
}

/// JSON shape a structured request must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: serde_json::Value,
}

/// Errors from a generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model did not return structured output")]
    MissingStructuredOutput,
}

/// Produces model output for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Free-form text (Markdown).
    async fn text(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// A JSON value shaped like `schema`.
    async fn structured(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// [`Generator`] backed by the Claude Messages API.
pub struct ClaudeGenerator {
    client: Claude,
    reasoning_model: String,
    fast_model: String,
    max_tokens: usize,
}

impl ClaudeGenerator {
    pub fn new(client: Claude, config: &TutorConfig) -> Self {
        Self {
            client,
            reasoning_model: config.reasoning_model.clone(),
            fast_model: config.fast_model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Create a generator using `ANTHROPIC_API_KEY`.
    pub fn from_env(config: &TutorConfig) -> Result<Self, GenerationError> {
        Ok(Self::new(Claude::from_env()?, config))
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Reasoning => &self.reasoning_model,
            ModelTier::Fast => &self.fast_model,
        }
    }

    fn build_request(&self, prompt: &Prompt) -> Request {
        let mut request = Request::new(vec![Message::user(prompt.user.clone())])
            .with_model(self.model_for(prompt.tier))
            .with_max_tokens(self.max_tokens);

        if let Some(system) = &prompt.system {
            request = request.with_system(system.clone());
        }
        if let Some(budget) = prompt.thinking_budget {
            request = request.with_thinking(budget);
        }
        request
    }
}

#[async_trait]
impl Generator for ClaudeGenerator {
    async fn text(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let response = self.client.complete(self.build_request(prompt)).await?;
        tracing::debug!(
            tier = ?prompt.tier,
            output_tokens = response.usage.output_tokens,
            "text generation finished"
        );
        Ok(response.text())
    }

    async fn structured(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, GenerationError> {
        // Forced tool choice cannot be combined with extended thinking.
        let mut request = self.build_request(prompt);
        request.thinking_budget = None;

        let tool = Tool {
            name: schema.name.clone(),
            description: schema.description.clone(),
            input_schema: schema.schema.clone(),
        };

        match self.client.complete_structured(request, tool).await {
            Ok(value) => Ok(value),
            Err(claude::Error::MissingToolCall(_)) => Err(GenerationError::MissingStructuredOutput),
            Err(e) => Err(e.into()),
        }
    }
}
