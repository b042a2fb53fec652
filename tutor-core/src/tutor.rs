//! The tutor: every mode's content request goes through here.
//!
//! Lessons and topic indexes are served from the [`SeededCache`] when
//! possible and generated otherwise. Each remote failure is turned into the
//! recovery its mode calls for; nothing here retries.

use crate::cache::{SeededCache, TheoryKey};
use crate::config::{ConfigError, TutorConfig};
use crate::generator::{ClaudeGenerator, GenerationError, Generator};
use crate::persist::{FileStorage, MemoryStorage, Storage};
use crate::prompts;
use crate::quiz::{parse_quiz, QuizQuestion};
use crate::render::{render, Block};
use crate::seed::StaticSeed;
use crate::subject::{Difficulty, Subject};
use serde::Deserialize;
use thiserror::Error;

/// Reply used when the model answers a problem with no text.
pub const SOLVE_FALLBACK_TEXT: &str = "I couldn't generate an answer. Please try again.";

/// Lesson shown in place of one that could not be fetched.
pub const THEORY_ERROR_DOCUMENT: &str = "# Error\nWe couldn't load the lesson. Please try again.";

/// Topic index used when none can be fetched.
pub const TOPIC_FALLBACK: [&str; 3] = ["Basic Concepts", "History", "Modern Applications"];

/// Errors surfaced by the tutor.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TopicPayload {
    Wrapped { topics: Vec<String> },
    Bare(Vec<String>),
}

/// Content service shared by all screens.
pub struct Tutor {
    generator: Box<dyn Generator>,
    cache: SeededCache,
    thinking_budget: Option<usize>,
}

impl Tutor {
    pub fn new(generator: Box<dyn Generator>, cache: SeededCache) -> Self {
        Self {
            generator,
            cache,
            thinking_budget: None,
        }
    }

    /// Wire up Claude, storage under `config.data_dir` and the built-in seed.
    ///
    /// With `persist` off, the cache lives only in memory.
    pub fn from_config(config: &TutorConfig, persist: bool) -> Result<Self, TutorError> {
        let generator = ClaudeGenerator::from_env(config)?;
        let storage: Box<dyn Storage> = if persist {
            Box::new(FileStorage::new(config.data_dir()))
        } else {
            Box::new(MemoryStorage::new())
        };
        let cache = SeededCache::initialize(storage, StaticSeed::builtin());

        Ok(Self::new(Box::new(generator), cache).with_thinking_budget(config.thinking_budget))
    }

    /// Extended thinking budget for [`Tutor::solve`].
    pub fn with_thinking_budget(mut self, budget: Option<usize>) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn cache(&self) -> &SeededCache {
        &self.cache
    }

    /// Solve a free-text problem step by step.
    pub async fn solve(&self, subject: Subject, problem: &str) -> Result<String, TutorError> {
        let prompt = prompts::solve_prompt(subject, problem, self.thinking_budget);
        let text = self.generator.text(&prompt).await.map_err(|e| {
            tracing::warn!(subject = subject.id(), error = %e, "solve request failed");
            e
        })?;

        if text.trim().is_empty() {
            tracing::debug!(subject = subject.id(), "empty solution, using fallback reply");
            return Ok(SOLVE_FALLBACK_TEXT.to_string());
        }
        Ok(text)
    }

    /// Lesson text for a topic, fetched and cached on a miss.
    pub async fn theory(&mut self, subject: Subject, topic: &str) -> Result<String, TutorError> {
        let key = TheoryKey::new(subject, topic);
        if let Some(text) = self.cache.get_theory(&key) {
            return Ok(text.to_string());
        }

        let prompt = prompts::theory_prompt(subject, topic);
        let text = match self.generator.text(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(key = %key, "empty lesson response");
                return Err(GenerationError::EmptyResponse.into());
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "lesson request failed");
                return Err(e.into());
            }
        };

        self.cache.put_theory(key, text.clone());
        Ok(text)
    }

    /// Rendered lesson, or the rendered error document on failure.
    pub async fn lesson(&mut self, subject: Subject, topic: &str) -> Vec<Block> {
        match self.theory(subject, topic).await {
            Ok(text) => render(&text),
            Err(_) => render(THEORY_ERROR_DOCUMENT),
        }
    }

    /// Topic index for a subject. Falls back to [`TOPIC_FALLBACK`] uncached.
    pub async fn topics(&mut self, subject: Subject) -> Vec<String> {
        if let Some(topics) = self.cache.get_topics(subject) {
            return topics.to_vec();
        }

        let prompt = prompts::topics_prompt(subject);
        let fetched = match self
            .generator
            .structured(&prompt, &prompts::topics_schema())
            .await
        {
            Ok(value) => parse_topics(value),
            Err(e) => {
                tracing::warn!(subject = subject.id(), error = %e, "topic request failed");
                Vec::new()
            }
        };

        if fetched.is_empty() {
            return TOPIC_FALLBACK.iter().map(|t| t.to_string()).collect();
        }
        self.cache.put_topics(subject, fetched.clone());
        fetched
    }

    /// Fresh quiz questions. Empty when none could be generated.
    pub async fn quiz(&self, subject: Subject, difficulty: Difficulty) -> Vec<QuizQuestion> {
        let prompt = prompts::quiz_prompt(subject, difficulty);
        match self
            .generator
            .structured(&prompt, &prompts::quiz_schema())
            .await
        {
            Ok(value) => parse_quiz(value),
            Err(e) => {
                tracing::warn!(subject = subject.id(), %difficulty, error = %e, "quiz request failed");
                Vec::new()
            }
        }
    }
}

fn parse_topics(value: serde_json::Value) -> Vec<String> {
    let topics = match serde_json::from_value::<TopicPayload>(value) {
        Ok(TopicPayload::Wrapped { topics }) | Ok(TopicPayload::Bare(topics)) => topics,
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed topic payload");
            return Vec::new();
        }
    };
    topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
