//! Testing utilities for the tutor.
//!
//! This module provides tools for integration testing:
//! - `ScriptedGenerator` for deterministic tests without API calls
//! - `TestHarness` for a ready-made tutor over in-memory storage
//! - Storage fakes for exercising persistence faults

use crate::cache::SeededCache;
use crate::generator::{GenerationError, Generator, OutputSchema, Prompt};
use crate::persist::{MemoryStorage, PersistError, Storage};
use crate::seed::StaticSeed;
use crate::tutor::Tutor;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A scripted reply from the generator.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Returned by `text`; also parsed as JSON by `structured`.
    Text(String),
    /// Returned by `structured`; serialized by `text`.
    Json(serde_json::Value),
    /// Fails the request as a network error would.
    Failure(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn json(value: serde_json::Value) -> Self {
        MockReply::Json(value)
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        MockReply::Failure(reason.into())
    }
}

/// A generator that replays scripted replies in order and records prompts.
///
/// Clones share the same script, so a test can keep one handle after boxing
/// another into a [`Tutor`]. Once the script runs out every request fails.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<Prompt>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::default(),
        }
    }

    /// Add a reply to the end of the script.
    pub fn queue(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Every prompt received so far.
    pub fn calls(&self) -> Vec<Prompt> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self, prompt: &Prompt) -> Option<MockReply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.clone());
        }
        self.replies.lock().ok().and_then(|mut r| r.pop_front())
    }
}

fn scripted_failure(reason: String) -> GenerationError {
    GenerationError::Api(claude::Error::Network(reason))
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn text(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        match self.next_reply(prompt) {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Json(value)) => Ok(value.to_string()),
            Some(MockReply::Failure(reason)) => Err(scripted_failure(reason)),
            None => Err(scripted_failure("no scripted reply left".to_string())),
        }
    }

    async fn structured(
        &self,
        prompt: &Prompt,
        _schema: &OutputSchema,
    ) -> Result<serde_json::Value, GenerationError> {
        match self.next_reply(prompt) {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Text(text)) => {
                serde_json::from_str(&text).map_err(|_| GenerationError::MissingStructuredOutput)
            }
            Some(MockReply::Failure(reason)) => Err(scripted_failure(reason)),
            None => Err(scripted_failure("no scripted reply left".to_string())),
        }
    }
}

/// Storage whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl FailingStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FailingStorage {
    fn read(&self, _name: &str) -> Result<Option<String>, PersistError> {
        Err(PersistError::Unavailable("storage disabled".to_string()))
    }

    fn write(&self, _name: &str, _contents: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable("storage disabled".to_string()))
    }
}

/// Memory storage that a test can inspect after handing it to a cache.
#[derive(Debug, Clone, Default)]
pub struct SharedStorage(pub Arc<MemoryStorage>);

impl Storage for SharedStorage {
    fn read(&self, name: &str) -> Result<Option<String>, PersistError> {
        self.0.read(name)
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), PersistError> {
        self.0.write(name, contents)
    }
}

/// A tutor over in-memory storage and a scripted generator.
pub struct TestHarness {
    pub tutor: Tutor,
    pub generator: ScriptedGenerator,
    pub storage: Arc<MemoryStorage>,
}

impl TestHarness {
    /// Harness with the built-in seed.
    pub fn new() -> Self {
        Self::with_seed(StaticSeed::builtin())
    }

    /// Harness with a custom seed and empty storage.
    pub fn with_seed(seed: StaticSeed) -> Self {
        Self::with_storage(seed, Arc::new(MemoryStorage::new()))
    }

    /// Harness over existing storage, as after a restart.
    pub fn with_storage(seed: StaticSeed, storage: Arc<MemoryStorage>) -> Self {
        let generator = ScriptedGenerator::default();
        let cache = SeededCache::initialize(Box::new(SharedStorage(storage.clone())), seed);
        let tutor = Tutor::new(Box::new(generator.clone()), cache);

        Self {
            tutor,
            generator,
            storage,
        }
    }

    /// Set the solver's extended thinking budget.
    pub fn with_thinking_budget(mut self, budget: Option<usize>) -> Self {
        self.tutor = self.tutor.with_thinking_budget(budget);
        self
    }

    /// Queue a text reply.
    pub fn expect_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.generator.queue(MockReply::text(text));
        self
    }

    /// Queue a structured reply.
    pub fn expect_json(&mut self, value: serde_json::Value) -> &mut Self {
        self.generator.queue(MockReply::json(value));
        self
    }

    /// Queue a failed request.
    pub fn expect_failure(&mut self) -> &mut Self {
        self.generator.queue(MockReply::failure("scripted failure"));
        self
    }

    /// Number of requests that reached the generator.
    pub fn remote_calls(&self) -> usize {
        self.generator.call_count()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
