//! STEM tutoring engine backed by Claude.
//!
//! This crate provides:
//! - A seeded, persisted cache of topic indexes and lessons
//! - A restricted-Markdown lesson renderer
//! - Quiz parsing and a quiz game session
//! - The problem-solver conversation
//!
//! # Quick Start
//!
//! ```ignore
//! use tutor_core::{Subject, Tutor, TutorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TutorConfig::from_env()?;
//!     let mut tutor = Tutor::from_config(&config, true)?;
//!
//!     let topics = tutor.topics(Subject::Physics).await;
//!     let lesson = tutor.lesson(Subject::Physics, &topics[0]).await;
//!     println!("{} blocks", lesson.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod generator;
pub mod persist;
pub mod prompts;
pub mod quiz;
pub mod render;
pub mod seed;
pub mod solver;
pub mod subject;
pub mod testing;
pub mod tutor;

// Primary public API
pub use cache::{SeededCache, TheoryKey};
pub use config::{ConfigError, TutorConfig};
pub use generator::{ClaudeGenerator, GenerationError, Generator, ModelTier, OutputSchema, Prompt};
pub use persist::{FileStorage, MemoryStorage, PersistError, Storage};
pub use quiz::{QuizError, QuizGame, QuizPhase, QuizQuestion};
pub use render::{render, Block, Inline};
pub use seed::StaticSeed;
pub use solver::{ChatMessage, ChatRole, Conversation};
pub use subject::{Difficulty, Subject, SubjectProfile};
pub use testing::{MockReply, ScriptedGenerator, TestHarness};
pub use tutor::{Tutor, TutorError, THEORY_ERROR_DOCUMENT};
