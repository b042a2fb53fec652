//! Quiz questions and the game played over them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options every question must offer.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Four options, an in-range answer, and some question text.
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == OPTION_COUNT
            && self.correct_index < self.options.len()
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    Wrapped { questions: Vec<QuizQuestion> },
    Bare(Vec<QuizQuestion>),
}

/// Read questions out of a model payload.
///
/// Accepts either `{"questions": [...]}` or a bare array. A payload that does
/// not have that shape yields no questions at all; questions that parse but
/// are not well formed are dropped individually.
pub fn parse_quiz(value: serde_json::Value) -> Vec<QuizQuestion> {
    let questions = match serde_json::from_value::<QuizPayload>(value) {
        Ok(QuizPayload::Wrapped { questions }) | Ok(QuizPayload::Bare(questions)) => questions,
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed quiz payload");
            return Vec::new();
        }
    };

    let total = questions.len();
    let kept: Vec<QuizQuestion> = questions
        .into_iter()
        .filter(QuizQuestion::is_well_formed)
        .collect();
    if kept.len() < total {
        tracing::debug!(dropped = total - kept.len(), "dropped ill-formed quiz questions");
    }
    kept
}

/// Letter shown next to option `index` (`A`..`D`).
pub fn option_label(index: usize) -> char {
    match index {
        0 => 'A',
        1 => 'B',
        2 => 'C',
        3 => 'D',
        _ => '?',
    }
}

/// Inverse of [`option_label`]; also accepts `1`..`4`.
pub fn parse_option(input: &str) -> Option<usize> {
    match input.trim().to_ascii_lowercase().as_str() {
        "a" | "1" => Some(0),
        "b" | "2" => Some(1),
        "c" | "3" => Some(2),
        "d" | "4" => Some(3),
        _ => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no quiz questions to play")]
    NoQuestions,
}

/// Where the game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    /// Choosing a difficulty.
    #[default]
    Menu,
    Playing,
    Finished,
}

/// A single run through a question set.
#[derive(Debug, Clone, Default)]
pub struct QuizGame {
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    current: usize,
    score: usize,
    selected: Option<usize>,
}

impl QuizGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin playing `questions` from the first one.
    pub fn start(&mut self, questions: Vec<QuizQuestion>) -> Result<(), QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        *self = Self {
            phase: QuizPhase::Playing,
            questions,
            ..Self::default()
        };
        Ok(())
    }

    /// Lock in an answer to the current question.
    ///
    /// Only the first answer counts. Returns whether it was correct, or
    /// `None` if nothing was accepted.
    pub fn answer(&mut self, option: usize) -> Option<bool> {
        if self.phase != QuizPhase::Playing || self.selected.is_some() {
            return None;
        }
        let question = self.questions.get(self.current)?;
        if option >= question.options.len() {
            return None;
        }

        let correct = option == question.correct_index;
        self.selected = Some(option);
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Move past an answered question. Finishes after the last one.
    pub fn advance(&mut self) {
        if self.phase != QuizPhase::Playing || self.selected.is_none() {
            return;
        }
        self.selected = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.phase = QuizPhase::Finished;
        }
    }

    /// Back to the difficulty menu.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Playing => self.questions.get(self.current),
            _ => None,
        }
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(text: &str, correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct_index: correct,
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn test_parse_wrapped_and_bare() {
        let item = json!({
            "question": "2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correctIndex": 1,
            "explanation": "Addition."
        });

        let wrapped = parse_quiz(json!({ "questions": [item.clone()] }));
        let bare = parse_quiz(json!([item]));

        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped[0].correct_option(), Some("4"));
    }

    #[test]
    fn test_missing_correct_index_yields_empty() {
        let payload = json!({
            "questions": [
                { "question": "ok?", "options": ["a", "b", "c", "d"], "correctIndex": 0, "explanation": "" },
                { "question": "broken", "options": ["a", "b", "c", "d"], "explanation": "" }
            ]
        });
        assert!(parse_quiz(payload).is_empty());
    }

    #[test]
    fn test_unexpected_shape_yields_empty() {
        assert!(parse_quiz(json!("five questions")).is_empty());
        assert!(parse_quiz(json!({ "items": [] })).is_empty());
        assert!(parse_quiz(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_ill_formed_questions_dropped() {
        let payload = json!([
            { "question": "three options", "options": ["a", "b", "c"], "correctIndex": 0, "explanation": "" },
            { "question": "out of range", "options": ["a", "b", "c", "d"], "correctIndex": 4, "explanation": "" },
            { "question": "fine", "options": ["a", "b", "c", "d"], "correctIndex": 3, "explanation": "" }
        ]);
        let questions = parse_quiz(payload);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "fine");
    }

    #[test]
    fn test_serializes_camel_case_index() {
        let json = serde_json::to_value(question("q", 2)).unwrap();
        assert_eq!(json["correctIndex"], 2);
        assert!(json.get("correct_index").is_none());
    }

    #[test]
    fn test_start_rejects_empty_set() {
        let mut game = QuizGame::new();
        assert_eq!(game.start(Vec::new()), Err(QuizError::NoQuestions));
        assert_eq!(game.phase(), QuizPhase::Menu);
    }

    #[test]
    fn test_scoring_and_finish() {
        let mut game = QuizGame::new();
        game.start(vec![question("one", 0), question("two", 1), question("three", 2)])
            .unwrap();

        assert_eq!(game.answer(0), Some(true));
        game.advance();
        assert_eq!(game.answer(3), Some(false));
        game.advance();
        assert_eq!(game.current_question().unwrap().question, "three");
        assert_eq!(game.answer(2), Some(true));
        game.advance();

        assert_eq!(game.phase(), QuizPhase::Finished);
        assert_eq!(game.score(), 2);
        assert!(game.current_question().is_none());
    }

    #[test]
    fn test_first_answer_is_locked() {
        let mut game = QuizGame::new();
        game.start(vec![question("one", 1)]).unwrap();

        assert_eq!(game.answer(0), Some(false));
        assert_eq!(game.answer(1), None);
        assert_eq!(game.selected(), Some(0));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut game = QuizGame::new();
        game.start(vec![question("one", 1), question("two", 1)]).unwrap();

        game.advance();
        assert_eq!(game.position(), 0);
        assert_eq!(game.answer(9), None);
    }

    #[test]
    fn test_reset_returns_to_menu() {
        let mut game = QuizGame::new();
        game.start(vec![question("one", 1)]).unwrap();
        game.answer(1);
        game.reset();

        assert_eq!(game.phase(), QuizPhase::Menu);
        assert_eq!(game.score(), 0);
        assert!(game.is_empty());
    }

    #[test]
    fn test_option_labels() {
        let labels: String = (0..OPTION_COUNT).map(option_label).collect();
        assert_eq!(labels, "ABCD");
        assert_eq!(parse_option("C"), Some(2));
        assert_eq!(parse_option("4"), Some(3));
        assert_eq!(parse_option("e"), None);
    }
}
