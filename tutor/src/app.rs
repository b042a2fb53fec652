//! Main application state and logic

use std::collections::VecDeque;

use tutor_core::quiz::QuizPhase;
use tutor_core::{Block, Conversation, Difficulty, QuizError, QuizGame, Subject, Tutor};

use crate::ui::theme::Theme;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing a problem for the solver
    Insert,
}

/// The three ways to study a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Solver,
    Theory,
    Quiz,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Solver, Mode::Theory, Mode::Quiz];

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Solver => "Solver",
            Mode::Theory => "Theory",
            Mode::Quiz => "Quiz",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Mode::Solver => 0,
            Mode::Theory => 1,
            Mode::Quiz => 2,
        }
    }

    pub fn next(&self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    pub fn prev(&self) -> Mode {
        Mode::ALL[(self.index() + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Study(Mode),
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
}

/// Work that has to be awaited before the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Solve(String),
    Topics,
    Lesson(String),
    Quiz(Difficulty),
}

impl PendingRequest {
    pub fn loading_message(&self) -> &'static str {
        match self {
            PendingRequest::Solve(_) => "Solving...",
            PendingRequest::Topics => "Loading topics...",
            PendingRequest::Lesson(_) => "Loading lesson...",
            PendingRequest::Quiz(_) => "Generating quiz...",
        }
    }
}

/// A rendered lesson and the topic it belongs to.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub topic: String,
    pub blocks: Vec<Block>,
}

/// Main application state
pub struct App {
    // UI state
    pub theme: Theme,
    pub screen: Screen,
    pub subject: Subject,
    overlay: Option<Overlay>,

    // Solver
    pub conversation: Conversation,
    pub chat_scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Theory
    pub topics: Vec<String>,
    pub topic_cursor: usize,
    pub topic_menu_open: bool,
    pub lesson: Option<Lesson>,
    pub lesson_scroll: usize,

    // Quiz
    pub quiz: QuizGame,
    pub quiz_difficulty: Difficulty,
    pub quiz_failed: bool,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
    pub loading: bool,
}

impl App {
    /// Create the application on the home screen.
    pub fn new() -> Self {
        let subject = Subject::Mathematics;
        Self {
            theme: Theme::default(),
            screen: Screen::Home,
            subject,
            overlay: None,
            conversation: Conversation::new(subject),
            chat_scroll: 0,
            scroll_locked_to_bottom: true,
            topics: Vec::new(),
            topic_cursor: 0,
            topic_menu_open: true,
            lesson: None,
            lesson_scroll: 0,
            quiz: QuizGame::new(),
            quiz_difficulty: Difficulty::default(),
            quiz_failed: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(100),
            history_index: None,
            saved_input: None,
            status_message: None,
            should_quit: false,
            loading: false,
        }
    }

    /// The active study mode, if a subject is open.
    pub fn mode(&self) -> Option<Mode> {
        match self.screen {
            Screen::Home => None,
            Screen::Study(mode) => Some(mode),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Highlight a subject on the home screen.
    pub fn select_subject(&mut self, subject: Subject) {
        self.subject = subject;
    }

    pub fn select_next_subject(&mut self) {
        let next = (self.subject.index() + 1) % Subject::ALL.len();
        self.subject = Subject::ALL[next];
    }

    pub fn select_prev_subject(&mut self) {
        let prev = (self.subject.index() + Subject::ALL.len() - 1) % Subject::ALL.len();
        self.subject = Subject::ALL[prev];
    }

    /// Open `subject` in the solver, starting every mode afresh.
    pub fn open_subject(&mut self, subject: Subject) {
        tracing::info!(subject = subject.id(), "opening subject");
        self.subject = subject;
        self.conversation = Conversation::new(subject);
        self.chat_scroll = 0;
        self.scroll_locked_to_bottom = true;
        self.topics.clear();
        self.topic_cursor = 0;
        self.topic_menu_open = true;
        self.lesson = None;
        self.lesson_scroll = 0;
        self.quiz.reset();
        self.quiz_failed = false;
        self.clear_input();
        self.screen = Screen::Study(Mode::Solver);
        self.clear_status();
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.input_mode = InputMode::Normal;
        self.clear_status();
    }

    /// Switch study mode. Opening theory without a topic index asks for one.
    pub fn switch_mode(&mut self, mode: Mode) -> Option<PendingRequest> {
        if self.screen == Screen::Home {
            return None;
        }
        self.screen = Screen::Study(mode);
        self.input_mode = InputMode::Normal;
        self.clear_status();

        if mode == Mode::Theory && self.topics.is_empty() {
            return Some(PendingRequest::Topics);
        }
        None
    }

    // =========================================================================
    // Solver
    // =========================================================================

    /// Scroll chat to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        // The widget caps this to the real maximum.
        self.chat_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Scroll up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        match self.mode() {
            Some(Mode::Theory) => {
                self.lesson_scroll = self.lesson_scroll.saturating_sub(lines);
            }
            _ => {
                let max_scroll = self.estimate_max_chat_scroll();
                if self.chat_scroll > max_scroll {
                    self.chat_scroll = max_scroll;
                }
                self.chat_scroll = self.chat_scroll.saturating_sub(lines);
                self.scroll_locked_to_bottom = false;
            }
        }
    }

    /// Scroll down
    pub fn scroll_down(&mut self, lines: usize) {
        match self.mode() {
            Some(Mode::Theory) => {
                let max_scroll = self.estimate_lesson_lines();
                self.lesson_scroll = self.lesson_scroll.saturating_add(lines).min(max_scroll);
            }
            _ => {
                let max_scroll = self.estimate_max_chat_scroll();
                self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll + 100);
            }
        }
    }

    /// Rendered line count of the lesson, before wrapping
    fn estimate_lesson_lines(&self) -> usize {
        self.lesson.as_ref().map_or(0, |lesson| {
            lesson
                .blocks
                .iter()
                .map(|block| match block {
                    Block::List { items } => items.len(),
                    Block::Heading { .. } => 2,
                    Block::Quote(_) | Block::Paragraph(_) => 1,
                })
                .sum()
        })
    }

    /// Estimate max chat scroll assuming ~60 char effective width
    fn estimate_max_chat_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .conversation
            .messages()
            .iter()
            .map(|message| {
                message
                    .text
                    .lines()
                    .map(|line| (line.chars().count() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 2
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    // =========================================================================
    // Theory
    // =========================================================================

    pub fn topic_cursor_down(&mut self) {
        if !self.topics.is_empty() {
            self.topic_cursor = (self.topic_cursor + 1).min(self.topics.len() - 1);
        }
    }

    pub fn topic_cursor_up(&mut self) {
        self.topic_cursor = self.topic_cursor.saturating_sub(1);
    }

    pub fn selected_topic(&self) -> Option<&str> {
        self.topics.get(self.topic_cursor).map(String::as_str)
    }

    /// Show or hide the topic index. It stays open until a lesson is loaded.
    pub fn toggle_topic_menu(&mut self) {
        if self.lesson.is_some() {
            self.topic_menu_open = !self.topic_menu_open;
        } else {
            self.topic_menu_open = true;
        }
    }

    // =========================================================================
    // Quiz
    // =========================================================================

    /// Answer the current question, reporting the outcome in the status bar.
    pub fn answer_quiz(&mut self, option: usize) {
        match self.quiz.answer(option) {
            Some(true) => self.set_status("Correct!"),
            Some(false) => self.set_status("Not quite. Read the explanation."),
            None => {}
        }
    }

    pub fn advance_quiz(&mut self) {
        self.quiz.advance();
        self.clear_status();
        if self.quiz.phase() == QuizPhase::Finished {
            self.set_status(format!(
                "Quiz finished: {}/{}",
                self.quiz.score(),
                self.quiz.len()
            ));
        }
    }

    pub fn reset_quiz(&mut self) {
        self.quiz.reset();
        self.quiz_failed = false;
        self.clear_status();
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Update state before a request is awaited, so the next frame shows it.
    pub fn begin_request(&mut self, request: &PendingRequest) {
        if let PendingRequest::Solve(problem) = request {
            self.conversation.push_user(problem.clone());
            self.scroll_to_bottom();
        }
        self.loading = true;
        self.set_status(request.loading_message());
    }

    /// Run a request against the tutor and apply its outcome.
    pub async fn fulfil(&mut self, tutor: &mut Tutor, request: PendingRequest) {
        let subject = self.subject;

        match request {
            PendingRequest::Solve(problem) => {
                match tutor.solve(subject, &problem).await {
                    Ok(answer) => {
                        self.conversation.push_reply(answer);
                        self.clear_status();
                    }
                    Err(e) => {
                        self.conversation.push_error();
                        self.set_status(format!("Error: {e}"));
                    }
                }
                self.scroll_to_bottom();
            }
            PendingRequest::Topics => {
                self.topics = tutor.topics(subject).await;
                self.topic_cursor = 0;
                self.topic_menu_open = true;
                self.clear_status();
            }
            PendingRequest::Lesson(topic) => {
                let blocks = tutor.lesson(subject, &topic).await;
                self.lesson = Some(Lesson { topic, blocks });
                self.lesson_scroll = 0;
                self.topic_menu_open = false;
                self.clear_status();
            }
            PendingRequest::Quiz(difficulty) => {
                self.quiz_difficulty = difficulty;
                let questions = tutor.quiz(subject, difficulty).await;
                match self.quiz.start(questions) {
                    Ok(()) => {
                        self.quiz_failed = false;
                        self.clear_status();
                    }
                    Err(QuizError::NoQuestions) => {
                        self.quiz_failed = true;
                        self.set_status("Could not generate the quiz, try again");
                    }
                }
            }
        }

        self.loading = false;
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        self.input_history.push_front(input.clone());
        if self.input_history.len() > 100 {
            self.input_history.pop_back();
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        if self.history_index.is_none() && !self.input_buffer.is_empty() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let new_index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.input_history.len() => i + 1,
            Some(i) => i,
        };

        if let Some(entry) = self.input_history.get(new_index) {
            self.input_buffer = entry.clone();
            self.cursor_position = self.input_buffer.chars().count();
            self.history_index = Some(new_index);
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Overlay and status
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::{ChatRole, QuizQuestion, TestHarness};

    fn quiz_payload() -> Vec<QuizQuestion> {
        vec![QuizQuestion {
            question: "2 + 2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_index: 1,
            explanation: "Addition.".to_string(),
        }]
    }

    #[test]
    fn test_unicode_input_editing() {
        let mut app = App::new();
        for c in "x²=π".chars() {
            app.type_char(c);
        }
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input_buffer(), "x²π");

        app.cursor_home();
        app.delete();
        assert_eq!(app.input_buffer(), "²π");
        assert_eq!(app.cursor_position(), 0);

        app.cursor_end();
        app.type_char('!');
        assert_eq!(app.input_buffer(), "²π!");
    }

    #[test]
    fn test_history_navigation() {
        let mut app = App::new();
        for problem in ["first", "second"] {
            for c in problem.chars() {
                app.type_char(c);
            }
            app.submit_input();
        }

        app.type_char('d');
        app.history_prev();
        assert_eq!(app.input_buffer(), "second");
        app.history_prev();
        assert_eq!(app.input_buffer(), "first");
        app.history_prev();
        assert_eq!(app.input_buffer(), "first");
        app.history_next();
        app.history_next();
        assert_eq!(app.input_buffer(), "d");
    }

    #[test]
    fn test_blank_input_is_not_submitted() {
        let mut app = App::new();
        app.type_char(' ');
        assert!(app.submit_input().is_none());
        assert!(app.input_history.is_empty());
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(Mode::Solver.next(), Mode::Theory);
        assert_eq!(Mode::Quiz.next(), Mode::Solver);
        assert_eq!(Mode::Solver.prev(), Mode::Quiz);
    }

    #[test]
    fn test_switch_to_theory_requests_topics_once() {
        let mut app = App::new();
        assert!(app.switch_mode(Mode::Theory).is_none(), "home has no modes");

        app.open_subject(Subject::Physics);
        assert_eq!(app.switch_mode(Mode::Theory), Some(PendingRequest::Topics));

        app.topics = vec!["Waves".to_string()];
        app.switch_mode(Mode::Quiz);
        assert!(app.switch_mode(Mode::Theory).is_none());
    }

    #[test]
    fn test_open_subject_resets_state() {
        let mut app = App::new();
        app.open_subject(Subject::Chemistry);
        app.conversation.push_user("hi");
        app.topics = vec!["Gases".to_string()];
        app.quiz.start(quiz_payload()).unwrap();

        app.open_subject(Subject::Physics);

        assert_eq!(app.conversation.messages().len(), 1);
        assert!(app.topics.is_empty());
        assert_eq!(app.quiz.phase(), QuizPhase::Menu);
        assert_eq!(app.screen, Screen::Study(Mode::Solver));
    }

    #[test]
    fn test_subject_selection_wraps() {
        let mut app = App::new();
        app.select_prev_subject();
        assert_eq!(app.subject, Subject::Chemistry);
        app.select_next_subject();
        assert_eq!(app.subject, Subject::Mathematics);
    }

    #[tokio::test]
    async fn test_solve_request_appends_reply() {
        let mut harness = TestHarness::new();
        harness.expect_text("x = **5**");
        let mut app = App::new();
        app.open_subject(Subject::Mathematics);

        let request = PendingRequest::Solve("3x + 5 = 20".to_string());
        app.begin_request(&request);
        assert!(app.loading);
        app.fulfil(&mut harness.tutor, request).await;

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].text, "x = **5**");
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_failed_solve_appends_error() {
        let mut harness = TestHarness::new();
        harness.expect_failure();
        let mut app = App::new();
        app.open_subject(Subject::Physics);

        let request = PendingRequest::Solve("?".to_string());
        app.begin_request(&request);
        app.fulfil(&mut harness.tutor, request).await;

        assert!(app.conversation.messages().last().unwrap().is_error);
        assert!(app.status_message().unwrap().starts_with("Error"));
    }

    #[tokio::test]
    async fn test_seeded_topics_and_lesson() {
        let mut harness = TestHarness::new();
        let mut app = App::new();
        app.open_subject(Subject::Physics);

        let request = app.switch_mode(Mode::Theory).unwrap();
        app.fulfil(&mut harness.tutor, request).await;
        assert_eq!(app.topics.len(), 8);

        let waves = app.topics.iter().position(|t| t == "Waves").unwrap();
        app.topic_cursor = waves;
        let topic = app.selected_topic().unwrap().to_string();
        app.fulfil(&mut harness.tutor, PendingRequest::Lesson(topic)).await;

        let lesson = app.lesson.as_ref().unwrap();
        assert_eq!(lesson.topic, "Waves");
        assert!(!lesson.blocks.is_empty());
        assert!(!app.topic_menu_open);
        assert_eq!(harness.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_quiz_marks_failure() {
        let mut harness = TestHarness::new();
        harness.expect_failure();
        let mut app = App::new();
        app.open_subject(Subject::Chemistry);
        app.switch_mode(Mode::Quiz);

        app.fulfil(&mut harness.tutor, PendingRequest::Quiz(Difficulty::Hard))
            .await;

        assert!(app.quiz_failed);
        assert_eq!(app.quiz.phase(), QuizPhase::Menu);
        assert_eq!(app.quiz_difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_quiz_answer_and_finish() {
        let mut app = App::new();
        app.open_subject(Subject::Mathematics);
        app.quiz.start(quiz_payload()).unwrap();

        app.answer_quiz(1);
        assert_eq!(app.status_message(), Some("Correct!"));
        app.advance_quiz();

        assert_eq!(app.quiz.phase(), QuizPhase::Finished);
        assert_eq!(app.status_message(), Some("Quiz finished: 1/1"));
    }

    #[test]
    fn test_topic_menu_stays_open_without_lesson() {
        let mut app = App::new();
        app.toggle_topic_menu();
        assert!(app.topic_menu_open);

        app.lesson = Some(Lesson {
            topic: "Waves".to_string(),
            blocks: Vec::new(),
        });
        app.toggle_topic_menu();
        assert!(!app.topic_menu_open);
    }
}
