//! Headless mode for the tutor.
//!
//! A line-oriented interface on stdin/stdout for scripting and automated
//! testing. Output lines carry `[TAG]` prefixes so they are easy to match.

use std::io::{self, BufRead, Write};

use tutor_core::quiz::{option_label, parse_option, QuizPhase};
use tutor_core::{Block, Difficulty, QuizGame, Subject, Tutor};

/// Whether to keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State carried between lines.
pub struct HeadlessSession {
    subject: Subject,
    topics: Vec<String>,
    quiz: QuizGame,
}

impl HeadlessSession {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            topics: Vec::new(),
            quiz: QuizGame::new(),
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Handle one input line, writing the response to `out`.
    pub async fn handle_line<W: Write>(
        &mut self,
        tutor: &mut Tutor,
        line: &str,
        out: &mut W,
    ) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        if let Some(command) = line.strip_prefix('#') {
            return self.handle_command(tutor, command, out).await;
        }

        if self.quiz.phase() == QuizPhase::Playing {
            match parse_option(line) {
                Some(option) => self.answer(option, out)?,
                None => writeln!(out, "[ERROR] Answer with a-d, or #stop to leave the quiz")?,
            }
            return Ok(Flow::Continue);
        }

        writeln!(out, "[PROCESSING]")?;
        match tutor.solve(self.subject, line).await {
            Ok(answer) => {
                writeln!(out, "[TUTOR]")?;
                writeln!(out, "{answer}")?;
                writeln!(out)?;
            }
            Err(e) => writeln!(out, "[ERROR] {e}")?,
        }
        Ok(Flow::Continue)
    }

    async fn handle_command<W: Write>(
        &mut self,
        tutor: &mut Tutor,
        command: &str,
        out: &mut W,
    ) -> io::Result<Flow> {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "exit" => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Quit);
            }
            "help" => print_commands(out, "[HELP]")?,
            "subject" => {
                if arg.is_empty() {
                    writeln!(out, "[SUBJECT] {}", self.subject.name())?;
                } else {
                    match arg.parse::<Subject>() {
                        Ok(subject) => {
                            *self = Self::new(subject);
                            writeln!(out, "[SUBJECT] {}", subject.name())?;
                        }
                        Err(e) => writeln!(out, "[ERROR] {e}")?,
                    }
                }
            }
            "topics" => {
                self.topics = tutor.topics(self.subject).await;
                self.print_topics(out)?;
            }
            "learn" => {
                if arg.is_empty() {
                    writeln!(out, "[ERROR] Usage: #learn <number|topic>")?;
                    return Ok(Flow::Continue);
                }
                let topic = match arg.parse::<usize>() {
                    Ok(n) => {
                        if self.topics.is_empty() {
                            self.topics = tutor.topics(self.subject).await;
                        }
                        match n.checked_sub(1).and_then(|i| self.topics.get(i)) {
                            Some(topic) => topic.clone(),
                            None => {
                                writeln!(out, "[ERROR] No topic number {n}")?;
                                return Ok(Flow::Continue);
                            }
                        }
                    }
                    Err(_) => arg.to_string(),
                };
                let blocks = tutor.lesson(self.subject, &topic).await;
                writeln!(out, "[LESSON] {topic}")?;
                for line in plain_lines(&blocks) {
                    writeln!(out, "{line}")?;
                }
                writeln!(out)?;
            }
            "quiz" => {
                let difficulty = if arg.is_empty() {
                    Difficulty::default()
                } else {
                    match arg.parse::<Difficulty>() {
                        Ok(difficulty) => difficulty,
                        Err(e) => {
                            writeln!(out, "[ERROR] {e}")?;
                            return Ok(Flow::Continue);
                        }
                    }
                };
                let questions = tutor.quiz(self.subject, difficulty).await;
                match self.quiz.start(questions) {
                    Ok(()) => {
                        writeln!(out, "[QUIZ] {} questions ({})", self.quiz.len(), difficulty.label())?;
                        self.print_question(out)?;
                    }
                    Err(_) => writeln!(out, "[ERROR] Could not generate the quiz, try again")?,
                }
            }
            "stop" => {
                if self.quiz.phase() == QuizPhase::Menu {
                    writeln!(out, "[ERROR] No quiz in progress")?;
                } else {
                    self.quiz.reset();
                    writeln!(out, "[QUIZ] Stopped")?;
                }
            }
            _ => {
                writeln!(out, "[ERROR] Unknown command. Type #help for help.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn answer<W: Write>(&mut self, option: usize, out: &mut W) -> io::Result<()> {
        let Some(question) = self.quiz.current_question().cloned() else {
            return Ok(());
        };
        match self.quiz.answer(option) {
            Some(true) => writeln!(out, "[CORRECT] {}", question.explanation)?,
            Some(false) => writeln!(
                out,
                "[INCORRECT] The answer is {}) {}. {}",
                option_label(question.correct_index),
                question.correct_option().unwrap_or_default(),
                question.explanation
            )?,
            None => {
                writeln!(out, "[ERROR] That option is not available")?;
                return Ok(());
            }
        }

        self.quiz.advance();
        match self.quiz.phase() {
            QuizPhase::Finished => {
                writeln!(out, "[SCORE] {}/{}", self.quiz.score(), self.quiz.len())?;
                self.quiz.reset();
            }
            _ => self.print_question(out)?,
        }
        Ok(())
    }

    fn print_question<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(question) = self.quiz.current_question() {
            writeln!(
                out,
                "[QUESTION {}/{}] {}",
                self.quiz.position() + 1,
                self.quiz.len(),
                question.question
            )?;
            for (i, option) in question.options.iter().enumerate() {
                writeln!(out, "  {}) {option}", option_label(i))?;
            }
        }
        Ok(())
    }

    fn print_topics<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "[TOPICS] {}", self.subject.name())?;
        for (i, topic) in self.topics.iter().enumerate() {
            writeln!(out, "  {}. {topic}", i + 1)?;
        }
        Ok(())
    }
}

/// Lesson blocks as plain text lines.
pub fn plain_lines(blocks: &[Block]) -> Vec<String> {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, spans } => {
                let marks = "#".repeat(usize::from(*level));
                lines.push(format!("{marks} {}", tutor_core::render::spans_text(spans)));
            }
            Block::List { items } => {
                for item in items {
                    lines.push(format!("  • {}", tutor_core::render::spans_text(item)));
                }
            }
            Block::Quote(spans) => {
                lines.push(format!("> {}", tutor_core::render::spans_text(spans)));
            }
            Block::Paragraph(spans) => lines.push(tutor_core::render::spans_text(spans)),
        }
    }
    lines
}

fn print_commands<W: Write>(out: &mut W, tag: &str) -> io::Result<()> {
    writeln!(out, "{tag}")?;
    writeln!(out, "  #subject <name>          - Switch subject (mathematics, physics, chemistry)")?;
    writeln!(out, "  #topics                  - List topics for the subject")?;
    writeln!(out, "  #learn <number|topic>    - Show a lesson")?;
    writeln!(out, "  #quiz <easy|medium|hard> - Start a five question quiz")?;
    writeln!(out, "  #stop                    - Leave the current quiz")?;
    writeln!(out, "  #help                    - Show this help")?;
    writeln!(out, "  #quit                    - Exit")?;
    writeln!(out, "  (anything else is solved as a problem; a-d answers a quiz question)")?;
    Ok(())
}

/// Run the tutor in headless mode until stdin closes or `#quit`.
pub async fn run_headless(mut tutor: Tutor, subject: Subject) -> anyhow::Result<()> {
    let mut session = HeadlessSession::new(subject);
    let mut stdout = io::stdout();

    writeln!(stdout, "=== OmniScience Headless Mode ===")?;
    writeln!(stdout, "Subject: {}", session.subject().name())?;
    writeln!(stdout)?;
    print_commands(&mut stdout, "Commands:")?;
    writeln!(stdout)?;
    stdout.flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        };

        let flow = session.handle_line(&mut tutor, &line, &mut stdout).await?;
        stdout.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tutor_core::TestHarness;

    async fn run(harness: &mut TestHarness, session: &mut HeadlessSession, line: &str) -> String {
        let mut out = Vec::new();
        session
            .handle_line(&mut harness.tutor, line, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_plain_line_is_solved() {
        let mut harness = TestHarness::new();
        harness.expect_text("x = 5");
        let mut session = HeadlessSession::new(Subject::Mathematics);

        let out = run(&mut harness, &mut session, "3x + 5 = 20").await;
        assert!(out.contains("[TUTOR]\nx = 5\n"));
    }

    #[tokio::test]
    async fn test_subject_switch_and_topics() {
        let mut harness = TestHarness::new();
        let mut session = HeadlessSession::new(Subject::Mathematics);

        let out = run(&mut harness, &mut session, "#subject chem").await;
        assert_eq!(out, "[SUBJECT] Chemistry\n");

        let out = run(&mut harness, &mut session, "#topics").await;
        assert!(out.starts_with("[TOPICS] Chemistry\n  1. "));
        assert_eq!(harness.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_learn_by_name_uses_seed() {
        let mut harness = TestHarness::new();
        let mut session = HeadlessSession::new(Subject::Chemistry);

        let out = run(&mut harness, &mut session, "#learn Acids and Bases").await;
        assert!(out.starts_with("[LESSON] Acids and Bases\n# "));
        assert!(!out.contains("**"));
        assert_eq!(harness.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_learn_out_of_range() {
        let mut harness = TestHarness::new();
        let mut session = HeadlessSession::new(Subject::Physics);

        let out = run(&mut harness, &mut session, "#learn 99").await;
        assert_eq!(out, "[ERROR] No topic number 99\n");
    }

    #[tokio::test]
    async fn test_quiz_round_trip() {
        let mut harness = TestHarness::new();
        harness.expect_json(json!({
            "questions": [{
                "question": "d/dx x²?",
                "options": ["x", "2x", "x²", "2"],
                "correctIndex": 1,
                "explanation": "Power rule."
            }]
        }));
        let mut session = HeadlessSession::new(Subject::Mathematics);

        let out = run(&mut harness, &mut session, "#quiz easy").await;
        assert!(out.contains("[QUESTION 1/1] d/dx x²?"));
        assert!(out.contains("  B) 2x"));

        let out = run(&mut harness, &mut session, "b").await;
        assert!(out.starts_with("[CORRECT] Power rule."));
        assert!(out.contains("[SCORE] 1/1"));
    }

    #[tokio::test]
    async fn test_stop_leaves_quiz_and_solves_again() {
        let mut harness = TestHarness::new();
        harness.expect_json(json!([{
            "question": "Unit of force?",
            "options": ["Joule", "Newton", "Watt", "Pascal"],
            "correctIndex": 1,
            "explanation": "1 N = 1 kg·m/s²."
        }]));
        harness.expect_text("About 9.8 m/s².");
        let mut session = HeadlessSession::new(Subject::Physics);

        run(&mut harness, &mut session, "#quiz").await;
        let out = run(&mut harness, &mut session, "what is g?").await;
        assert_eq!(out, "[ERROR] Answer with a-d, or #stop to leave the quiz\n");

        let out = run(&mut harness, &mut session, "#stop").await;
        assert_eq!(out, "[QUIZ] Stopped\n");
        assert_eq!(session.quiz.phase(), QuizPhase::Menu);

        let out = run(&mut harness, &mut session, "what is g?").await;
        assert!(out.contains("[TUTOR]\nAbout 9.8 m/s²."));

        let out = run(&mut harness, &mut session, "#stop").await;
        assert_eq!(out, "[ERROR] No quiz in progress\n");
    }

    #[tokio::test]
    async fn test_failed_quiz_reports_error() {
        let mut harness = TestHarness::new();
        harness.expect_failure();
        let mut session = HeadlessSession::new(Subject::Physics);

        let out = run(&mut harness, &mut session, "#quiz hard").await;
        assert_eq!(out, "[ERROR] Could not generate the quiz, try again\n");
    }

    #[tokio::test]
    async fn test_quit() {
        let mut harness = TestHarness::new();
        let mut session = HeadlessSession::new(Subject::Physics);
        let mut out = Vec::new();

        let flow = session
            .handle_line(&mut harness.tutor, "#quit", &mut out)
            .await
            .unwrap();
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn test_plain_lines_strip_markers() {
        let blocks = tutor_core::render("## Rule\n- **F** = ma\n> Note");
        assert_eq!(plain_lines(&blocks), vec!["## Rule", "  • F = ma", "> Note"]);
    }
}
