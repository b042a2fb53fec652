//! Quiz widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use tutor_core::quiz::{option_label, QuizPhase};
use tutor_core::{Difficulty, QuizGame, Subject};

use crate::ui::theme::Theme;

/// Difficulty menu, the current question, or the final score
pub struct QuizWidget<'a> {
    game: &'a QuizGame,
    difficulty: Difficulty,
    subject: Subject,
    failed: bool,
    theme: &'a Theme,
}

impl<'a> QuizWidget<'a> {
    pub fn new(game: &'a QuizGame, subject: Subject, theme: &'a Theme) -> Self {
        Self {
            game,
            difficulty: Difficulty::default(),
            subject,
            failed: false,
            theme,
        }
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// The last generation produced no questions
    pub fn failed(mut self, failed: bool) -> Self {
        self.failed = failed;
        self
    }

    fn menu_lines(&self) -> Vec<Line<'_>> {
        let accent = self.theme.accent(self.subject);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} quiz", self.subject.name()),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Choose a difficulty:"),
        ];

        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let marker = if *difficulty == self.difficulty { "▶" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker} "), Style::default().fg(accent)),
                Span::styled(format!("{}", i + 1), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {}", difficulty.label())),
            ]));
        }

        if self.failed {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Could not generate the quiz, try again.",
                self.theme.error_style(),
            )));
        }
        lines
    }

    fn question_lines(&self) -> Vec<Line<'_>> {
        let Some(question) = self.game.current_question() else {
            return Vec::new();
        };
        let accent = self.theme.accent(self.subject);
        let selected = self.game.selected();

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Question {}/{}  ·  Score {}",
                    self.game.position() + 1,
                    self.game.len(),
                    self.game.score()
                ),
                self.theme.system_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                question.question.as_str(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (i, option) in question.options.iter().enumerate() {
            let style = match selected {
                Some(choice) => self.theme.answer_style(i == question.correct_index, i == choice),
                None => self.theme.text_style(),
            };
            lines.push(Line::from(Span::styled(
                format!("  {}) {option}", option_label(i)),
                style,
            )));
        }

        if let Some(choice) = selected {
            lines.push(Line::from(""));
            let verdict = if choice == question.correct_index {
                Span::styled("Correct! ", Style::default().fg(self.theme.correct).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("Incorrect. ", Style::default().fg(self.theme.incorrect).add_modifier(Modifier::BOLD))
            };
            lines.push(Line::from(vec![verdict, Span::raw(question.explanation.as_str())]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press Enter or n for the next question",
                self.theme.system_style(),
            )));
        }
        lines
    }

    fn finished_lines(&self) -> Vec<Line<'_>> {
        let accent = self.theme.accent(self.subject);
        vec![
            Line::from(Span::styled(
                "Quiz complete",
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "You scored {} out of {} ({})",
                self.game.score(),
                self.game.len(),
                self.difficulty.label()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to return to the menu",
                self.theme.system_style(),
            )),
        ]
    }
}

impl Widget for QuizWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" Quiz ", self.theme.title_style(true)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.game.phase() {
            QuizPhase::Menu => self.menu_lines(),
            QuizPhase::Playing => self.question_lines(),
            QuizPhase::Finished => self.finished_lines(),
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::QuizQuestion;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_failed_menu_shows_retry_message() {
        let theme = Theme::default();
        let game = QuizGame::new();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);

        QuizWidget::new(&game, Subject::Chemistry, &theme)
            .failed(true)
            .render(area, &mut buf);

        assert!(buffer_text(&buf).contains("Could not generate the quiz"));
    }

    #[test]
    fn test_answered_question_shows_explanation() {
        let theme = Theme::default();
        let mut game = QuizGame::new();
        game.start(vec![QuizQuestion {
            question: "Unit of force?".to_string(),
            options: vec!["Joule".into(), "Newton".into(), "Watt".into(), "Pascal".into()],
            correct_index: 1,
            explanation: "kg m/s²".to_string(),
        }])
        .unwrap();
        game.answer(0);

        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        QuizWidget::new(&game, Subject::Physics, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Incorrect."));
        assert!(text.contains("B) Newton"));
    }
}
