//! Status and hotkey bars

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use tutor_core::Subject;

use crate::app::{InputMode, Mode};
use crate::ui::theme::Theme;

/// One-line summary of where the student is
pub struct StatusBarWidget<'a> {
    subject: Subject,
    mode: Option<Mode>,
    input_mode: InputMode,
    message: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(subject: Subject, mode: Option<Mode>, input_mode: InputMode, theme: &'a Theme) -> Self {
        Self {
            subject,
            mode,
            input_mode,
            message: None,
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (mode_label, mode_color) = match self.input_mode {
            InputMode::Normal => (" NORMAL ", Color::Blue),
            InputMode::Insert => (" INSERT ", Color::Green),
        };

        let mut spans = vec![
            Span::styled(
                mode_label,
                Style::default()
                    .bg(mode_color)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.subject.name(), self.theme.accent_style(self.subject)),
        ];

        if let Some(mode) = self.mode {
            spans.push(Span::raw(" › "));
            spans.push(Span::raw(mode.title()));
        }

        if let Some(message) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message, Style::default().fg(Color::Yellow)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Context-sensitive key hints
pub struct HotkeyBarWidget<'a> {
    mode: Option<Mode>,
    input_mode: InputMode,
    theme: &'a Theme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(mode: Option<Mode>, input_mode: InputMode, theme: &'a Theme) -> Self {
        Self {
            mode,
            input_mode,
            theme,
        }
    }

    fn hotkeys(&self) -> &'static [(&'static str, &'static str)] {
        if self.input_mode == InputMode::Insert {
            return &[("Enter", "Solve"), ("↑/↓", "History"), ("Esc", "Normal")];
        }
        match self.mode {
            None => &[("←/→", "Subject"), ("1-3", "Pick"), ("Enter", "Open"), ("?", "Help"), ("q", "Quit")],
            Some(Mode::Solver) => &[("i", "Type"), ("j/k", "Scroll"), ("Tab", "Mode"), ("Esc", "Home"), ("?", "Help")],
            Some(Mode::Theory) => &[("j/k", "Move"), ("Enter", "Load"), ("o", "Index"), ("Tab", "Mode"), ("Esc", "Home")],
            Some(Mode::Quiz) => &[("1-3", "Difficulty"), ("a-d", "Answer"), ("n", "Next"), ("Tab", "Mode"), ("Esc", "Home")],
        }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (key, action) in self.hotkeys() {
            spans.push(Span::styled(
                format!(" {key} "),
                Style::default()
                    .fg(self.theme.border_focused)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!("{action} "), self.theme.system_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
