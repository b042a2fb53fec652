//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::Theme;

/// Input field widget
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a Theme,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a Theme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Type a problem...",
            is_active: true,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    fn line(&self) -> Line<'a> {
        if self.content.is_empty() && !self.is_active {
            return Line::from(vec![
                Span::styled("> ", self.theme.student_style()),
                Span::styled(self.placeholder, Style::default().add_modifier(Modifier::DIM)),
            ]);
        }

        // Use character-based slicing for unicode safety
        let before_cursor: String = self.content.chars().take(self.cursor_position).collect();
        let at_cursor = self
            .content
            .chars()
            .nth(self.cursor_position)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after_cursor: String = self.content.chars().skip(self.cursor_position + 1).collect();

        let cursor_style = if self.is_active {
            Style::default()
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                .fg(self.theme.student_text)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled("> ", self.theme.student_style()),
            Span::raw(before_cursor),
            Span::styled(at_cursor, cursor_style),
            Span::raw(after_cursor),
        ])
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.line()).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_splits_on_characters() {
        let theme = Theme::default();
        let line = InputWidget::new("√2π", &theme).cursor_position(1).line();

        assert_eq!(line.spans[1].content, "√");
        assert_eq!(line.spans[2].content, "2");
        assert_eq!(line.spans[3].content, "π");
    }

    #[test]
    fn test_inactive_empty_input_shows_placeholder() {
        let theme = Theme::default();
        let line = InputWidget::new("", &theme)
            .active(false)
            .placeholder("Press i to type")
            .line();

        assert_eq!(line.spans[1].content, "Press i to type");
    }
}
