//! Topic index widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use tutor_core::Subject;

use crate::ui::theme::Theme;

/// The list of topics for a subject, with a cursor
pub struct TopicMenuWidget<'a> {
    topics: &'a [String],
    cursor: usize,
    subject: Subject,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> TopicMenuWidget<'a> {
    pub fn new(topics: &'a [String], subject: Subject, theme: &'a Theme) -> Self {
        Self {
            topics,
            cursor: 0,
            subject,
            theme,
            focused: true,
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TopicMenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" Topics ", self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.topics.is_empty() {
            let hint = Paragraph::new(Line::from(Span::styled(
                "No topics loaded. Press r to retry.",
                self.theme.system_style(),
            )))
            .wrap(Wrap { trim: true });
            hint.render(inner, buf);
            return;
        }

        let accent = self.theme.accent(self.subject);
        let lines: Vec<Line> = self
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                if i == self.cursor {
                    Line::from(vec![
                        Span::styled("▶ ", Style::default().fg(accent)),
                        Span::styled(
                            topic.as_str(),
                            Style::default().fg(accent).add_modifier(Modifier::BOLD),
                        ),
                    ])
                } else {
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(topic.as_str(), self.theme.text_style()),
                    ])
                }
            })
            .collect();

        // Keep the cursor in view
        let visible = inner.height as usize;
        let offset = (self.cursor + 1).saturating_sub(visible);

        Paragraph::new(lines)
            .scroll((offset as u16, 0))
            .render(inner, buf);
    }
}
