//! Solver conversation widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use tutor_core::{ChatMessage, ChatRole, Subject};

use crate::ui::theme::Theme;
use crate::ui::widgets::lesson::blocks_to_lines;
use crate::ui::widgets::scroll::render_scrolled;

/// Widget for the solver conversation
pub struct ChatWidget<'a> {
    messages: &'a [ChatMessage],
    subject: Subject,
    scroll: usize,
    theme: &'a Theme,
    focused: bool,
    pending: bool,
}

impl<'a> ChatWidget<'a> {
    pub fn new(messages: &'a [ChatMessage], subject: Subject, theme: &'a Theme) -> Self {
        Self {
            messages,
            subject,
            scroll: 0,
            theme,
            focused: false,
            pending: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Show a thinking indicator after the last message
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    fn message_lines(&self, message: &ChatMessage) -> Vec<Line<'static>> {
        match message.role {
            ChatRole::User => message
                .text
                .lines()
                .map(|line| {
                    Line::from(Span::styled(format!("> {line}"), self.theme.student_style()))
                })
                .collect(),
            ChatRole::Tutor if message.is_error => vec![Line::from(Span::styled(
                message.text.clone(),
                self.theme.error_style(),
            ))],
            ChatRole::Tutor => {
                blocks_to_lines(&tutor_core::render(&message.text), self.theme, self.subject)
            }
        }
    }
}

impl Widget for ChatWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Solver [j/k scroll] "
        } else {
            " Solver "
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for message in self.messages {
            lines.extend(self.message_lines(message));
            // Add blank line between entries
            lines.push(Line::from(""));
        }

        if self.pending {
            lines.push(Line::from(Span::styled("Thinking ▌", self.theme.system_style())));
        }

        render_scrolled(lines, inner, buf, self.scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::Conversation;

    #[test]
    fn test_problem_is_prefixed_and_reply_rendered() {
        let theme = Theme::default();
        let mut conversation = Conversation::new(Subject::Mathematics);
        conversation.push_user("3x + 5 = 20");
        conversation.push_reply("## Answer\nx = **5**");

        let widget = ChatWidget::new(conversation.messages(), Subject::Mathematics, &theme);
        let problem = widget.message_lines(&conversation.messages()[1]);
        let reply = widget.message_lines(&conversation.messages()[2]);

        assert_eq!(problem[0].spans[0].content, "> 3x + 5 = 20");
        assert_eq!(reply.len(), 2);
        assert!(reply[1].spans.iter().any(|s| s.content == "5"));
    }

    #[test]
    fn test_error_reply_is_not_parsed() {
        let theme = Theme::default();
        let mut conversation = Conversation::new(Subject::Physics);
        conversation.push_error();

        let widget = ChatWidget::new(conversation.messages(), Subject::Physics, &theme);
        let lines = widget.message_lines(&conversation.messages()[1]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].style, theme.error_style());
    }
}
