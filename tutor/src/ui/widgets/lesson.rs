//! Lesson display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use tutor_core::{Block as ContentBlock, Inline, Subject};

use crate::ui::theme::Theme;
use crate::ui::widgets::scroll::render_scrolled;

/// Turn rendered content into styled terminal lines.
pub fn blocks_to_lines(blocks: &[ContentBlock], theme: &Theme, subject: Subject) -> Vec<Line<'static>> {
    let accent = theme.accent(subject);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Heading { level, spans } => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                let style = match level {
                    1 => Style::default()
                        .fg(accent)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    2 => Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    _ => theme.text_style().add_modifier(Modifier::BOLD),
                };
                lines.push(styled_line(Vec::new(), spans, style, accent));
            }
            ContentBlock::List { items } => {
                for item in items {
                    let bullet = Span::styled("  • ", Style::default().fg(accent));
                    lines.push(styled_line(vec![bullet], item, theme.text_style(), accent));
                }
            }
            ContentBlock::Quote(spans) => {
                let bar = Span::styled("│ ", Style::default().fg(accent));
                let style = theme.text_style().add_modifier(Modifier::ITALIC);
                lines.push(styled_line(vec![bar], spans, style, accent));
            }
            ContentBlock::Paragraph(spans) => {
                lines.push(styled_line(Vec::new(), spans, theme.text_style(), accent));
            }
        }
    }

    lines
}

fn styled_line(
    mut prefix: Vec<Span<'static>>,
    spans: &[Inline],
    base: Style,
    accent: ratatui::style::Color,
) -> Line<'static> {
    for span in spans {
        match span {
            Inline::Plain(text) => prefix.push(Span::styled(text.clone(), base)),
            Inline::Bold(text) => prefix.push(Span::styled(
                text.clone(),
                base.fg(accent).add_modifier(Modifier::BOLD),
            )),
        }
    }
    Line::from(prefix)
}

/// Widget for a loaded lesson
pub struct LessonWidget<'a> {
    topic: Option<&'a str>,
    blocks: &'a [ContentBlock],
    subject: Subject,
    scroll: usize,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> LessonWidget<'a> {
    pub fn new(blocks: &'a [ContentBlock], subject: Subject, theme: &'a Theme) -> Self {
        Self {
            topic: None,
            blocks,
            subject,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn topic(mut self, topic: Option<&'a str>) -> Self {
        self.topic = topic;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for LessonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match (self.topic, self.focused) {
            (Some(topic), true) => format!(" {topic} [j/k scroll, o index] "),
            (Some(topic), false) => format!(" {topic} "),
            (None, _) => " Lesson ".to_string(),
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = if self.blocks.is_empty() {
            vec![Line::from(Span::styled(
                "Pick a topic from the index and press Enter.",
                self.theme.system_style(),
            ))]
        } else {
            blocks_to_lines(self.blocks, self.theme, self.subject)
        };

        render_scrolled(lines, inner, buf, self.scroll);
    }
}
