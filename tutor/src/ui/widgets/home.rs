//! Subject picker

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use tutor_core::Subject;

use crate::ui::theme::Theme;

/// Three subject cards side by side
pub struct SubjectCardsWidget<'a> {
    selected: Subject,
    theme: &'a Theme,
}

impl<'a> SubjectCardsWidget<'a> {
    pub fn new(selected: Subject, theme: &'a Theme) -> Self {
        Self { selected, theme }
    }

    fn render_card(&self, subject: Subject, area: Rect, buf: &mut Buffer) {
        let profile = subject.profile();
        let selected = subject == self.selected;
        let accent = self.theme.accent(subject);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(if selected {
                Style::default().fg(accent)
            } else {
                self.theme.border_style(false)
            });

        let name_style = if selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent)
        };

        let lines = vec![
            Line::from(""),
            Line::from(profile.icon),
            Line::from(""),
            Line::from(Span::styled(profile.name, name_style)),
            Line::from(""),
            Line::from(Span::styled(profile.tagline, self.theme.system_style())),
            Line::from(""),
            Line::from(Span::styled(
                format!("[{}]", subject.index() + 1),
                self.theme.system_style(),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl Widget for SubjectCardsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(area);

        let banner = vec![
            Line::from(Span::styled(
                "OmniScience",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick a subject to study",
                self.theme.system_style(),
            )),
        ];
        Paragraph::new(banner)
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[1]);

        for (subject, card) in Subject::ALL.iter().zip(cards.iter()) {
            self.render_card(*subject, *card, buf);
        }
    }
}
