//! Color theme and styling for the tutor TUI

use ratatui::style::{Color, Modifier, Style};
use tutor_core::Subject;

/// Tutor UI color theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub student_text: Color,
    pub error_text: Color,
    pub system_text: Color,

    // Quiz colors
    pub correct: Color,
    pub incorrect: Color,

    // Subject accents
    pub mathematics: Color,
    pub physics: Color,
    pub chemistry: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            student_text: Color::Cyan,
            error_text: Color::LightRed,
            system_text: Color::DarkGray,

            correct: Color::Green,
            incorrect: Color::Red,

            mathematics: Color::LightBlue,
            physics: Color::Magenta,
            chemistry: Color::Green,
        }
    }
}

impl Theme {
    /// Accent color for a subject
    pub fn accent(&self, subject: Subject) -> Color {
        match subject {
            Subject::Mathematics => self.mathematics,
            Subject::Physics => self.physics,
            Subject::Chemistry => self.chemistry,
        }
    }

    pub fn accent_style(&self, subject: Subject) -> Style {
        Style::default().fg(self.accent(subject))
    }

    /// Get style for normal text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for the student's problems
    pub fn student_style(&self) -> Style {
        Style::default()
            .fg(self.student_text)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_text)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for a quiz option after the answer is locked in
    pub fn answer_style(&self, is_correct_option: bool, is_selected: bool) -> Style {
        if is_correct_option {
            Style::default()
                .fg(self.correct)
                .add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default()
                .fg(self.incorrect)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            self.system_style()
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_accents_are_distinct() {
        let theme = Theme::default();
        let accents: Vec<Color> = Subject::ALL.iter().map(|s| theme.accent(*s)).collect();
        assert_ne!(accents[0], accents[1]);
        assert_ne!(accents[1], accents[2]);
        assert_ne!(accents[0], accents[2]);
    }
}
