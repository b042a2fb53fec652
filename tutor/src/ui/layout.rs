//! Screen layout for the tutor TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of a study screen, top to bottom
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub title_area: Rect,
    pub tabs_area: Rect,
    pub main_area: Rect,
    pub input_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Split `area`. The input row is only reserved when `with_input` is set.
    pub fn calculate(area: Rect, with_input: bool) -> Self {
        let input_height = if with_input { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(input_height),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            title_area: chunks[0],
            tabs_area: chunks[1],
            main_area: chunks[2],
            input_area: chunks[3],
            status_bar: chunks[4],
            hotkey_bar: chunks[5],
        }
    }
}

/// Split the theory screen into topic index and lesson
pub fn theory_split(area: Rect, menu_open: bool) -> (Rect, Rect) {
    if !menu_open {
        return (Rect::default(), area);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(area);
    (chunks[0], chunks[1])
}

/// A rect of at most `width` x `height`, centered in `area`
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect_fixed(60, 20, area);
        assert_eq!(popup, area);

        let small = centered_rect_fixed(20, 4, area);
        assert_eq!(small, Rect::new(10, 3, 20, 4));
    }

    #[test]
    fn test_layout_without_input() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.input_area.height, 0);
        assert_eq!(layout.main_area.height, 20);
    }

    #[test]
    fn test_closed_menu_gives_lesson_everything() {
        let area = Rect::new(0, 0, 80, 20);
        let (menu, lesson) = theory_split(area, false);
        assert_eq!(menu.width, 0);
        assert_eq!(lesson, area);
    }
}
