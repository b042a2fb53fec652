//! Scrolled paragraph with scrollbar and position hints

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::Line,
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget, Wrap},
};

/// Render `lines` into `inner`, scrolled by `scroll` (capped to the content).
///
/// Returns the scroll offset actually used.
pub fn render_scrolled(lines: Vec<Line<'_>>, inner: Rect, buf: &mut Buffer, scroll: usize) -> usize {
    let visible_height = inner.height as usize;
    let total_lines = lines.len();
    let max_scroll = total_lines.saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });

    paragraph.render(inner, buf);

    if total_lines <= visible_height {
        return scroll;
    }

    let scrollbar_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .symbols(scrollbar::VERTICAL)
        .thumb_style(Style::default().fg(Color::DarkGray))
        .track_style(Style::default().fg(Color::Black))
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));

    let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
    scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

    if scroll > 0 {
        write_hint(buf, inner, inner.y, &format!(" ↑{scroll} "));
    }
    if scroll < max_scroll {
        let remaining = max_scroll - scroll;
        let bottom = inner.y + inner.height.saturating_sub(1);
        write_hint(buf, inner, bottom, &format!(" ↓{remaining} more "));
    }

    scroll
}

fn write_hint(buf: &mut Buffer, inner: Rect, y: u16, hint: &str) {
    let hint_style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
    for (i, ch) in hint.chars().enumerate() {
        let x = inner.x + (i as u16);
        if x < inner.x + inner.width.saturating_sub(2) {
            buf[(x, y)].set_char(ch).set_style(hint_style);
        }
    }
}
