//! Render orchestration for the tutor TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Mode, Overlay, Screen};
use crate::ui::layout::{centered_rect_fixed, theory_split, AppLayout};
use crate::ui::widgets::{
    ChatWidget, HotkeyBarWidget, InputWidget, LessonWidget, QuizWidget, StatusBarWidget,
    SubjectCardsWidget, TopicMenuWidget,
};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.screen {
        Screen::Home => render_home(frame, app, area),
        Screen::Study(mode) => render_study(frame, app, mode, area),
    }

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the subject picker
fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let layout = AppLayout::calculate(area, false);
    let main = Rect {
        y: layout.title_area.y,
        height: layout.title_area.height + layout.tabs_area.height + layout.main_area.height,
        ..layout.main_area
    };

    frame.render_widget(SubjectCardsWidget::new(app.subject, &app.theme), main);
    render_status_bar(frame, app, layout.status_bar);
    render_hotkey_bar(frame, app, layout.hotkey_bar);
}

/// Render a subject's study screen
fn render_study(frame: &mut Frame, app: &App, mode: Mode, area: Rect) {
    let layout = AppLayout::calculate(area, mode == Mode::Solver);

    render_title_bar(frame, app, layout.title_area);
    render_tabs(frame, app, mode, layout.tabs_area);

    match mode {
        Mode::Solver => {
            let chat = ChatWidget::new(app.conversation.messages(), app.subject, &app.theme)
                .scroll(app.chat_scroll)
                .focused(app.input_mode == InputMode::Normal)
                .pending(app.loading);
            frame.render_widget(chat, layout.main_area);
            render_input(frame, app, layout.input_area);
        }
        Mode::Theory => render_theory(frame, app, layout.main_area),
        Mode::Quiz => {
            let quiz = QuizWidget::new(&app.quiz, app.subject, &app.theme)
                .difficulty(app.quiz_difficulty)
                .failed(app.quiz_failed);
            frame.render_widget(quiz, layout.main_area);
        }
    }

    render_status_bar(frame, app, layout.status_bar);
    render_hotkey_bar(frame, app, layout.hotkey_bar);
}

/// Render the topic index beside the lesson
fn render_theory(frame: &mut Frame, app: &App, area: Rect) {
    let (menu_area, lesson_area) = theory_split(area, app.topic_menu_open);

    if app.topic_menu_open {
        let menu = TopicMenuWidget::new(&app.topics, app.subject, &app.theme)
            .cursor(app.topic_cursor)
            .focused(true);
        frame.render_widget(menu, menu_area);
    }

    let (topic, blocks) = match &app.lesson {
        Some(lesson) => (Some(lesson.topic.as_str()), lesson.blocks.as_slice()),
        None => (None, &[][..]),
    };
    let lesson = LessonWidget::new(blocks, app.subject, &app.theme)
        .topic(topic)
        .scroll(app.lesson_scroll)
        .focused(!app.topic_menu_open);
    frame.render_widget(lesson, lesson_area);
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let profile = app.subject.profile();
    let title = format!(" {} {} ", profile.icon, profile.name);

    let line = Line::from(Span::styled(
        title,
        app.theme
            .accent_style(app.subject)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the mode tabs
fn render_tabs(frame: &mut Frame, app: &App, mode: Mode, area: Rect) {
    let titles: Vec<&str> = Mode::ALL.iter().map(|m| m.title()).collect();
    let tabs = Tabs::new(titles)
        .select(mode.index())
        .style(app.theme.system_style())
        .highlight_style(
            app.theme
                .accent_style(app.subject)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_widget = StatusBarWidget::new(app.subject, app.mode(), app.input_mode, &app.theme)
        .message(app.status_message());

    frame.render_widget(status_widget, area);
}

/// Render the hotkey bar
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hotkey_widget = HotkeyBarWidget::new(app.mode(), app.input_mode, &app.theme);
    frame.render_widget(hotkey_widget, area);
}

/// Render the input area
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = if app.loading {
        "Solving..."
    } else {
        "Press i to type a problem"
    };

    let input_widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(app.input_mode == InputMode::Insert)
        .placeholder(placeholder);

    frame.render_widget(input_widget, area);
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(54, 28, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " OmniScience - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Everywhere:", heading)),
        Line::from("  Tab/Shift+Tab  Next/previous mode"),
        Line::from("  Esc            Back to subjects"),
        Line::from("  ?              Toggle this help"),
        Line::from("  q / Ctrl+C     Quit"),
        Line::from(""),
        Line::from(Span::styled("Solver:", heading)),
        Line::from("  i              Type a problem (INSERT mode)"),
        Line::from("  Enter          Solve it"),
        Line::from("  ↑/↓            Input history (INSERT mode)"),
        Line::from("  j/k, g/G       Scroll, jump to top/bottom"),
        Line::from(""),
        Line::from(Span::styled("Theory:", heading)),
        Line::from("  j/k            Move in the index / scroll"),
        Line::from("  Enter          Load the lesson"),
        Line::from("  o              Show or hide the index"),
        Line::from(""),
        Line::from(Span::styled("Quiz:", heading)),
        Line::from("  1-3            Easy / Medium / Hard"),
        Line::from("  a-d or 1-4     Answer"),
        Line::from("  Enter or n     Next question"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
