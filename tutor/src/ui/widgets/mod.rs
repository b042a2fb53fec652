//! TUI widgets for the tutor

pub mod chat;
pub mod home;
pub mod input;
pub mod lesson;
pub mod quiz;
pub mod scroll;
pub mod status_bar;
pub mod topics;

pub use chat::ChatWidget;
pub use home::SubjectCardsWidget;
pub use input::InputWidget;
pub use lesson::LessonWidget;
pub use quiz::QuizWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use topics::TopicMenuWidget;
