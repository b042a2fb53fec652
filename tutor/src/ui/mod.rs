//! UI module for the tutor TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
