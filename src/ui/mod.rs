//! TUI rendering.
//!
//! - [`dashboard`]: the single screen (pickers, settings, status, event log)
//! - [`widgets`]: small reusable pieces

pub mod dashboard;
pub mod widgets;

use ratatui::Frame;

use crate::app::App;

/// Draws one frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    dashboard::render(frame, app);
}
