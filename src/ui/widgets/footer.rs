//! Footer widget with context-aware keybinding hints

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};
use crate::message::{self, KeyHint};
use crate::theme;

/// Render dashboard footer with context-aware shortcuts
pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    // The DNS dialog shows its own hints in its border
    if matches!(app.input_mode, InputMode::Dns { .. }) {
        let hints = [
            KeyHint {
                key: "Enter",
                label: "Apply",
            },
            KeyHint {
                key: "Esc",
                label: "Cancel",
            },
        ];
        render_hints(frame, area, &hints, None);
        return;
    }

    let hints = message::hints_for(app.focused_panel);
    render_hints(frame, area, &hints, Some(app.focused_panel.name()));
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[KeyHint], panel_name: Option<&str>) {
    let [left, right] = Layout::horizontal([
        Constraint::Min(0),     // Hints (left)
        Constraint::Length(18), // Branding (right)
    ])
    .areas(area);

    // 1. Hints on the left with optional panel indicator
    let mut hint_spans = Vec::new();
    let mut current_width = 0;
    let max_width = left.width as usize;

    if let Some(panel) = panel_name {
        let panel_indicator = format!("[{panel}] ");
        current_width += panel_indicator.chars().count();
        hint_spans.push(Span::styled(
            panel_indicator,
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        hint_spans.push(Span::raw(" "));
        current_width += 1;
    }

    for (i, hint) in hints.iter().enumerate() {
        // "key" + " " + "label", plus " │ " between items
        let sep_width = if i > 0 { 3 } else { 0 };
        let item_width = hint.key.chars().count() + 1 + hint.label.chars().count() + sep_width;

        if current_width + item_width > max_width {
            break;
        }

        if i > 0 {
            hint_spans.push(Span::styled(
                " │ ",
                Style::default().fg(theme::FROST_DARK),
            ));
        }
        hint_spans.push(Span::styled(
            hint.key,
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        hint_spans.push(Span::raw(" "));
        hint_spans.push(Span::styled(
            hint.label,
            Style::default().fg(theme::TEXT_SECONDARY),
        ));

        current_width += item_width;
    }
    frame.render_widget(Paragraph::new(Line::from(hint_spans)), left);

    // 2. Branding on the right
    let branding = Line::from(Span::styled(
        format!(
            "{} v{} ",
            crate::constants::APP_NAME,
            crate::constants::APP_VERSION
        ),
        Style::default().fg(theme::FROST_DARK),
    ));
    frame.render_widget(Paragraph::new(branding).alignment(Alignment::Right), right);
}
