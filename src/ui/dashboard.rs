use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};

use super::widgets;
use crate::app::{App, FocusedPanel, InputMode, Setting, ToastType};
use crate::constants;
use crate::logger;
use crate::theme;
use crate::utils;

/// Render the dashboard view
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // 1. Header (1 row)
    // 2. Main Content (Flexible)
    // 3. Footer (1 row)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    widgets::footer::render_dashboard(frame, app, chunks[2]);

    // Left: the three pickers | Right: settings, status, log
    let main_layout = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let pickers = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ])
    .split(main_layout[0]);

    render_countries(frame, app, pickers[0]);
    render_cities(frame, app, pickers[1]);
    render_groups(frame, app, pickers[2]);

    let workspace = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_layout[1]);
    let top = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(workspace[0]);

    render_settings(frame, app, top[0]);
    render_status(frame, app, top[1]);
    render_activity_log(frame, app, workspace[1]);

    render_overlays(frame, app);
}

fn render_overlays(frame: &mut Frame, app: &App) {
    if let InputMode::Dns { input, cursor } = &app.input_mode {
        render_dns_overlay(frame, input, *cursor);
    }
    render_toast(frame, app);
}

/// Helper to center a rect
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn panel_block(title: impl Into<Line<'static>>, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(theme::BORDER_FOCUSED)
    } else {
        Style::default().fg(theme::BORDER_DEFAULT)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

// === Header ===

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let sep = || Span::styled(" │ ", Style::default().fg(theme::FROST_DARK));

    let (badge, color, summary) = match &app.status {
        None => ("◌ CHECKING", theme::WARNING, constants::MSG_CHECKING.to_string()),
        Some(status) if status.connected => ("● CONNECTED", theme::SUCCESS, status.summary.clone()),
        Some(status) => ("○ DISCONNECTED", theme::ERROR, status.summary.clone()),
    };

    let account = app
        .account
        .as_ref()
        .map_or_else(|| constants::MSG_LOADING.to_string(), ToString::to_string);

    let mut spans = vec![
        Span::styled(
            format!(" {badge}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            utils::truncate(&summary, 40),
            Style::default().fg(theme::TEXT_PRIMARY),
        ),
        sep(),
        Span::styled("Account: ", Style::default().fg(theme::TEXT_SECONDARY)),
        Span::styled(
            utils::truncate(&account, 40),
            Style::default().fg(theme::ACCENT_PRIMARY),
        ),
        sep(),
        Span::styled("Group: ", Style::default().fg(theme::TEXT_SECONDARY)),
        if app.use_group {
            Span::styled("on", Style::default().fg(theme::SUCCESS))
        } else {
            Span::styled("off", Style::default().fg(theme::INACTIVE))
        },
    ];

    if app.is_busy() {
        spans.push(sep());
        spans.push(Span::styled(
            format!("{} ({})", constants::MSG_WORKING, app.pending),
            Style::default().fg(theme::WARNING),
        ));
    }

    let clock = Line::from(Span::styled(
        format!("{} ", utils::format_local_time()),
        Style::default().fg(theme::TEXT_SECONDARY),
    ));

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(10)]).areas(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), left);
    frame.render_widget(Paragraph::new(clock).alignment(Alignment::Right), right);
}

// === Pickers ===

fn render_countries(frame: &mut Frame, app: &mut App, area: Rect) {
    let items = app
        .countries
        .as_ref()
        .map(|list| list.iter().map(ToString::to_string).collect());
    render_picker(
        frame,
        area,
        constants::TITLE_COUNTRIES,
        items,
        constants::MSG_NO_ITEMS,
        &mut app.country_state,
        app.focused_panel == FocusedPanel::Countries,
    );
}

fn render_cities(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match &app.cities_for {
        Some(country) => format!(" Cities in {country} "),
        None => constants::TITLE_CITIES.to_string(),
    };
    let (items, empty) = match (&app.cities_for, &app.cities) {
        (None, _) => (Some(Vec::new()), constants::MSG_SELECT_COUNTRY),
        (Some(_), None) => (None, constants::MSG_NO_ITEMS),
        (Some(_), Some(list)) => (
            Some(list.iter().map(ToString::to_string).collect()),
            constants::MSG_NO_ITEMS,
        ),
    };
    render_picker(
        frame,
        area,
        title,
        items,
        empty,
        &mut app.city_state,
        app.focused_panel == FocusedPanel::Cities,
    );
}

fn render_groups(frame: &mut Frame, app: &mut App, area: Rect) {
    let items = app
        .groups
        .as_ref()
        .map(|list| list.iter().map(ToString::to_string).collect());
    let title = if app.use_group {
        format!("{}[in use] ", constants::TITLE_GROUPS)
    } else {
        constants::TITLE_GROUPS.to_string()
    };
    render_picker(
        frame,
        area,
        title,
        items,
        constants::MSG_NO_ITEMS,
        &mut app.group_state,
        app.focused_panel == FocusedPanel::Groups,
    );
}

/// A selectable list. `items == None` means the query is still running.
fn render_picker(
    frame: &mut Frame,
    area: Rect,
    title: impl Into<String>,
    items: Option<Vec<String>>,
    empty_message: &str,
    state: &mut ListState,
    focused: bool,
) {
    let block = panel_block(title.into(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(items) = items else {
        frame.render_widget(
            Paragraph::new(constants::MSG_LOADING)
                .style(Style::default().fg(theme::WARNING))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(empty_message)
                .style(Style::default().fg(theme::INACTIVE))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let total = items.len();
    let list = List::new(items.into_iter().map(|name| ListItem::new(name.replace('_', " "))))
        .style(Style::default().fg(theme::TEXT_SECONDARY))
        .highlight_style(
            Style::default()
                .fg(theme::ROW_SELECTED_FG)
                .bg(theme::ROW_SELECTED_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, inner, state);

    render_scrollbar(
        frame,
        area,
        total.saturating_sub(inner.height as usize),
        state.selected().unwrap_or(0),
    );
}

fn render_scrollbar(frame: &mut Frame, area: Rect, content: usize, position: usize) {
    if content == 0 {
        return;
    }
    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme::FROST_DARK))
        .thumb_style(Style::default().fg(theme::ACCENT_PRIMARY));
    let mut scrollbar_state = ScrollbarState::new(content).position(position);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

// === Settings ===

fn render_settings(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel_block(
        constants::TITLE_SETTINGS,
        app.focused_panel == FocusedPanel::Settings,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.settings_loaded {
        frame.render_widget(
            Paragraph::new(constants::MSG_LOADING)
                .style(Style::default().fg(theme::WARNING))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = Setting::ALL
        .iter()
        .map(|setting| {
            let (mark, color) = match app.settings.get(*setting) {
                Some(true) => ("[on ]", theme::SUCCESS),
                Some(false) => ("[off]", theme::ERROR),
                None => ("[ ? ]", theme::INACTIVE),
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::raw(" "),
                Span::styled(setting.label(), Style::default().fg(theme::TEXT_PRIMARY)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(theme::ROW_SELECTED_BG))
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, inner, &mut app.settings_state);
}

// === Status ===

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.status_checked {
        Some(at) => format!(
            "{}· {} ago ",
            constants::TITLE_STATUS,
            utils::format_elapsed(at)
        ),
        None => constants::TITLE_STATUS.to_string(),
    };
    let block = panel_block(title, app.focused_panel == FocusedPanel::Status);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text: Vec<Line> = match &app.status {
        None => vec![Line::from(Span::styled(
            constants::MSG_CHECKING,
            Style::default().fg(theme::WARNING),
        ))],
        Some(status) if status.raw.is_empty() => vec![Line::from(Span::styled(
            status.summary.clone(),
            Style::default().fg(theme::INACTIVE),
        ))],
        Some(status) => status
            .raw
            .lines()
            .map(|line| match line.split_once(':') {
                Some((key, value)) => Line::from(vec![
                    Span::styled(
                        format!("{key}:"),
                        Style::default().fg(theme::TEXT_SECONDARY),
                    ),
                    Span::styled(value.to_string(), Style::default().fg(theme::TEXT_PRIMARY)),
                ]),
                None => Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(theme::TEXT_PRIMARY),
                )),
            })
            .collect(),
    };

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

// === Event Log ===

fn render_activity_log(frame: &mut Frame, app: &App, area: Rect) {
    // Dynamic title based on auto-scroll state
    let title = if app.logs_auto_scroll {
        format!("{}[Live] ", constants::TITLE_LOGS)
    } else {
        format!("{}[Paused - G to resume] ", constants::TITLE_LOGS)
    };

    let block = panel_block(title, app.focused_panel == FocusedPanel::Logs);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let all_logs = logger::get_logs();

    if all_logs.is_empty() {
        frame.render_widget(
            Paragraph::new("No activity yet").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let visible_lines = inner.height as usize;

    let start_idx = if app.logs_auto_scroll {
        all_logs.len().saturating_sub(visible_lines)
    } else {
        (app.logs_scroll as usize).min(all_logs.len().saturating_sub(1))
    };
    let end_idx = (start_idx + visible_lines).min(all_logs.len());

    let max_msg_len = (inner.width as usize).saturating_sub(constants::LOG_PREFIX_WIDTH);

    let logs: Vec<Line> = all_logs[start_idx..end_idx]
        .iter()
        .map(|entry| {
            let time_str = utils::format_system_time_local(entry.timestamp);
            let cat = format!(
                "{:<width$}",
                entry.category,
                width = constants::LOG_CATEGORY_WIDTH
            );
            let level_style = Style::default().fg(entry.level.color());
            let msg_style = match entry.level {
                logger::LogLevel::Info => Style::default().fg(theme::TEXT_PRIMARY),
                logger::LogLevel::Debug => Style::default().fg(Color::DarkGray),
                _ => level_style,
            };

            Line::from(vec![
                Span::styled(
                    format!("[{time_str}] "),
                    Style::default().fg(theme::TEXT_SECONDARY),
                ),
                Span::styled(format!("{} ", entry.level.prefix()), level_style),
                Span::styled(format!("{cat}  "), Style::default().fg(theme::FROST_DARK)),
                Span::styled(utils::truncate(&entry.message, max_msg_len), msg_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(logs), inner);
    render_scrollbar(
        frame,
        area,
        all_logs.len().saturating_sub(visible_lines),
        start_idx,
    );
}

// === Overlays ===

fn render_dns_overlay(frame: &mut Frame, input: &str, cursor: usize) {
    let popup_area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_PRIMARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(constants::TITLE_DNS)
        .title_bottom(Line::from(constants::TITLE_DNS_FOOTER).centered());

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let before = input.chars().take(cursor).collect::<String>();
    let cursor_char = input
        .chars()
        .nth(cursor)
        .map_or_else(|| "█".to_string(), |c| c.to_string());
    let after = input.chars().skip(cursor + 1).collect::<String>();

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            constants::PROMPT_DNS,
            Style::default().fg(theme::TEXT_PRIMARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(before, Style::default().fg(theme::TEXT_PRIMARY)),
            Span::styled(
                cursor_char,
                Style::default()
                    .fg(theme::ROW_SELECTED_FG)
                    .add_modifier(Modifier::REVERSED),
            ),
            Span::styled(after, Style::default().fg(theme::TEXT_PRIMARY)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text), inner);
}

fn render_toast(frame: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };
    let color = match toast.toast_type {
        ToastType::Info => theme::ACCENT_PRIMARY,
        ToastType::Success => theme::SUCCESS,
        ToastType::Warning => theme::WARNING,
        ToastType::Error => theme::ERROR,
    };

    let area = frame.area();
    let width = u16::try_from(toast.message.chars().count() + 4)
        .unwrap_or(u16::MAX)
        .min(area.width.saturating_sub(4))
        .max(10);
    let toast_area = Rect {
        x: area.right().saturating_sub(width + 2),
        y: area.y + 1,
        width,
        height: 3,
    }
    .intersection(area);

    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(utils::truncate(
            &toast.message,
            width.saturating_sub(4) as usize,
        ))
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme::OVERLAY_BG)),
        ),
        toast_area,
    );
}
