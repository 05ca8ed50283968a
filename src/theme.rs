//! Color palette for the dashboard.
//!
//! Frost blues on a dark slate, with the usual green / amber / red for state.

use ratatui::style::Color;

// === Base Palette ===

/// Dark slate for panels.
pub const PANEL_BG: Color = Color::Rgb(30, 41, 59);
/// Selected row background.
pub const PANEL_HIGHLIGHT: Color = Color::Rgb(46, 58, 80);

/// Frost blue, the main accent.
pub const FROST: Color = Color::Rgb(136, 192, 208);
/// Lighter frost for selected text.
pub const FROST_LIGHT: Color = Color::Rgb(143, 188, 187);
/// Deep frost for idle borders.
pub const FROST_DARK: Color = Color::Rgb(94, 129, 172);

pub const GREEN: Color = Color::Rgb(163, 190, 140);
pub const AMBER: Color = Color::Rgb(235, 203, 139);
pub const RED: Color = Color::Rgb(191, 97, 106);

pub const TEXT_WHITE: Color = Color::Rgb(236, 239, 244);
pub const TEXT_MUTED: Color = Color::Rgb(148, 163, 184);

// === Semantic Aliases ===

pub const TEXT_PRIMARY: Color = TEXT_WHITE;
pub const TEXT_SECONDARY: Color = TEXT_MUTED;
pub const ACCENT_PRIMARY: Color = FROST;
pub const SUCCESS: Color = GREEN;
pub const WARNING: Color = AMBER;
pub const ERROR: Color = RED;
/// Disabled toggles and empty lists.
pub const INACTIVE: Color = Color::Gray;

// === UI Elements ===

pub const BORDER_DEFAULT: Color = FROST_DARK;
pub const BORDER_FOCUSED: Color = FROST;
pub const ROW_SELECTED_BG: Color = PANEL_HIGHLIGHT;
pub const ROW_SELECTED_FG: Color = FROST_LIGHT;
/// Background of modal overlays.
pub const OVERLAY_BG: Color = PANEL_BG;
