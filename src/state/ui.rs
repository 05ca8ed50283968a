//! UI state types.

use std::time::{Duration, Instant};

/// Duration for toast notifications to remain visible.
pub const DISMISS_DURATION: Duration = Duration::from_secs(4);

/// Currently focused UI panel for keyboard navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FocusedPanel {
    /// Country list (left column, top).
    #[default]
    Countries,
    /// City list for the selected country.
    Cities,
    /// Server group list.
    Groups,
    /// Settings toggles (right column, top).
    Settings,
    /// Raw status output.
    Status,
    /// Event log.
    Logs,
}

impl FocusedPanel {
    /// Order used by Tab / Shift-Tab.
    pub const CYCLE: [Self; 6] = [
        Self::Countries,
        Self::Cities,
        Self::Groups,
        Self::Settings,
        Self::Status,
        Self::Logs,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Countries => "Countries",
            Self::Cities => "Cities",
            Self::Groups => "Groups",
            Self::Settings => "Settings",
            Self::Status => "Status",
            Self::Logs => "Logs",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        let idx = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        Self::CYCLE[(idx + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }
}

/// Current input mode determining keyboard behavior.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode.
    #[default]
    Normal,
    /// DNS address dialog is active.
    Dns {
        /// Current input string.
        input: String,
        /// Cursor position in the input string.
        cursor: usize,
    },
}

/// Types of toast notifications for color coding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToastType {
    /// Informational message (Blue)
    #[default]
    Info,
    /// Success message (Green)
    Success,
    /// Warning message (Yellow)
    Warning,
    /// Error message (Red)
    Error,
}

/// Toast notification for temporary messages.
#[derive(Clone, Debug)]
pub struct Toast {
    /// Message to display.
    pub message: String,
    /// Type of toast for styling.
    #[allow(clippy::struct_field_names)]
    pub toast_type: ToastType,
    /// When the toast should disappear.
    pub expires: Instant,
}

impl Toast {
    /// Check if the toast notification has expired
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires
    }
}
