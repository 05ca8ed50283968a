//! Domain state types for nordpilot.
//!
//! This module contains the value objects returned by the adapter and the
//! UI state, separated by domain:
//! - `location`: location and server group tokens, connect targets
//! - `connection`: connection status and account line
//! - `settings`: boolean tool settings and snapshots
//! - `ui`: focus, input mode, and toasts

mod connection;
mod location;
mod settings;
mod ui;

// Re-export all types for easy access
pub use connection::{AccountInfo, ConnectionStatus};
pub use location::{ConnectTarget, Location, ServerGroup};
pub use settings::{parse_enabled, Setting, SettingsSnapshot};
pub use ui::{FocusedPanel, InputMode, Toast, ToastType, DISMISS_DURATION};
