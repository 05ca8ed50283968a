//! Message system for the dashboard.
//!
//! All state mutations flow through [`Message`], following the Elm
//! Architecture: key presses, ticks and background results are turned into
//! messages and applied in one place, [`crate::app::App::handle_message`].

use crate::core::Response;
use crate::state::{FocusedPanel, ToastType};

/// Direction for list selection movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Next,
    Prev,
    First,
    Last,
}

/// All messages that can modify application state.
#[derive(Debug)]
pub enum Message {
    // === Navigation ===
    /// Focus next panel
    NextPanel,
    /// Focus previous panel
    PreviousPanel,
    /// Focus a specific panel
    FocusPanel(FocusedPanel),
    /// Move the selection (or scroll) in the focused panel
    Move(SelectionMove),
    /// Enter on the focused panel
    Activate,

    // === VPN ===
    /// Connect to the group, city or country, in that order of preference
    Connect,
    /// Connect without a target and let the tool choose
    QuickConnect,
    Disconnect,
    /// Re-query the location lists, status, account and settings
    Refresh,
    /// Flip "use server group"
    ToggleUseGroup,
    /// Flip the selected setting
    ToggleSetting,

    // === DNS Dialog ===
    OpenDns,
    SubmitDns(String),

    // === UI ===
    /// Close the current overlay
    CloseOverlay,
    /// Show toast notification
    Toast(String, ToastType),
    /// Clear the event log
    ClearLogs,
    Quit,

    // === System ===
    /// Periodic heartbeat tick
    Tick,
    /// Terminal resize event
    Resize(u16, u16),
    /// Result from a background adapter request
    Response(Response),
}

/// A key and what it does, shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

const fn hint(key: &'static str, label: &'static str) -> KeyHint {
    KeyHint { key, label }
}

/// Footer hints for the focused panel, panel-specific keys first.
pub fn hints_for(panel: FocusedPanel) -> Vec<KeyHint> {
    let mut hints = match panel {
        FocusedPanel::Countries => vec![hint("Enter", "Cities"), hint("c", "Connect")],
        FocusedPanel::Cities | FocusedPanel::Groups => {
            vec![hint("Enter", "Connect"), hint("g", "Use Group")]
        }
        FocusedPanel::Settings => vec![hint("Space", "Toggle"), hint("n", "DNS")],
        FocusedPanel::Status => vec![hint("r", "Refresh")],
        FocusedPanel::Logs => vec![hint("j/k", "Scroll"), hint("L", "Clear")],
    };

    hints.extend_from_slice(&[
        hint("d", "Disconnect"),
        hint("Q", "Quick Connect"),
        hint("Tab", "Switch Panel"),
        hint("q", "Quit"),
    ]);
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_panel_has_global_hints() {
        for panel in FocusedPanel::CYCLE {
            let hints = hints_for(panel);
            assert!(hints.iter().any(|h| h.key == "q"));
            assert!(hints.iter().any(|h| h.key == "d"));
            assert!(hints.iter().any(|h| h.key == "Tab"));
        }
    }

    #[test]
    fn test_settings_hints_include_toggle_and_dns() {
        let hints = hints_for(FocusedPanel::Settings);
        assert_eq!(hints[0], hint("Space", "Toggle"));
        assert!(hints.iter().any(|h| h.key == "n"));
    }

    #[test]
    fn test_logs_hints_include_clear() {
        let hints = hints_for(FocusedPanel::Logs);
        assert!(hints.iter().any(|h| h.key == "L"));
    }
}
