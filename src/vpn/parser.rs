//! Text parsing for the tool's line-oriented output.
//!
//! All functions here are pure: they take captured stdout and return values.

use crate::constants;
use crate::state::{AccountInfo, ConnectionStatus, Setting, SettingsSnapshot};

/// Splits output into meaningful lines.
///
/// The tool redraws a spinner with carriage returns (`\r-\r  \r`) before its
/// real output, so only the text after the last `\r` of each line counts.
/// Lines are trimmed and blank lines dropped.
pub fn clean_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(|line| line.rsplit('\r').next().unwrap_or(line).trim())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Splits list output (`countries`, `cities`, `groups`) into tokens.
///
/// Tokens are separated by any whitespace; trailing commas from the older
/// comma-separated format are removed.
pub fn parse_tokens(raw: &str) -> Vec<String> {
    clean_lines(raw)
        .into_iter()
        .flat_map(str::split_whitespace)
        .map(|token| token.trim_end_matches(',').trim())
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Extracts `Key: Value` pairs, splitting on the first colon.
///
/// Lines without a colon or with an empty key are skipped; values may be empty.
pub fn parse_key_values(raw: &str) -> Vec<(String, String)> {
    clean_lines(raw)
        .into_iter()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Derives a [`ConnectionStatus`] from `status` output.
///
/// `connected` is true iff `marker` occurs in the output (case-sensitive).
/// The summary is the first line after the one carrying the marker, or the
/// marker line itself when nothing follows. Without the marker the summary
/// is the fixed disconnected message.
pub fn parse_status(raw: &str, marker: &str) -> ConnectionStatus {
    let lines = clean_lines(raw);
    let marker_line = if marker.is_empty() {
        None
    } else {
        lines.iter().position(|line| line.contains(marker))
    };

    let summary = match marker_line {
        Some(idx) => lines
            .get(idx + 1)
            .or_else(|| lines.get(idx))
            .map_or_else(|| marker.to_string(), ToString::to_string),
        None => constants::STATUS_DISCONNECTED.to_string(),
    };

    ConnectionStatus {
        connected: marker_line.is_some(),
        summary,
        fields: parse_key_values(raw),
        raw: lines.join("\n"),
    }
}

/// Derives [`AccountInfo`] from `account` output.
///
/// The second meaningful line identifies the account (the first is a
/// heading). A lone line is used as-is; no lines at all is `Unavailable`.
pub fn parse_account(raw: &str) -> AccountInfo {
    let lines = clean_lines(raw);
    lines
        .get(1)
        .or_else(|| lines.first())
        .map_or(AccountInfo::Unavailable, |line| {
            AccountInfo::Known((*line).to_string())
        })
}

/// Parses `settings` output into a snapshot of the recognized settings.
///
/// Unrecognized keys and values other than `enabled`/`disabled` are ignored.
/// If a key appears twice the last occurrence wins.
pub fn parse_settings(raw: &str) -> SettingsSnapshot {
    let mut snapshot = SettingsSnapshot::default();
    for (key, value) in parse_key_values(raw) {
        let Some(setting) = Setting::from_label(&key) else {
            continue;
        };
        match crate::state::parse_enabled(&value) {
            Some(enabled) => snapshot.set(setting, enabled),
            None => crate::log_debug!(
                "PARSE",
                "Ignoring non-boolean value '{value}' for setting '{key}'"
            ),
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- clean_lines / parse_tokens ----

    #[test]
    fn test_clean_lines_strips_spinner() {
        let raw = "\r-\r  \r\r-\r  \rStatus: Connected\nServer: de123\n";
        assert_eq!(clean_lines(raw), vec!["Status: Connected", "Server: de123"]);
    }

    #[test]
    fn test_parse_tokens_newlines() {
        assert_eq!(
            parse_tokens("Germany\nFrance\nJapan"),
            vec!["Germany", "France", "Japan"]
        );
    }

    #[test]
    fn test_parse_tokens_mixed_whitespace() {
        assert_eq!(
            parse_tokens("Albania   Argentina\tAustralia\n\nAustria\n"),
            vec!["Albania", "Argentina", "Australia", "Austria"]
        );
    }

    #[test]
    fn test_parse_tokens_comma_format() {
        assert_eq!(
            parse_tokens("Albania, Argentina, United_States"),
            vec!["Albania", "Argentina", "United_States"]
        );
    }

    #[test]
    fn test_parse_tokens_empty() {
        assert!(parse_tokens("").is_empty());
        assert!(parse_tokens("\n  \n\r-\r  \r").is_empty());
    }

    // ---- parse_status ----

    #[test]
    fn test_status_connected_summary_is_second_line() {
        let status = parse_status("Status: Connected\nServer: de123", "Connected");
        assert!(status.connected);
        assert_eq!(status.summary, "Server: de123");
        assert_eq!(status.field("Server"), Some("de123"));
    }

    #[test]
    fn test_status_disconnected_falls_back() {
        let status = parse_status("Status: Disconnected\n", "Connected");
        assert!(!status.connected);
        assert_eq!(status.summary, "Disconnected");
        assert_eq!(status.field("Status"), Some("Disconnected"));
    }

    #[test]
    fn test_status_empty_output() {
        let status = parse_status("", "Connected");
        assert!(!status.connected);
        assert_eq!(status.summary, "Disconnected");
        assert!(status.raw.is_empty());
    }

    #[test]
    fn test_status_marker_on_last_line() {
        let status = parse_status("Status: Connected", "Connected");
        assert!(status.connected);
        assert_eq!(status.summary, "Status: Connected");
    }

    #[test]
    fn test_status_full_output() {
        let raw = "Status: Connected\nHostname: de1042.nordvpn.com\nIP: 185.1.2.3\n\
                   Country: Germany\nCity: Frankfurt\nCurrent technology: NORDLYNX\n\
                   Uptime: 5 minutes 2 seconds\n";
        let status = parse_status(raw, "Connected");
        assert!(status.connected);
        assert_eq!(status.summary, "Hostname: de1042.nordvpn.com");
        assert_eq!(status.field("city"), Some("Frankfurt"));
        assert_eq!(status.fields.len(), 7);
    }

    #[test]
    fn test_status_custom_marker() {
        let status = parse_status("Statut : Connecté\nServeur: fr1", "Connecté");
        assert!(status.connected);
        assert_eq!(status.summary, "Serveur: fr1");
    }

    #[test]
    fn test_status_empty_marker_never_connects() {
        assert!(!parse_status("Status: Connected", "").connected);
    }

    // ---- parse_account ----

    #[test]
    fn test_account_second_line() {
        let raw = "Account Information:\nEmail Address: user@example.com\nVPN Service: Active\n";
        assert_eq!(
            parse_account(raw),
            AccountInfo::Known("Email Address: user@example.com".to_string())
        );
    }

    #[test]
    fn test_account_empty_is_unavailable() {
        assert_eq!(parse_account(""), AccountInfo::Unavailable);
        assert_eq!(parse_account("\n\n"), AccountInfo::Unavailable);
    }

    #[test]
    fn test_account_single_line() {
        assert_eq!(
            parse_account("You are not logged in."),
            AccountInfo::Known("You are not logged in.".to_string())
        );
    }

    // ---- parse_settings ----

    #[test]
    fn test_settings_scenario() {
        let snapshot = parse_settings("Kill Switch: enabled\nFirewall: disabled");
        assert_eq!(snapshot.get(Setting::KillSwitch), Some(true));
        assert_eq!(snapshot.get(Setting::Firewall), Some(false));
        assert_eq!(snapshot.get(Setting::Meshnet), None);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_settings_ignores_unknown_and_non_boolean() {
        let raw = "Technology: NORDLYNX\nFirewall: enabled\nFirewall Mark: 0xe1f1\n\
                   Routing: enabled\nTray: ENABLED\nMeshnet: maybe\n";
        let snapshot = parse_settings(raw);
        assert_eq!(snapshot.get(Setting::Firewall), Some(true));
        assert_eq!(snapshot.get(Setting::TrayIcon), Some(true));
        assert_eq!(snapshot.get(Setting::Meshnet), None);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_settings_full_tool_output() {
        let raw = "Technology: NORDLYNX\nFirewall: enabled\nFirewall Mark: 0xe1f1\n\
                   Routing: enabled\nAnalytics: disabled\nKill Switch: disabled\n\
                   Threat Protection Lite: disabled\nNotify: disabled\nTray: enabled\n\
                   Auto-connect: enabled\nIPv6: disabled\nMeshnet: disabled\nDNS: disabled\n\
                   LAN Discovery: disabled\nVirtual Location: enabled\nPost-quantum VPN: disabled\n";
        let snapshot = parse_settings(raw);
        assert_eq!(snapshot.len(), 8);
        assert_eq!(snapshot.get(Setting::AutoConnect), Some(true));
        assert_eq!(snapshot.get(Setting::Notifications), Some(false));
        assert_eq!(snapshot.get(Setting::VirtualLocation), Some(true));
        assert_eq!(snapshot.get(Setting::PostQuantum), Some(false));
    }

    #[test]
    fn test_settings_round_trip() {
        let raw = "Kill Switch: enabled\nAuto-connect: disabled\nFirewall: enabled\n\
                   Notify: disabled\nTray: enabled\nMeshnet: disabled\n\
                   Virtual Location: enabled\nPost-quantum VPN: disabled\nTechnology: OPENVPN\n";
        let first = parse_settings(raw);
        let second = parse_settings(&first.to_text());
        assert_eq!(first, second);
        assert_eq!(second.len(), 8);
    }

    #[test]
    fn test_key_values_split_on_first_colon() {
        let pairs = parse_key_values("Uptime: 1:02:03\nno colon here\n: empty key\n");
        assert_eq!(pairs, vec![("Uptime".to_string(), "1:02:03".to_string())]);
    }
}
