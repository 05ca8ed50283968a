//! Boolean tool settings.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants;

/// The named on/off features the dashboard manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Setting {
    KillSwitch,
    AutoConnect,
    Firewall,
    Notifications,
    TrayIcon,
    Meshnet,
    VirtualLocation,
    PostQuantum,
}

impl Setting {
    /// Every setting, in display order.
    pub const ALL: [Self; 8] = [
        Self::KillSwitch,
        Self::AutoConnect,
        Self::Firewall,
        Self::Notifications,
        Self::TrayIcon,
        Self::Meshnet,
        Self::VirtualLocation,
        Self::PostQuantum,
    ];

    /// Label as printed by the tool's `settings` command.
    pub const fn label(self) -> &'static str {
        match self {
            Self::KillSwitch => "Kill Switch",
            Self::AutoConnect => "Auto-connect",
            Self::Firewall => "Firewall",
            Self::Notifications => "Notify",
            Self::TrayIcon => "Tray",
            Self::Meshnet => "Meshnet",
            Self::VirtualLocation => "Virtual Location",
            Self::PostQuantum => "Post-quantum VPN",
        }
    }

    /// Key passed to `set <key> <on|off>`.
    pub const fn set_key(self) -> &'static str {
        match self {
            Self::KillSwitch => "killswitch",
            Self::AutoConnect => "autoconnect",
            Self::Firewall => "firewall",
            Self::Notifications => "notify",
            Self::TrayIcon => "tray",
            Self::Meshnet => "meshnet",
            Self::VirtualLocation => "virtual-location",
            Self::PostQuantum => "post-quantum",
        }
    }

    /// Normalized spellings this setting is recognized by.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::KillSwitch => &["killswitch"],
            Self::AutoConnect => &["autoconnect"],
            Self::Firewall => &["firewall"],
            Self::Notifications => &["notify", "notifications"],
            Self::TrayIcon => &["tray", "trayicon"],
            Self::Meshnet => &["meshnet"],
            Self::VirtualLocation => &["virtuallocation"],
            Self::PostQuantum => &["postquantum", "postquantumvpn"],
        }
    }

    /// Matches a settings-line key against the recognized set.
    ///
    /// Case, spaces, hyphens and underscores are ignored, so `Kill Switch`,
    /// `kill-switch` and `KILL_SWITCH` all resolve to [`Setting::KillSwitch`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = normalize(label);
        Self::ALL
            .into_iter()
            .find(|s| s.aliases().contains(&normalized.as_str()))
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|s| s.set_key()).collect();
            format!("unknown setting '{s}' (expected one of: {})", known.join(", "))
        })
    }
}

fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Parses `enabled` / `disabled` (case-insensitive).
#[must_use]
pub fn parse_enabled(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(constants::VALUE_ENABLED) {
        Some(true)
    } else if value.eq_ignore_ascii_case(constants::VALUE_DISABLED) {
        Some(false)
    } else {
        None
    }
}

/// Current on/off state of the recognized settings.
///
/// Settings the tool did not report are absent rather than defaulted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SettingsSnapshot {
    values: BTreeMap<Setting, bool>,
}

impl SettingsSnapshot {
    pub fn get(&self, setting: Setting) -> Option<bool> {
        self.values.get(&setting).copied()
    }

    pub fn set(&mut self, setting: Setting, enabled: bool) {
        self.values.insert(setting, enabled);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Setting, bool)> + '_ {
        self.values.iter().map(|(s, v)| (*s, *v))
    }

    /// Serializes back to the tool's `Label: enabled|disabled` line format.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.iter()
            .map(|(setting, enabled)| {
                let value = if enabled {
                    constants::VALUE_ENABLED
                } else {
                    constants::VALUE_DISABLED
                };
                format!("{}: {value}", setting.label())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
