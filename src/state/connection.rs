//! Connection status and account types.

use serde::Serialize;
use std::fmt;

use crate::constants;

/// Snapshot of the tool's `status` output.
///
/// Derived fresh on every status query. `connected` is decided by the
/// configured marker; `fields` keeps every `Key: Value` pair the tool printed
/// (server, country, city, IP, technology, uptime, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    /// Whether the output contained the connected marker.
    pub connected: bool,
    /// One-line human-readable summary.
    pub summary: String,
    /// Parsed `Key: Value` lines, in output order.
    pub fields: Vec<(String, String)>,
    /// Cleaned full output, shown verbatim by the dashboard.
    #[serde(skip)]
    pub raw: String,
}

impl ConnectionStatus {
    /// Status used before the first query completes or when it fails.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            summary: constants::STATUS_DISCONNECTED.to_string(),
            fields: Vec::new(),
            raw: String::new(),
        }
    }

    /// Looks up a parsed field by key (case-insensitive).
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Account line reported by the tool.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AccountInfo {
    /// The identifying line of `account` output.
    Known(String),
    /// Nothing usable came back.
    #[default]
    Unavailable,
}

impl AccountInfo {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(line) => f.write_str(line),
            Self::Unavailable => f.write_str(constants::ACCOUNT_UNAVAILABLE),
        }
    }
}

impl Serialize for AccountInfo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(line) => serializer.serialize_some(line),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}
