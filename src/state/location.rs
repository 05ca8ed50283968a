//! Location and server group tokens.
//!
//! Both are opaque strings reported by the external tool. The only rule is
//! that a token is non-empty after trimming.

use serde::Serialize;
use std::fmt;

/// A country or city name as reported by the external tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Wraps a token, returning `None` if it is blank.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named collection of servers (e.g. `P2P`, `Double_VPN`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServerGroup(String);

impl ServerGroup {
    /// Wraps a token, returning `None` if it is blank.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a `connect` call should aim at.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ConnectTarget {
    /// Let the tool pick the recommended server.
    #[default]
    Quick,
    /// A country or city.
    Location(Location),
    /// A server group.
    Group(ServerGroup),
}

impl ConnectTarget {
    /// Picks the target the way the dashboard's Connect button does:
    /// the group when `use_group` is set, otherwise the city, otherwise the country.
    ///
    /// Returns `None` when the chosen source has nothing selected.
    #[must_use]
    pub fn choose(
        use_group: bool,
        group: Option<&ServerGroup>,
        city: Option<&Location>,
        country: Option<&Location>,
    ) -> Option<Self> {
        if use_group {
            return group.cloned().map(Self::Group);
        }
        city.or(country).cloned().map(Self::Location)
    }

    /// The argument passed after `connect`, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Quick => None,
            Self::Location(loc) => Some(loc.as_str()),
            Self::Group(group) => Some(group.as_str()),
        }
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token() {
            Some(token) => f.write_str(token),
            None => f.write_str("quick connect"),
        }
    }
}
