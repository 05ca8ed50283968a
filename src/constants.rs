//! Application-wide constants and configuration values.
//!
//! This module defines the static values used throughout nordpilot,
//! including timing defaults, tool arguments, and UI messages.

// === Application Metadata ===

/// Application name and title (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// === Defaults ===
// These are the compiled-in defaults. Users can override them via config.toml.
// AppConfig::default() references these so there is exactly one source of truth.

/// Default external VPN tool, resolved through `PATH`.
pub const DEFAULT_TOOL_PATH: &str = "nordvpn";
/// Default timeout for query and settings commands (seconds).
pub const DEFAULT_COMMAND_TIMEOUT: u64 = 10;
/// Default timeout for connect/disconnect (seconds).
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 60;
/// Upper bound accepted for either timeout in `config.toml` (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;
/// Default substring of `status` output that means the tunnel is up.
///
/// Case-sensitive, so `Disconnected` does not match.
pub const DEFAULT_CONNECTED_MARKER: &str = "Connected";
/// Default UI tick rate in milliseconds.
pub const DEFAULT_TICK_RATE: u64 = 250;
/// Default interval between background status refreshes (seconds).
pub const DEFAULT_STATUS_POLL_RATE: u64 = 10;
/// Default maximum number of log entries to keep in memory.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;
/// Default minimum log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "NORDPILOT_CONFIG_DIR";

/// Poll interval while waiting for a child process (milliseconds).
pub const CHILD_POLL_MS: u64 = 20;
/// Pause after moving through the country list before its cities load (milliseconds).
pub const CITY_DEBOUNCE_MS: u64 = 300;

// === Tool Arguments ===

pub const ARG_COUNTRIES: &str = "countries";
pub const ARG_CITIES: &str = "cities";
pub const ARG_GROUPS: &str = "groups";
pub const ARG_STATUS: &str = "status";
pub const ARG_ACCOUNT: &str = "account";
pub const ARG_CONNECT: &str = "connect";
pub const ARG_DISCONNECT: &str = "disconnect";
pub const ARG_SETTINGS: &str = "settings";
pub const ARG_SET: &str = "set";
pub const ARG_DNS: &str = "dns";
pub const ARG_ON: &str = "on";
pub const ARG_OFF: &str = "off";

// === Parsed Values ===

/// Status summary used whenever the connected marker is absent.
pub const STATUS_DISCONNECTED: &str = "Disconnected";
/// Sentinel shown when the account query produced nothing usable.
pub const ACCOUNT_UNAVAILABLE: &str = "unavailable";
/// Settings value meaning "on".
pub const VALUE_ENABLED: &str = "enabled";
/// Settings value meaning "off".
pub const VALUE_DISABLED: &str = "disabled";

// === UI Messages ===

pub const MSG_LOADING: &str = "Loading...";
pub const MSG_CHECKING: &str = "Checking...";
pub const MSG_NO_ITEMS: &str = "(none)";
pub const MSG_SELECT_COUNTRY: &str = "Select a country first";
pub const MSG_NOTHING_TO_CONNECT: &str = "Nothing selected to connect to";
pub const MSG_ACTION_IN_PROGRESS: &str = "A connect or disconnect is already running";
pub const MSG_WORKING: &str = "working";

pub const TITLE_COUNTRIES: &str = " Countries ";
pub const TITLE_CITIES: &str = " Cities ";
pub const TITLE_GROUPS: &str = " Server Groups ";
pub const TITLE_SETTINGS: &str = " Settings ";
pub const TITLE_STATUS: &str = " Status ";
pub const TITLE_LOGS: &str = " Event Log ";
pub const TITLE_DNS: &str = " Set DNS ";
pub const TITLE_DNS_FOOTER: &str = " [Enter] Apply  [Esc] Cancel ";
/// Event log category column width.
pub const LOG_CATEGORY_WIDTH: usize = 6;
/// `[HH:MM:SS] LEVEL CATEGORY  ` before each event log message.
pub const LOG_PREFIX_WIDTH: usize = 11 + 6 + LOG_CATEGORY_WIDTH + 2;
pub const PROMPT_DNS: &str = "DNS server address(es), space separated:";

// === CLI Output ===

pub const CLI_MSG_ERROR: &str = "Error: ";
pub const CLI_MSG_CONNECTED: &str = "Connect command accepted. Current status: ";
pub const CLI_MSG_DISCONNECTED: &str = "Disconnect command accepted. Current status: ";
pub const CLI_MSG_SETTING_APPLIED: &str = "Applied: ";
pub const CLI_MSG_DNS_APPLIED: &str = "DNS set to ";
pub const CLI_MSG_STATUS_UNAVAILABLE: &str = "unavailable";
pub const CLI_MSG_FALLBACK_HINT: &str = "   Is the tool installed and on your PATH? Override with --tool.";
