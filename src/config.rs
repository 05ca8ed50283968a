//! Application configuration management.
//!
//! Handles config directory resolution (CLI flag / env > XDG > default) and
//! loading `config.toml`. Every field is optional in the file; missing fields
//! take the compiled-in defaults from [`crate::constants`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;

/// User-configurable application settings.
///
/// All fields have sensible defaults. Users can override any subset via
/// `config.toml` in the config directory -- missing fields use defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// External VPN tool to run (name on `PATH` or absolute path).
    pub tool_path: String,
    /// Timeout for queries and settings changes, in seconds.
    pub command_timeout: u64,
    /// Timeout for connect / disconnect, in seconds.
    pub connect_timeout: u64,
    /// Substring of `status` output that means "connected" (case-sensitive).
    ///
    /// This is a compatibility contract with the installed tool version and
    /// locale; change it if the tool prints something else.
    pub connected_marker: String,
    /// UI refresh rate in milliseconds.
    pub tick_rate: u64,
    /// Interval between background status refreshes in the dashboard, in seconds.
    pub status_poll_rate: u64,
    /// Maximum number of log entries kept in memory.
    pub max_log_entries: usize,
    /// Minimum log level (`"debug"`, `"info"`, `"warning"`, `"error"`).
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool_path: constants::DEFAULT_TOOL_PATH.to_string(),
            command_timeout: constants::DEFAULT_COMMAND_TIMEOUT,
            connect_timeout: constants::DEFAULT_CONNECT_TIMEOUT,
            connected_marker: constants::DEFAULT_CONNECTED_MARKER.to_string(),
            tick_rate: constants::DEFAULT_TICK_RATE,
            status_poll_rate: constants::DEFAULT_STATUS_POLL_RATE,
            max_log_entries: constants::DEFAULT_MAX_LOG_ENTRIES,
            log_level: constants::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Resolves the config directory path.
///
/// Precedence: CLI flag / `NORDPILOT_CONFIG_DIR` > `XDG_CONFIG_HOME` > `~/.config/nordpilot`.
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined or created.
pub fn resolve_config_dir(cli_override: Option<&PathBuf>) -> std::io::Result<PathBuf> {
    let path = if let Some(dir) = cli_override {
        // Resolve relative paths to absolute so the config dir is stable
        // regardless of the working directory.
        if dir.is_relative() {
            std::env::current_dir()?.join(dir)
        } else {
            dir.clone()
        }
    } else {
        default_config_dir()?
    };

    if !path.exists() {
        std::fs::create_dir_all(&path)?;
    }

    // Canonicalize to resolve symlinks and ".." components
    std::fs::canonicalize(&path)
}

/// Computes the default config directory (no CLI override).
fn default_config_dir() -> std::io::Result<PathBuf> {
    // Respect XDG_CONFIG_HOME on Linux
    #[cfg(target_os = "linux")]
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let xdg_path = PathBuf::from(xdg);
        if xdg_path.is_absolute() {
            return Ok(xdg_path.join(constants::APP_NAME));
        }
    }

    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Home directory not found")
    })?;
    Ok(home.join(".config").join(constants::APP_NAME))
}

/// Loads `AppConfig` from `config.toml` in the given directory.
///
/// Returns defaults if the file doesn't exist. Returns an error if the file
/// exists but is malformed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(config_dir: &Path) -> Result<AppConfig, String> {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| format!("Failed to read {}: {e}", config_path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| format!("Invalid config at {}: {e}", config_path.display()))?;

    validate(&config).map_err(|e| format!("Invalid config at {}: {e}", config_path.display()))?;
    Ok(config)
}

/// Rejects values that would make every command fail.
fn validate(config: &AppConfig) -> Result<(), String> {
    if config.tool_path.trim().is_empty() {
        return Err("tool_path must not be empty".to_string());
    }
    if config.command_timeout == 0 || config.connect_timeout == 0 {
        return Err("timeouts must be at least 1 second".to_string());
    }
    if config.command_timeout > constants::MAX_TIMEOUT_SECS
        || config.connect_timeout > constants::MAX_TIMEOUT_SECS
    {
        return Err(format!(
            "timeouts must not exceed {} seconds",
            constants::MAX_TIMEOUT_SECS
        ));
    }
    if config.tick_rate == 0 {
        return Err("tick_rate must be at least 1 millisecond".to_string());
    }
    Ok(())
}
