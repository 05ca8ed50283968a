//! CLI command handlers.
//!
//! Each command makes one or two adapter calls and renders the result as
//! plain text or, with `--json`, as pretty-printed JSON. Errors go to stderr
//! and turn into a non-zero exit status.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::Commands;
use crate::constants;
use crate::state::{ConnectTarget, ConnectionStatus, Location};
use crate::vpn::{AdapterError, CommandAdapter, Result};

/// Where the config came from, for `info`.
#[derive(Debug, Clone, Copy)]
pub struct CliContext<'a> {
    pub config_dir: &'a Path,
    /// `"default"`, `"from --config-dir"`, ...
    pub config_dir_source: &'a str,
    pub json: bool,
}

/// Runs one command and prints its result.
///
/// Returns the process exit code; errors have already been printed.
pub fn handle_command(command: &Commands, adapter: &CommandAdapter, ctx: &CliContext) -> i32 {
    match render(command, adapter, ctx) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            0
        }
        Err(e) => {
            eprintln!("{}{e}", constants::CLI_MSG_ERROR);
            if e.is_not_found() {
                eprintln!("{}", constants::CLI_MSG_FALLBACK_HINT);
            }
            exit_code(&e)
        }
    }
}

/// Runs a command and returns what should be printed.
fn render(command: &Commands, adapter: &CommandAdapter, ctx: &CliContext) -> Result<String> {
    let json = ctx.json;
    let output = match command {
        Commands::Countries => list(&adapter.list_countries()?, json),
        Commands::Cities { country } => list(&adapter.list_cities(country)?, json),
        Commands::Groups => list(&adapter.list_groups()?, json),
        Commands::Status => status_text(&adapter.status()?, json),
        Commands::Account => {
            let account = adapter.account()?;
            if json {
                to_json(&serde_json::json!({ "account": account }))
            } else {
                account.to_string()
            }
        }
        Commands::Connect { target } => {
            let target = target
                .as_deref()
                .and_then(Location::new)
                .map_or(ConnectTarget::Quick, ConnectTarget::Location);
            adapter.connect(&target)?;
            after_action(adapter, constants::CLI_MSG_CONNECTED, json)
        }
        Commands::Disconnect => {
            adapter.disconnect()?;
            after_action(adapter, constants::CLI_MSG_DISCONNECTED, json)
        }
        Commands::Settings => {
            let settings = adapter.settings()?;
            if json {
                to_json(&settings)
            } else {
                settings.to_text()
            }
        }
        Commands::Set { setting, state } => {
            adapter.apply_setting(*setting, state.enabled())?;
            if json {
                to_json(&serde_json::json!({ "setting": setting, "enabled": state.enabled() }))
            } else {
                format!(
                    "{}{setting} {}",
                    constants::CLI_MSG_SETTING_APPLIED,
                    if state.enabled() { "on" } else { "off" }
                )
            }
        }
        Commands::Dns { address } => {
            let address = address.join(" ");
            adapter.set_dns(&address)?;
            if json {
                to_json(&serde_json::json!({ "dns": address.split_whitespace().collect::<Vec<_>>() }))
            } else {
                format!("{}{address}", constants::CLI_MSG_DNS_APPLIED)
            }
        }
        Commands::Info => info(adapter, ctx),
    };
    Ok(output)
}

/// Connect and disconnect only report that the tool accepted the command,
/// so follow up with a status query.
///
/// The action already succeeded, so a failed status query is reported but
/// does not fail the command.
fn after_action(adapter: &CommandAdapter, headline: &str, json: bool) -> String {
    match adapter.status() {
        Ok(status) if json => to_json(&status),
        Ok(status) => format!("{headline}{}", status.summary),
        Err(e) => {
            crate::log_warning!("APP", "Status after action unavailable: {e}");
            eprintln!("Warning: status query failed: {e}");
            if json {
                "null".to_string()
            } else {
                format!("{headline}{}", constants::CLI_MSG_STATUS_UNAVAILABLE)
            }
        }
    }
}

fn list<T: Serialize + std::fmt::Display>(items: &[T], json: bool) -> String {
    if json {
        to_json(&items)
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn status_text(status: &ConnectionStatus, json: bool) -> String {
    if json {
        return to_json(status);
    }
    let headline = if status.connected {
        format!("Connected ({})", status.summary)
    } else {
        status.summary.clone()
    };
    if status.raw.is_empty() {
        headline
    } else {
        format!("{headline}\n\n{}", status.raw)
    }
}

fn info(adapter: &CommandAdapter, ctx: &CliContext) -> String {
    let config = adapter.config();
    let config_file = ctx.config_dir.join(constants::CONFIG_FILE_NAME);
    let file_state = if config_file.exists() {
        "found"
    } else {
        "not found, using defaults"
    };

    if ctx.json {
        return to_json(&serde_json::json!({
            "version": constants::APP_VERSION,
            "config_dir": ctx.config_dir,
            "config_dir_source": ctx.config_dir_source,
            "config_file": config_file,
            "config_file_found": config_file.exists(),
            "tool": config.program,
            "command_timeout_secs": config.command_timeout.as_secs(),
            "connect_timeout_secs": config.connect_timeout.as_secs(),
            "connected_marker": config.connected_marker,
        }));
    }

    [
        format!("{} v{}", constants::APP_NAME, constants::APP_VERSION),
        format!(
            "Config dir:  {} ({})",
            ctx.config_dir.display(),
            ctx.config_dir_source
        ),
        format!("Config file: {} ({file_state})", config_file.display()),
        format!("Tool:        {}", config.program),
        format!(
            "Timeouts:    {}s queries, {}s connect/disconnect",
            config.command_timeout.as_secs(),
            config.connect_timeout.as_secs()
        ),
        format!("Marker:      {:?}", config.connected_marker),
    ]
    .join("\n")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        crate::log_error!("APP", "JSON encoding failed: {e}");
        "null".to_string()
    })
}

/// Rejected input exits with 2, like a usage error; tool failures with 1.
fn exit_code(error: &AdapterError) -> i32 {
    match error {
        AdapterError::InvalidInput(_) => 2,
        _ => 1,
    }
}
