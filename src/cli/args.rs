//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::state::Setting;

/// Terminal dashboard and scriptable CLI for the `NordVPN` command-line tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Override config directory (default: platform config dir, honors `XDG_CONFIG_HOME`)
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        env = "NORDPILOT_CONFIG_DIR",
        global = true
    )]
    pub config_dir: Option<PathBuf>,

    /// VPN tool to run instead of the configured `tool_path`
    #[arg(long, value_name = "PATH", global = true)]
    pub tool: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Print the debug log to stderr when the command finishes
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (none opens the dashboard)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List available countries
    Countries,
    /// List cities in a country
    Cities {
        /// Country as printed by `countries` (e.g. `United_States`)
        country: String,
    },
    /// List server groups
    Groups,
    /// Show connection status
    Status,
    /// Show account information
    Account,
    /// Connect to a country, city or group (the tool picks a server if omitted)
    Connect {
        /// Country, city or server group
        target: Option<String>,
    },
    /// Disconnect the tunnel
    Disconnect,
    /// Show on/off settings
    Settings,
    /// Turn a setting on or off
    Set {
        /// killswitch, autoconnect, firewall, notify, tray, meshnet, virtual-location, post-quantum
        setting: Setting,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Set custom DNS server(s)
    Dns {
        /// One or more addresses
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },
    /// Show config directory, tool path and timeouts
    Info,
}

/// `on` / `off` for `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("nordpilot").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_command_opens_dashboard() {
        let args = parse(&[]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_set_parses_setting_and_switch() {
        let args = parse(&["set", "kill-switch", "on"]).unwrap();
        assert_eq!(
            args.command,
            Some(Commands::Set {
                setting: Setting::KillSwitch,
                state: Switch::On,
            })
        );
    }

    #[test]
    fn test_set_rejects_unknown_setting() {
        assert!(parse(&["set", "turbo", "on"]).is_err());
        assert!(parse(&["set", "firewall", "maybe"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["status", "--json", "--tool", "/opt/nordvpn"]).unwrap();
        assert!(args.json);
        assert_eq!(args.tool.as_deref(), Some("/opt/nordvpn"));
        assert_eq!(args.command, Some(Commands::Status));
    }

    #[test]
    fn test_dns_requires_address() {
        assert!(parse(&["dns"]).is_err());
        let args = parse(&["dns", "1.1.1.1", "1.0.0.1"]).unwrap();
        assert_eq!(
            args.command,
            Some(Commands::Dns {
                address: vec!["1.1.1.1".to_string(), "1.0.0.1".to_string()]
            })
        );
    }

    #[test]
    fn test_connect_target_optional() {
        let args = parse(&["connect"]).unwrap();
        assert_eq!(args.command, Some(Commands::Connect { target: None }));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
