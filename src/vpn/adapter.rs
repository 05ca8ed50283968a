//! Typed front door to the external VPN tool.
//!
//! [`CommandAdapter`] turns an [`Intent`] into one process invocation and
//! parses the captured output. It keeps no state between calls; connection
//! state is re-derived from the tool's live output on every status query.

use std::time::Duration;

use super::error::{AdapterError, Result};
use super::parser;
use super::runner::{describe, CommandRunner, RawOutput, SystemRunner};
use crate::config::AppConfig;
use crate::constants;
use crate::state::{
    AccountInfo, ConnectTarget, ConnectionStatus, Location, ServerGroup, Setting,
    SettingsSnapshot,
};

/// One thing the tool can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Countries,
    Cities(Location),
    Groups,
    Status,
    Account,
    Connect(ConnectTarget),
    Disconnect,
    Settings,
    Set(Setting, bool),
    SetDns(Vec<String>),
}

impl Intent {
    /// Arguments passed to the tool for this intent.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            Self::Countries => args.push(constants::ARG_COUNTRIES.to_string()),
            Self::Cities(country) => {
                args.push(constants::ARG_CITIES.to_string());
                args.push(country.to_string());
            }
            Self::Groups => args.push(constants::ARG_GROUPS.to_string()),
            Self::Status => args.push(constants::ARG_STATUS.to_string()),
            Self::Account => args.push(constants::ARG_ACCOUNT.to_string()),
            Self::Connect(target) => {
                args.push(constants::ARG_CONNECT.to_string());
                if let Some(token) = target.token() {
                    args.push(token.to_string());
                }
            }
            Self::Disconnect => args.push(constants::ARG_DISCONNECT.to_string()),
            Self::Settings => args.push(constants::ARG_SETTINGS.to_string()),
            Self::Set(setting, enabled) => {
                args.push(constants::ARG_SET.to_string());
                args.push(setting.set_key().to_string());
                args.push(on_off(*enabled).to_string());
            }
            Self::SetDns(addresses) => {
                args.push(constants::ARG_SET.to_string());
                args.push(constants::ARG_DNS.to_string());
                args.extend(addresses.iter().cloned());
            }
        }
        args
    }

    /// Connect and disconnect negotiate a tunnel and get the longer timeout.
    pub const fn is_long_running(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Disconnect)
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled {
        constants::ARG_ON
    } else {
        constants::ARG_OFF
    }
}

/// Adapter settings, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Tool executable.
    pub program: String,
    /// Bound for queries and settings changes.
    pub command_timeout: Duration,
    /// Bound for connect / disconnect.
    pub connect_timeout: Duration,
    /// Substring of `status` output meaning "connected".
    pub connected_marker: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AdapterConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            program: config.tool_path.clone(),
            command_timeout: Duration::from_secs(config.command_timeout),
            connect_timeout: Duration::from_secs(config.connect_timeout),
            connected_marker: config.connected_marker.clone(),
        }
    }
}

/// Executes intents against the external tool and parses the results.
pub struct CommandAdapter {
    runner: Box<dyn CommandRunner>,
    config: AdapterConfig,
}

impl std::fmt::Debug for CommandAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CommandAdapter {
    /// Adapter that runs real processes.
    pub fn new(config: AdapterConfig) -> Self {
        Self::with_runner(SystemRunner, config)
    }

    /// Adapter over a custom runner (tests, dry runs).
    pub fn with_runner(runner: impl CommandRunner + 'static, config: AdapterConfig) -> Self {
        Self {
            runner: Box::new(runner),
            config,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Lists every country the tool offers.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] from running the tool. Empty output is `Ok(vec![])`.
    pub fn list_countries(&self) -> Result<Vec<Location>> {
        let stdout = self.execute(&Intent::Countries)?;
        Ok(parser::parse_tokens(&stdout)
            .into_iter()
            .filter_map(Location::new)
            .collect())
    }

    /// Lists the cities of `country`. A blank country yields an empty list
    /// without spawning anything.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] from running the tool.
    pub fn list_cities(&self, country: &str) -> Result<Vec<Location>> {
        let Some(country) = Location::new(country) else {
            return Ok(Vec::new());
        };
        let stdout = self.execute(&Intent::Cities(country))?;
        Ok(parser::parse_tokens(&stdout)
            .into_iter()
            .filter_map(Location::new)
            .collect())
    }

    /// Lists the server groups.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] from running the tool.
    pub fn list_groups(&self) -> Result<Vec<ServerGroup>> {
        let stdout = self.execute(&Intent::Groups)?;
        Ok(parser::parse_tokens(&stdout)
            .into_iter()
            .filter_map(ServerGroup::new)
            .collect())
    }

    /// Queries the live connection status.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] from running the tool.
    pub fn status(&self) -> Result<ConnectionStatus> {
        let stdout = self.execute(&Intent::Status)?;
        Ok(parser::parse_status(&stdout, &self.config.connected_marker))
    }

    /// Queries the logged-in account.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] from running the tool. Empty output is
    /// `Ok(AccountInfo::Unavailable)`.
    pub fn account(&self) -> Result<AccountInfo> {
        let stdout = self.execute(&Intent::Account)?;
        Ok(parser::parse_account(&stdout))
    }

    /// Asks the tool to connect. Does not verify the tunnel came up; query
    /// [`Self::status`] afterwards.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`]; a non-zero exit is reported as `Exit`.
    pub fn connect(&self, target: &ConnectTarget) -> Result<()> {
        self.execute(&Intent::Connect(target.clone())).map(drop)
    }

    /// Asks the tool to disconnect.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`]; a non-zero exit is reported as `Exit`.
    pub fn disconnect(&self) -> Result<()> {
        self.execute(&Intent::Disconnect).map(drop)
    }

    /// Reads the current settings.
    ///
    /// # Errors
    ///
    /// [`AdapterError::UnexpectedOutput`] if the tool printed text without a
    /// single `Key: Value` line, plus any error from running the tool.
    pub fn settings(&self) -> Result<SettingsSnapshot> {
        let stdout = self.execute(&Intent::Settings)?;
        if !stdout.trim().is_empty() && parser::parse_key_values(&stdout).is_empty() {
            return Err(AdapterError::UnexpectedOutput {
                command: self.describe(&Intent::Settings),
                detail: "no `Key: Value` lines".to_string(),
            });
        }
        Ok(parser::parse_settings(&stdout))
    }

    /// Turns one setting on or off.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`]; a non-zero exit is reported as `Exit`.
    pub fn apply_setting(&self, setting: Setting, enabled: bool) -> Result<()> {
        self.execute(&Intent::Set(setting, enabled)).map(drop)
    }

    /// Sets custom DNS. `address` is passed through unvalidated; several
    /// whitespace-separated addresses become separate arguments.
    ///
    /// # Errors
    ///
    /// [`AdapterError::InvalidInput`] for a blank address, otherwise any error
    /// from running the tool.
    pub fn set_dns(&self, address: &str) -> Result<()> {
        let addresses: Vec<String> = address.split_whitespace().map(String::from).collect();
        if addresses.is_empty() {
            return Err(AdapterError::InvalidInput(
                "DNS address must not be empty".to_string(),
            ));
        }
        self.execute(&Intent::SetDns(addresses)).map(drop)
    }

    fn describe(&self, intent: &Intent) -> String {
        describe(&self.config.program, &intent.args())
    }

    /// Runs one intent and returns its stdout, mapping a failed exit to
    /// [`AdapterError::Exit`].
    fn execute(&self, intent: &Intent) -> Result<String> {
        let args = intent.args();
        let timeout = if intent.is_long_running() {
            self.config.connect_timeout
        } else {
            self.config.command_timeout
        };

        let output = self
            .runner
            .run(&self.config.program, &args, timeout)
            .inspect_err(|e| {
                crate::log_warning!("CMD", "[{}] {e}", e.kind());
            })?;

        if output.success() {
            return Ok(output.stdout);
        }

        let err = AdapterError::Exit {
            command: describe(&self.config.program, &args),
            code: output.code,
            message: failure_message(&output),
        };
        crate::log_warning!("CMD", "[{}] {err}", err.kind());
        Err(err)
    }
}

/// First meaningful line of stderr, else of stdout.
fn failure_message(output: &RawOutput) -> String {
    [&output.stderr, &output.stdout]
        .into_iter()
        .find_map(|text| parser::clean_lines(text).first().map(ToString::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Runner that replays canned output keyed by the joined argument list.
    #[derive(Clone, Default)]
    pub(crate) struct FakeRunner {
        responses: Arc<Mutex<HashMap<String, Result<RawOutput>>>>,
        pub(crate) calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl FakeRunner {
        pub(crate) fn respond(&self, args: &str, stdout: &str) -> &Self {
            self.respond_with(
                args,
                Ok(RawOutput {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    code: Some(0),
                }),
            )
        }

        pub(crate) fn fail(&self, args: &str, code: i32, stdout: &str) -> &Self {
            self.respond_with(
                args,
                Ok(RawOutput {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    code: Some(code),
                }),
            )
        }

        pub(crate) fn respond_with(&self, args: &str, result: Result<RawOutput>) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .insert(args.to_string(), result);
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<RawOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            let key = args.join(" ");
            match self.responses.lock().unwrap().remove(&key) {
                Some(result) => result,
                None => Err(AdapterError::Launch {
                    command: describe(program, args),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no canned response (timeout {timeout:?})"),
                    ),
                }),
            }
        }
    }

    pub(crate) fn adapter(runner: &FakeRunner) -> CommandAdapter {
        CommandAdapter::with_runner(runner.clone(), AdapterConfig::default())
    }

    // ---- Intent::args ----

    #[test]
    fn test_intent_args() {
        let de = Location::new("Germany").unwrap();
        assert_eq!(Intent::Cities(de.clone()).args(), vec!["cities", "Germany"]);
        assert_eq!(
            Intent::Connect(ConnectTarget::Location(de)).args(),
            vec!["connect", "Germany"]
        );
        assert_eq!(Intent::Connect(ConnectTarget::Quick).args(), vec!["connect"]);
        assert_eq!(
            Intent::Set(Setting::KillSwitch, true).args(),
            vec!["set", "killswitch", "on"]
        );
        assert_eq!(
            Intent::Set(Setting::PostQuantum, false).args(),
            vec!["set", "post-quantum", "off"]
        );
        assert_eq!(
            Intent::SetDns(vec!["1.1.1.1".to_string(), "1.0.0.1".to_string()]).args(),
            vec!["set", "dns", "1.1.1.1", "1.0.0.1"]
        );
    }

    #[test]
    fn test_long_running_intents() {
        assert!(Intent::Disconnect.is_long_running());
        assert!(Intent::Connect(ConnectTarget::Quick).is_long_running());
        assert!(!Intent::Status.is_long_running());
    }

    // ---- queries ----

    #[test]
    fn test_list_countries() {
        let runner = FakeRunner::default();
        runner.respond("countries", "Germany\nFrance\nJapan");
        let countries = adapter(&runner).list_countries().unwrap();
        let names: Vec<&str> = countries.iter().map(Location::as_str).collect();
        assert_eq!(names, vec!["Germany", "France", "Japan"]);
    }

    #[test]
    fn test_list_countries_empty_output() {
        let runner = FakeRunner::default();
        runner.respond("countries", "");
        assert!(adapter(&runner).list_countries().unwrap().is_empty());
    }

    #[test]
    fn test_list_cities_blank_country_does_not_spawn() {
        let runner = FakeRunner::default();
        assert!(adapter(&runner).list_cities("  ").unwrap().is_empty());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_list_cities_tool_error() {
        let runner = FakeRunner::default();
        runner.fail("cities Atlantis", 1, "Country not found");
        let err = adapter(&runner).list_cities("Atlantis").unwrap_err();
        match err {
            AdapterError::Exit { code, message, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(message, "Country not found");
            }
            other => panic!("expected Exit, got {other:?}"),
        }
    }

    #[test]
    fn test_list_groups() {
        let runner = FakeRunner::default();
        runner.respond("groups", "Africa_The_Middle_East_And_India\nP2P\nDouble_VPN\n");
        let groups = adapter(&runner).list_groups().unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].as_str(), "P2P");
    }

    #[test]
    fn test_status_connected() {
        let runner = FakeRunner::default();
        runner.respond("status", "Status: Connected\nServer: de123");
        let status = adapter(&runner).status().unwrap();
        assert!(status.connected);
        assert_eq!(status.summary, "Server: de123");
    }

    #[test]
    fn test_status_uses_configured_marker() {
        let runner = FakeRunner::default();
        runner.respond("status", "State: UP\nServer: de123");
        let config = AdapterConfig {
            connected_marker: "UP".to_string(),
            ..AdapterConfig::default()
        };
        let adapter = CommandAdapter::with_runner(runner.clone(), config);
        assert!(adapter.status().unwrap().connected);
    }

    #[test]
    fn test_account_empty_output() {
        let runner = FakeRunner::default();
        runner.respond("account", "");
        assert_eq!(adapter(&runner).account().unwrap(), AccountInfo::Unavailable);
    }

    #[test]
    fn test_settings_scenario() {
        let runner = FakeRunner::default();
        runner.respond("settings", "Kill Switch: enabled\nFirewall: disabled");
        let snapshot = adapter(&runner).settings().unwrap();
        assert_eq!(snapshot.get(Setting::KillSwitch), Some(true));
        assert_eq!(snapshot.get(Setting::Firewall), Some(false));
        assert_eq!(snapshot.get(Setting::AutoConnect), None);
    }

    #[test]
    fn test_settings_unexpected_shape() {
        let runner = FakeRunner::default();
        runner.respond("settings", "Whoops, something went wrong");
        let err = adapter(&runner).settings().unwrap_err();
        assert!(matches!(err, AdapterError::UnexpectedOutput { .. }));
    }

    #[test]
    fn test_settings_empty_output_is_empty_snapshot() {
        let runner = FakeRunner::default();
        runner.respond("settings", "");
        assert!(adapter(&runner).settings().unwrap().is_empty());
    }

    // ---- actions ----

    #[test]
    fn test_connect_passes_target() {
        let runner = FakeRunner::default();
        runner.respond("connect P2P", "Connecting to ...\nYou are connected to ...");
        let target = ConnectTarget::Group(ServerGroup::new("P2P").unwrap());
        adapter(&runner).connect(&target).unwrap();
        assert_eq!(runner.calls.lock().unwrap()[0], vec!["connect", "P2P"]);
    }

    #[test]
    fn test_connect_failure_is_exit_error() {
        let runner = FakeRunner::default();
        runner.fail("connect", 1, "You are not logged in.");
        let err = adapter(&runner).connect(&ConnectTarget::Quick).unwrap_err();
        assert_eq!(err.kind(), "exit");
        assert!(err.to_string().contains("You are not logged in."));
    }

    #[test]
    fn test_disconnect() {
        let runner = FakeRunner::default();
        runner.respond("disconnect", "You are disconnected from NordVPN.");
        assert!(adapter(&runner).disconnect().is_ok());
    }

    #[test]
    fn test_apply_setting() {
        let runner = FakeRunner::default();
        runner.respond("set meshnet on", "Meshnet is set to 'enabled' successfully.");
        assert!(adapter(&runner).apply_setting(Setting::Meshnet, true).is_ok());
    }

    #[test]
    fn test_set_dns_blank_rejected_without_spawning() {
        let runner = FakeRunner::default();
        let err = adapter(&runner).set_dns("   ").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_set_dns_is_not_validated() {
        let runner = FakeRunner::default();
        runner.respond("set dns not-an-ip", "");
        assert!(adapter(&runner).set_dns("not-an-ip").is_ok());
    }

    #[test]
    fn test_launch_error_propagates() {
        let runner = FakeRunner::default();
        let err = adapter(&runner).list_groups().unwrap_err();
        assert!(matches!(err, AdapterError::Launch { .. }));
    }

    #[test]
    fn test_timeout_propagates() {
        let runner = FakeRunner::default();
        runner.respond_with(
            "status",
            Err(AdapterError::Timeout {
                command: "nordvpn status".to_string(),
                after: Duration::from_secs(10),
            }),
        );
        let err = adapter(&runner).status().unwrap_err();
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_failure_message_prefers_stderr() {
        let output = RawOutput {
            stdout: "stdout line".to_string(),
            stderr: "\nstderr line\n".to_string(),
            code: Some(1),
        };
        assert_eq!(failure_message(&output), "stderr line");
    }
}
