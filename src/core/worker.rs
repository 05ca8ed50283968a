//! Off-thread execution of adapter calls.
//!
//! The dashboard never waits on the external tool. Each [`Request`] runs on
//! its own thread and the matching [`Response`] comes back through the app's
//! message channel, where it is drained once per frame.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::message::Message;
use crate::state::{
    AccountInfo, ConnectTarget, ConnectionStatus, Location, ServerGroup, Setting,
    SettingsSnapshot,
};
use crate::vpn::{CommandAdapter, Result};

/// Work the dashboard can hand to a background thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Countries,
    Cities(Location),
    Groups,
    Status,
    Account,
    Settings,
    Connect(ConnectTarget),
    Disconnect,
    ApplySetting(Setting, bool),
    SetDns(String),
}

impl Request {
    /// Short label for log lines.
    pub fn label(&self) -> String {
        match self {
            Self::Countries => "list countries".to_string(),
            Self::Cities(country) => format!("list cities in {country}"),
            Self::Groups => "list server groups".to_string(),
            Self::Status => "query status".to_string(),
            Self::Account => "query account".to_string(),
            Self::Settings => "read settings".to_string(),
            Self::Connect(target) => format!("connect ({target})"),
            Self::Disconnect => "disconnect".to_string(),
            Self::ApplySetting(setting, enabled) => {
                format!("set {} {}", setting.label(), if *enabled { "on" } else { "off" })
            }
            Self::SetDns(address) => format!("set DNS {address}"),
        }
    }
}

/// Outcome of a [`Request`], carrying enough context to be applied late.
#[derive(Debug)]
pub enum Response {
    Countries(Result<Vec<Location>>),
    Cities {
        country: Location,
        result: Result<Vec<Location>>,
    },
    Groups(Result<Vec<ServerGroup>>),
    Status(Result<ConnectionStatus>),
    Account(Result<AccountInfo>),
    Settings(Result<SettingsSnapshot>),
    Connected {
        target: ConnectTarget,
        result: Result<()>,
    },
    Disconnected(Result<()>),
    SettingApplied {
        setting: Setting,
        enabled: bool,
        result: Result<()>,
    },
    DnsSet {
        address: String,
        result: Result<()>,
    },
}

/// Runs a request on the calling thread.
pub fn execute(adapter: &CommandAdapter, request: Request) -> Response {
    match request {
        Request::Countries => Response::Countries(adapter.list_countries()),
        Request::Cities(country) => {
            let result = adapter.list_cities(country.as_str());
            Response::Cities { country, result }
        }
        Request::Groups => Response::Groups(adapter.list_groups()),
        Request::Status => Response::Status(adapter.status()),
        Request::Account => Response::Account(adapter.account()),
        Request::Settings => Response::Settings(adapter.settings()),
        Request::Connect(target) => {
            let result = adapter.connect(&target);
            Response::Connected { target, result }
        }
        Request::Disconnect => Response::Disconnected(adapter.disconnect()),
        Request::ApplySetting(setting, enabled) => Response::SettingApplied {
            setting,
            enabled,
            result: adapter.apply_setting(setting, enabled),
        },
        Request::SetDns(address) => {
            let result = adapter.set_dns(&address);
            Response::DnsSet { address, result }
        }
    }
}

/// Runs a request on a new thread and posts the response as
/// [`Message::Response`].
///
/// A closed channel (the app already quit) is not an error; the result is
/// dropped.
pub fn spawn_request(
    adapter: Arc<CommandAdapter>,
    request: Request,
    tx: Sender<Message>,
) -> JoinHandle<()> {
    crate::log_debug!("APP", "Queued: {}", request.label());
    thread::spawn(move || {
        let response = execute(&adapter, request);
        let _ = tx.send(Message::Response(response));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vpn::adapter::tests::{adapter, FakeRunner};
    use crate::vpn::AdapterError;
    use std::sync::mpsc;

    #[test]
    fn test_execute_cities_keeps_country() {
        let runner = FakeRunner::default();
        runner.respond("cities Germany", "Berlin\nFrankfurt\n");
        let adapter = adapter(&runner);

        let de = Location::new("Germany").unwrap();
        match execute(&adapter, Request::Cities(de.clone())) {
            Response::Cities { country, result } => {
                assert_eq!(country, de);
                assert_eq!(result.unwrap().len(), 2);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_execute_setting_failure_keeps_context() {
        let runner = FakeRunner::default();
        runner.fail("set firewall off", 1, "Firewall is already disabled.\n");
        let adapter = adapter(&runner);

        match execute(&adapter, Request::ApplySetting(Setting::Firewall, false)) {
            Response::SettingApplied {
                setting,
                enabled,
                result,
            } => {
                assert_eq!(setting, Setting::Firewall);
                assert!(!enabled);
                assert!(matches!(result, Err(AdapterError::Exit { .. })));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_spawn_request_delivers_over_channel() {
        let runner = FakeRunner::default();
        runner.respond("status", "Status: Connected\nServer: de123\n");
        let adapter = Arc::new(adapter(&runner));
        let (tx, rx) = mpsc::channel();

        spawn_request(adapter, Request::Status, tx).join().unwrap();

        match rx.recv().unwrap() {
            Message::Response(Response::Status(Ok(status))) => {
                assert!(status.connected);
                assert_eq!(status.summary, "Server: de123");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_spawn_request_with_closed_channel_does_not_panic() {
        let runner = FakeRunner::default();
        runner.respond("groups", "P2P\n");
        let adapter = Arc::new(adapter(&runner));
        let (tx, rx) = mpsc::channel();
        drop(rx);

        assert!(spawn_request(adapter, Request::Groups, tx).join().is_ok());
    }

    #[test]
    fn test_request_labels() {
        assert_eq!(Request::Countries.label(), "list countries");
        assert_eq!(
            Request::ApplySetting(Setting::KillSwitch, true).label(),
            "set Kill Switch on"
        );
        assert_eq!(
            Request::Connect(ConnectTarget::Quick).label(),
            "connect (quick connect)"
        );
    }
}
