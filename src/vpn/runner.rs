//! Scoped execution of the external tool.
//!
//! Every call spawns exactly one child, drains its pipes on reader threads,
//! and polls it against a deadline. [`ChildGuard`] kills and reaps the child
//! on any path that does not observe its exit (timeout, wait error, panic).
//! The deadline also bounds collecting the output: a background process that
//! inherited the pipes cannot hold the call open past it.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::error::{AdapterError, Result};
use crate::constants;

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
}

impl RawOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can run the tool and hand back its output.
///
/// The adapter only depends on this trait, so tests substitute canned output.
pub trait CommandRunner: Send + Sync {
    /// Runs `program args...` to completion or until `timeout` elapses.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Launch`] if the process cannot be started or waited on,
    /// [`AdapterError::Timeout`] if it outlives `timeout`.
    fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<RawOutput>;
}

/// Renders a command line for logs and error messages.
pub fn describe(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

/// Runs real processes via [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<RawOutput> {
        let command = describe(program, args);
        crate::log_debug!("CMD", "Running `{command}` (timeout {}s)", timeout.as_secs());

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AdapterError::Launch {
                command: command.clone(),
                source,
            })?;

        let mut guard = ChildGuard::new(child);
        let stdout = spawn_reader(guard.child.stdout.take());
        let stderr = spawn_reader(guard.child.stderr.take());

        // A bound too large to represent means no deadline.
        let deadline = Instant::now().checked_add(timeout);
        let status = loop {
            match guard.child.try_wait() {
                Ok(Some(status)) => {
                    guard.reaped = true;
                    break status;
                }
                Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                    guard.kill_and_reap();
                    crate::log_warning!("CMD", "`{command}` timed out, process killed");
                    return Err(AdapterError::Timeout {
                        command,
                        after: timeout,
                    });
                }
                Ok(None) => thread::sleep(Duration::from_millis(constants::CHILD_POLL_MS)),
                Err(source) => return Err(AdapterError::Launch { command, source }),
            }
        };

        let (Some(stdout), Some(stderr)) = (
            collect_reader(stdout, deadline),
            collect_reader(stderr, deadline),
        ) else {
            crate::log_warning!("CMD", "`{command}` left its output open past the deadline");
            return Err(AdapterError::Timeout {
                command,
                after: timeout,
            });
        };

        let output = RawOutput {
            stdout,
            stderr,
            code: status.code(),
        };
        crate::log_debug!(
            "CMD",
            "`{command}` exited with {:?} ({} bytes of output)",
            output.code,
            output.stdout.len()
        );
        Ok(output)
    }
}

/// Owns a child process until it has been waited on.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn kill_and_reap(&mut self) {
        if self.reaped {
            return;
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill_and_reap();
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Waits for a reader to hit EOF. `None` if the pipe is still open at the
/// deadline; the reader thread is left to finish on its own.
fn collect_reader(rx: Option<Receiver<Vec<u8>>>, deadline: Option<Instant>) -> Option<String> {
    let Some(rx) = rx else {
        return Some(String::new());
    };
    let bytes = match deadline {
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(bytes) => bytes,
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => Vec::new(),
            }
        }
        None => rx.recv().unwrap_or_default(),
    };
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("nordvpn", &[]), "nordvpn");
        assert_eq!(
            describe("nordvpn", &["cities".to_string(), "Germany".to_string()]),
            "nordvpn cities Germany"
        );
    }

    #[test]
    fn test_captures_stdout_and_code() {
        let out = SystemRunner
            .run("sh", &sh("printf 'Germany\\nFrance\\n'"), Duration::from_secs(5))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "Germany\nFrance\n");
    }

    #[test]
    fn test_captures_stderr_and_nonzero_exit() {
        let out = SystemRunner
            .run("sh", &sh("echo oops >&2; exit 3"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let err = SystemRunner
            .run(
                "/nonexistent/nordpilot-test-tool",
                &[],
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, AdapterError::Launch { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = SystemRunner
            .run("sh", &sh("sleep 5"), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, AdapterError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_background_process_holding_pipe_times_out() {
        let started = Instant::now();
        let err = SystemRunner
            .run("sh", &sh("sleep 5 & echo x"), Duration::from_millis(500))
            .unwrap_err();
        assert!(matches!(err, AdapterError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_unrepresentable_timeout_runs_without_deadline() {
        let out = SystemRunner
            .run("sh", &sh("echo ok"), Duration::from_secs(u64::MAX))
            .unwrap();
        assert_eq!(out.stdout.trim(), "ok");
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        // Well past a 64 KiB pipe buffer.
        let out = SystemRunner
            .run(
                "sh",
                &sh("i=0; while [ $i -lt 20000 ]; do echo Country_$i; i=$((i+1)); done"),
                Duration::from_secs(20),
            )
            .unwrap();
        assert_eq!(out.stdout.lines().count(), 20000);
    }
}
