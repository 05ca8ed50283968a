//! NordVPN command-line adapter.
//!
//! - [`adapter`]: typed intents and the [`CommandAdapter`] that runs them
//! - [`parser`]: pure parsing of the tool's text output
//! - [`runner`]: process execution with timeout and guaranteed reap
//! - [`error`]: the [`AdapterError`] taxonomy

pub mod adapter;
pub mod error;
pub mod parser;
pub mod runner;

pub use adapter::{AdapterConfig, CommandAdapter};
pub use error::{AdapterError, Result};

/// Collapses a failed query to its default value, logging why.
///
/// This keeps the dashboard showing sane defaults (empty lists, the
/// `unavailable` account, a disconnected status) while the event log records
/// which kind of failure happened.
pub fn or_default<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        crate::log_error!("CMD", "Could not {what}: {e}");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AccountInfo;

    #[test]
    fn test_or_default_keeps_success() {
        let value: Vec<u8> = or_default(Ok(vec![1, 2]), "list things");
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn test_or_default_falls_back() {
        let account: AccountInfo = or_default(
            Err(AdapterError::InvalidInput("x".to_string())),
            "load account",
        );
        assert_eq!(account, AccountInfo::Unavailable);
    }
}
