//! Small formatting helpers shared by the dashboard and the CLI.

use std::time::{Duration, SystemTime};

/// Truncates a string to a maximum number of characters.
///
/// If the string exceeds `max_chars`, it is truncated and "..." is appended.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        t.push_str("...");
        t
    } else {
        s.to_string()
    }
}

/// Returns the current local time formatted as HH:MM:SS.
pub fn format_local_time() -> String {
    format_system_time_local(SystemTime::now())
}

/// Converts any `SystemTime` into a local `HH:MM:SS` string.
///
/// Used for the header clock and for stamping event log entries.
#[must_use]
pub fn format_system_time_local(time: SystemTime) -> String {
    format_system_time_inner(time).unwrap_or_else(|| "00:00:00".to_string())
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn format_system_time_inner(time: SystemTime) -> Option<String> {
    let secs = time.duration_since(SystemTime::UNIX_EPOCH).ok()?.as_secs();

    // SAFETY: localtime_r writes into our stack-allocated `tm` and is
    // thread-safe (unlike localtime). Both pointers are valid for the call.
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    #[allow(clippy::cast_possible_wrap)]
    let time_t = secs as libc::time_t;
    let result = unsafe { libc::localtime_r(&time_t, &mut tm) };
    if result.is_null() {
        return None;
    }

    Some(format!("{:02}:{:02}:{:02}", tm.tm_hour, tm.tm_min, tm.tm_sec))
}

/// UTC wall clock; there is no portable local-time lookup without libc.
#[cfg(not(unix))]
fn format_system_time_inner(time: SystemTime) -> Option<String> {
    let secs = time.duration_since(SystemTime::UNIX_EPOCH).ok()?.as_secs() % 86_400;
    Some(format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    ))
}

/// Compact "how long ago" label for the status panel (`3s`, `2m`, `1h`).
pub fn format_elapsed(since: SystemTime) -> String {
    match SystemTime::now().duration_since(since) {
        Ok(elapsed) => format_duration_short(elapsed),
        Err(_) => "now".to_string(),
    }
}

/// `Duration` as the largest whole unit: `45s`, `12m`, `3h`.
pub fn format_duration_short(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("test", 4), "test");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("United_Kingdom", 9), "United...");
    }

    #[test]
    fn test_truncate_with_unicode() {
        assert_eq!(truncate("Curaçao", 7), "Curaçao");
        assert_eq!(truncate("São_Paulo_City", 8), "São_P...");
    }

    #[test]
    fn test_format_system_time_shape() {
        let s = format_system_time_local(SystemTime::now());
        assert_eq!(s.len(), 8);
        assert_eq!(s.as_bytes()[2], b':');
        assert_eq!(s.as_bytes()[5], b':');
    }

    #[test]
    fn test_format_duration_short() {
        assert_eq!(format_duration_short(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration_short(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration_short(Duration::from_secs(300)), "5m");
        assert_eq!(format_duration_short(Duration::from_secs(7200)), "2h");
    }

    #[test]
    fn test_format_elapsed_future_is_now() {
        let future = SystemTime::now() + Duration::from_secs(10);
        assert_eq!(format_elapsed(future), "now");
        let past = SystemTime::now() - Duration::from_secs(120);
        assert_eq!(format_elapsed(past), "2m");
    }
}
