//! Human-readable labels for token lifetimes and countdowns

/// Formats a TTL for display, e.g. `3 menit`, `2m 30s`, `45 detik`.
pub fn format_ttl(seconds: i64) -> String {
    if seconds >= 60 && seconds % 60 == 0 {
        return format!("{} menit", seconds / 60);
    }
    if seconds >= 60 {
        return format!("{}m {}s", seconds / 60, seconds % 60);
    }
    format!("{} detik", seconds.max(0))
}

/// Formats a remaining-seconds countdown, e.g. `2:05` or `42s`.
pub fn format_countdown(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes > 0 {
        format!("{}:{:02}", minutes, rest)
    } else {
        format!("{}s", seconds)
    }
}
