use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of "now" for relative timestamps, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
struct FixedClock(DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg(test)]
pub fn fixed_clock(timestamp: i64) -> Arc<dyn Clock> {
    use chrono::TimeZone;
    let at = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_default();
    Arc::new(FixedClock(at))
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// "just now", "5m ago", "3h ago", "2d ago".
pub fn format_relative(timestamp: u64, now: DateTime<Utc>) -> String {
    let now_ts = u64::try_from(now.timestamp()).unwrap_or(0);
    let diff = now_ts.saturating_sub(timestamp);
    let (minutes, hours, days) = (diff / 60, diff / 3600, diff / 86400);
    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1700092800;

    fn at(ts: i64) -> String {
        format_relative(ts as u64, fixed_clock(NOW).now())
    }

    #[test]
    fn test_format_relative_buckets() {
        assert_eq!(at(NOW - 30), "just now");
        assert_eq!(at(NOW - 5 * 60), "5m ago");
        assert_eq!(at(NOW - 3 * 3600 - 59), "3h ago");
        assert_eq!(at(NOW - 86400), "1d ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(at(NOW + 600), "just now");
    }
}
