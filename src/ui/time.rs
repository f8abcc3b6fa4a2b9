use chrono::{Local, TimeZone};
use std::fmt::Write;

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Humanize an epoch-millis timestamp relative to `now_ms` ("just now", "5m ago", ...).
/// Anything a week or older is shown as a local calendar date using `date_format`.
/// Timestamps in the future count as "just now".
pub fn format_relative(timestamp_ms: i64, now_ms: i64, date_format: &str) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    if elapsed < MINUTE {
        return "just now".to_string();
    }
    if elapsed < HOUR {
        return format!("{}m ago", elapsed / MINUTE);
    }
    if elapsed < DAY {
        return format!("{}h ago", elapsed / HOUR);
    }
    if elapsed < WEEK {
        return format!("{}d ago", elapsed / DAY);
    }
    calendar_date(timestamp_ms, date_format)
}

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

fn calendar_date(timestamp_ms: i64, date_format: &str) -> String {
    let Some(dt) = Local.timestamp_millis_opt(timestamp_ms).single() else {
        return String::new();
    };
    // chrono reports a bad format string as a fmt error at write time
    let mut out = String::new();
    if write!(out, "{}", dt.format(date_format)).is_err() {
        tracing::warn!(date_format, "invalid date format, using ISO dates");
        out.clear();
        let _ = write!(out, "{}", dt.format(FALLBACK_DATE_FORMAT));
    }
    out
}

/// Current time in epoch millis
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000_000;
    const FMT: &str = "%-m/%-d/%Y";

    #[test]
    fn thirty_seconds_is_just_now() {
        assert_eq!(format_relative(NOW - 30_000, NOW, FMT), "just now");
    }

    #[test]
    fn five_minutes() {
        assert_eq!(format_relative(NOW - 5 * MINUTE, NOW, FMT), "5m ago");
    }

    #[test]
    fn three_hours() {
        assert_eq!(format_relative(NOW - 3 * HOUR, NOW, FMT), "3h ago");
    }

    #[test]
    fn two_days() {
        assert_eq!(format_relative(NOW - 2 * DAY, NOW, FMT), "2d ago");
    }

    #[test]
    fn ten_days_is_a_calendar_date() {
        let ts = NOW - 10 * DAY;
        let out = format_relative(ts, NOW, FMT);
        assert!(!out.ends_with("ago"));
        let expected = Local
            .timestamp_millis_opt(ts)
            .single()
            .unwrap()
            .format(FMT)
            .to_string();
        assert_eq!(out, expected);
        assert_eq!(out.matches('/').count(), 2);
    }

    #[test]
    fn boundaries_round_down() {
        assert_eq!(format_relative(NOW - MINUTE, NOW, FMT), "1m ago");
        assert_eq!(format_relative(NOW - HOUR + 1, NOW, FMT), "59m ago");
        assert_eq!(format_relative(NOW - HOUR, NOW, FMT), "1h ago");
        assert_eq!(format_relative(NOW - DAY, NOW, FMT), "1d ago");
        assert_eq!(format_relative(NOW - WEEK + 1, NOW, FMT), "6d ago");
        assert!(!format_relative(NOW - WEEK, NOW, FMT).ends_with("ago"));
    }

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(format_relative(NOW + 10 * HOUR, NOW, FMT), "just now");
    }

    #[test]
    fn invalid_date_format_falls_back_to_iso() {
        let out = format_relative(NOW - 30 * DAY, NOW, "%Q%");
        assert_eq!(out.len(), 10);
        assert_eq!(out.matches('-').count(), 2);
    }

    #[test]
    fn custom_date_format() {
        let out = format_relative(0, NOW, "%Y");
        assert!(out == "1970" || out == "1969");
    }
}
