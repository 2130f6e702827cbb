//! Display formatting for flight card fields.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde_json::Number;

use crate::models::Clock;

const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-like timestamp into its wall-clock date and time.
///
/// Offsets are honored as written; the time is not converted to any zone.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}

/// Hour and minute of a timestamp, or empty when it cannot be parsed.
pub fn clock_time(raw: &str, clock: Clock) -> String {
    let Some(dt) = parse_timestamp(raw) else {
        return String::new();
    };
    match clock {
        Clock::TwentyFourHour => format!("{:02}:{:02}", dt.hour(), dt.minute()),
        Clock::TwelveHour => {
            let (pm, hour) = dt.hour12();
            let suffix = if pm { "PM" } else { "AM" };
            format!("{:02}:{:02} {}", hour, dt.minute(), suffix)
        }
    }
}

/// `125` → `"2h 5m"`.
pub fn duration(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Render a JSON number the way it reads in the payload: `199`, `199.5`.
pub fn number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_24h() {
        assert_eq!(clock_time("2025-03-01T08:05:00", Clock::TwentyFourHour), "08:05");
        assert_eq!(clock_time("2025-03-01T23:40", Clock::TwentyFourHour), "23:40");
        assert_eq!(
            clock_time("2025-03-01T14:30:00+09:00", Clock::TwentyFourHour),
            "14:30"
        );
        assert_eq!(
            clock_time("2025-03-01 06:15:00.000", Clock::TwentyFourHour),
            "06:15"
        );
    }

    #[test]
    fn clock_time_12h() {
        assert_eq!(clock_time("2025-03-01T08:05:00", Clock::TwelveHour), "08:05 AM");
        assert_eq!(clock_time("2025-03-01T12:00:00", Clock::TwelveHour), "12:00 PM");
        assert_eq!(clock_time("2025-03-01T00:30:00", Clock::TwelveHour), "12:30 AM");
    }

    #[test]
    fn unparsable_timestamps_are_empty() {
        assert_eq!(clock_time("", Clock::TwentyFourHour), "");
        assert_eq!(clock_time("tomorrow", Clock::TwentyFourHour), "");
        assert_eq!(clock_time("2025-03-01", Clock::TwentyFourHour), "");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(duration(125), "2h 5m");
        assert_eq!(duration(0), "0h 0m");
        assert_eq!(duration(60), "1h 0m");
    }

    #[test]
    fn number_formatting() {
        let n = |v: serde_json::Value| number(v.as_number().unwrap());
        assert_eq!(n(serde_json::json!(199)), "199");
        assert_eq!(n(serde_json::json!(199.0)), "199");
        assert_eq!(n(serde_json::json!(199.5)), "199.5");
        assert_eq!(n(serde_json::json!(-3)), "-3");
    }
}
