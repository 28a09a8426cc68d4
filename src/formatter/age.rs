//! Human readable ages, matching kubectl's `HumanDuration`.

use chrono::{DateTime, Duration, Utc};

pub const UNKNOWN: &str = "<unknown>";

/// Format a duration the way kubectl prints the AGE column.
pub fn human_duration(d: Duration) -> String {
    let seconds = d.num_seconds();
    if seconds < -1 {
        return "<invalid>".to_string();
    } else if seconds < 0 {
        return "0s".to_string();
    } else if seconds < 60 * 2 {
        return format!("{}s", seconds);
    }

    let minutes = d.num_minutes();
    if minutes < 10 {
        let s = seconds % 60;
        return if s == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, s)
        };
    } else if minutes < 60 * 3 {
        return format!("{}m", minutes);
    }

    let hours = d.num_hours();
    if hours < 8 {
        let m = minutes % 60;
        if m == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h{}m", hours, m)
        }
    } else if hours < 48 {
        format!("{}h", hours)
    } else if hours < 24 * 8 {
        let h = hours % 24;
        if h == 0 {
            format!("{}d", hours / 24)
        } else {
            format!("{}d{}h", hours / 24, h)
        }
    } else if hours < 24 * 365 * 2 {
        format!("{}d", hours / 24)
    } else if hours < 24 * 365 * 8 {
        let dy = (hours / 24) % 365;
        if dy == 0 {
            format!("{}y", hours / 24 / 365)
        } else {
            format!("{}y{}d", hours / 24 / 365, dy)
        }
    } else {
        format!("{}y", hours / 24 / 365)
    }
}

/// Age of `timestamp` relative to `now`.
pub fn age(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match timestamp {
        Some(ts) => human_duration(now - ts),
        None => UNKNOWN.to_string(),
    }
}

/// Parse an RFC3339 timestamp as found in manifests.
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_human_duration_ranges() {
        let cases = [
            (Duration::seconds(-5), "<invalid>"),
            (Duration::milliseconds(-500), "0s"),
            (Duration::seconds(0), "0s"),
            (Duration::seconds(119), "119s"),
            (Duration::seconds(120), "2m"),
            (Duration::seconds(5 * 60 + 7), "5m7s"),
            (Duration::minutes(10), "10m"),
            (Duration::minutes(179), "179m"),
            (Duration::minutes(3 * 60), "3h"),
            (Duration::minutes(7 * 60 + 59), "7h59m"),
            (Duration::hours(8), "8h"),
            (Duration::hours(47), "47h"),
            (Duration::hours(48), "2d"),
            (Duration::hours(24 * 7 + 23), "7d23h"),
            (Duration::days(8), "8d"),
            (Duration::days(729), "729d"),
            (Duration::days(730), "2y"),
            (Duration::days(365 * 3 + 10), "3y10d"),
            (Duration::days(365 * 9), "9y"),
        ];
        for (d, expected) in cases {
            assert_eq!(human_duration(d), expected, "for {:?}", d);
        }
    }

    #[test]
    fn test_age_unknown() {
        assert_eq!(age(None, Utc::now()), UNKNOWN);
    }

    #[test]
    fn test_parse_time() {
        let now = parse_time("2023-05-10T12:00:00Z").unwrap();
        let created = parse_time("2023-05-10T11:00:00+00:00");
        assert_eq!(age(created, now), "60m");
        assert!(parse_time("yesterday").is_none());
    }

    proptest! {
        #[test]
        fn human_duration_is_never_empty(secs in 0i64..(60 * 60 * 24 * 365 * 20)) {
            let out = human_duration(Duration::seconds(secs));
            prop_assert!(!out.is_empty());
            prop_assert!(out.chars().next().unwrap().is_ascii_digit());
        }
    }
}
