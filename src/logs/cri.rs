//! Filtering of container runtime (CRI) log files.
//!
//! Lines look like `2023-05-10T10:00:00.123456789Z stdout F message`. A `P`
//! tag marks a partial line that continues on the next line of the same
//! stream.

use crate::formatter::age::parse_time;
use chrono::{DateTime, Utc};

/// How log lines are post-processed.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Keep the leading timestamp
    pub timestamps: bool,
    /// Only the last N logical lines
    pub tail: Option<usize>,
    /// Drop lines logged before this instant
    pub since: Option<DateTime<Utc>>,
}

/// One logical log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: Option<DateTime<Utc>>,
    /// Timestamp text as written in the file
    pub raw_timestamp: Option<String>,
    pub message: String,
}

impl LogLine {
    fn render(&self, timestamps: bool) -> String {
        match (&self.raw_timestamp, timestamps) {
            (Some(ts), true) => format!("{} {}", ts, self.message),
            _ => self.message.clone(),
        }
    }
}

enum Parsed<'a> {
    Cri {
        raw_timestamp: &'a str,
        timestamp: DateTime<Utc>,
        stream: &'a str,
        partial: bool,
        message: &'a str,
    },
    Timestamped {
        raw_timestamp: &'a str,
        timestamp: DateTime<Utc>,
        message: &'a str,
    },
    Raw(&'a str),
}

fn parse_line(line: &str) -> Parsed<'_> {
    let Some((first, rest)) = line.split_once(' ') else {
        return Parsed::Raw(line);
    };
    let Some(timestamp) = parse_time(first) else {
        return Parsed::Raw(line);
    };

    let mut parts = rest.splitn(3, ' ');
    match (parts.next(), parts.next()) {
        (Some(stream @ ("stdout" | "stderr")), Some(tag @ ("P" | "F"))) => Parsed::Cri {
            raw_timestamp: first,
            timestamp,
            stream,
            partial: tag == "P",
            message: parts.next().unwrap_or_default(),
        },
        _ => Parsed::Timestamped {
            raw_timestamp: first,
            timestamp,
            message: rest,
        },
    }
}

/// Join partial fragments and attach timestamps.
pub fn parse(content: &str) -> Vec<LogLine> {
    let mut lines = Vec::new();
    // Pending partial line per stream
    let mut pending: Vec<(String, LogLine)> = Vec::new();

    for line in content.lines() {
        match parse_line(line) {
            Parsed::Cri {
                raw_timestamp,
                timestamp,
                stream,
                partial,
                message,
            } => {
                let index = pending.iter().position(|(s, _)| s == stream);
                let mut current = match index {
                    Some(i) => pending.remove(i).1,
                    None => LogLine {
                        timestamp: Some(timestamp),
                        raw_timestamp: Some(raw_timestamp.to_string()),
                        message: String::new(),
                    },
                };
                current.message.push_str(message);
                if partial {
                    pending.push((stream.to_string(), current));
                } else {
                    lines.push(current);
                }
            }
            Parsed::Timestamped {
                raw_timestamp,
                timestamp,
                message,
            } => lines.push(LogLine {
                timestamp: Some(timestamp),
                raw_timestamp: Some(raw_timestamp.to_string()),
                message: message.to_string(),
            }),
            Parsed::Raw(message) => lines.push(LogLine {
                timestamp: None,
                raw_timestamp: None,
                message: message.to_string(),
            }),
        }
    }

    // A file can end in the middle of a partial line
    lines.extend(pending.into_iter().map(|(_, line)| line));
    lines
}

/// Apply `options` to the content of a log file.
pub fn filter(content: &str, options: &LogOptions) -> String {
    let mut lines = parse(content);

    if let Some(since) = options.since {
        // Untimestamped lines follow the decision for the line before them
        let mut keep = false;
        lines.retain(|line| {
            if let Some(ts) = line.timestamp {
                keep = ts >= since;
            }
            keep
        });
    }

    if let Some(tail) = options.tail {
        let skip = lines.len().saturating_sub(tail);
        lines.drain(..skip);
    }

    let mut out = String::new();
    for line in &lines {
        out.push_str(&line.render(options.timestamps));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
2023-05-10T10:00:00.000000001Z stdout F starting etcd
2023-05-10T10:00:01.5Z stderr P {\"level\":\"warn\",
2023-05-10T10:00:01.6Z stdout F interleaved
2023-05-10T10:00:01.7Z stderr F \"msg\":\"slow\"}
2023-05-10T10:00:05Z stdout F ready
";

    #[test]
    fn test_partial_lines_are_joined() {
        let lines = parse(LOG);
        let messages: Vec<&str> = lines.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "starting etcd",
                "interleaved",
                "{\"level\":\"warn\",\"msg\":\"slow\"}",
                "ready"
            ]
        );
        assert_eq!(lines[2].raw_timestamp.as_deref(), Some("2023-05-10T10:00:01.5Z"));
    }

    #[test]
    fn test_filter_plain() {
        let out = filter(LOG, &LogOptions::default());
        assert!(out.starts_with("starting etcd\n"));
        assert!(!out.contains("stdout"));
    }

    #[test]
    fn test_filter_timestamps_and_tail() {
        let options = LogOptions {
            timestamps: true,
            tail: Some(1),
            ..Default::default()
        };
        assert_eq!(filter(LOG, &options), "2023-05-10T10:00:05Z ready\n");
    }

    #[test]
    fn test_filter_since() {
        let options = LogOptions {
            since: parse_time("2023-05-10T10:00:01Z"),
            ..Default::default()
        };
        assert_eq!(
            filter(LOG, &options),
            "interleaved\n{\"level\":\"warn\",\"msg\":\"slow\"}\nready\n"
        );
    }

    #[test]
    fn test_raw_lines_follow_previous_decision() {
        let content = "\
2023-05-10T09:00:00Z old
  continuation of old
2023-05-10T11:00:00Z new
  continuation of new
";
        let options = LogOptions {
            since: parse_time("2023-05-10T10:00:00Z"),
            ..Default::default()
        };
        assert_eq!(
            filter(content, &options),
            "new\n  continuation of new\n"
        );
    }

    #[test]
    fn test_tail_zero() {
        let options = LogOptions {
            tail: Some(0),
            ..Default::default()
        };
        assert_eq!(filter(LOG, &options), "");
    }
}
