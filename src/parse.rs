//! Structured line parser for Chronicles-style logs.
//!
//! Grammar: `LVL YYYY-MM-DD HH:MM:SS.mmm±HH:MM MESSAGE [TOPICS] count=N`.
//! The topics segment is the longest suffix of the free text that fully
//! matches a run of space-separated `key=value` pairs, so a message may
//! contain `=` characters without being misread. Lines that do not match are
//! data noise: the stream stage logs them out of band and moves on.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use tracing::warn;

use crate::record::{Level, LogRecord, RawRecord};
use crate::source::{LogSource, Pull, RawSource};

static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<level>\w{3}) (?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{2}:\d{2}) (?P<message>.*) count=(?P<count>\d+)$",
    )
    .expect("log line regex must compile")
});

/// Longest trailing run of `key=value` pairs, anchored at end of text. Values
/// are bare tokens or double-quoted strings with `\"`-escaped quotes.
static TOPICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"((\w+=("[^"]+"|\S+) )+)?\w+=("([^"\\]|\\")+"|\S+)$"#)
        .expect("topics regex must compile")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f%:z";

/// Parse one raw line into a structured record. Returns `None` when the line
/// does not match the grammar.
pub fn parse_line(line: &RawRecord) -> Option<LogRecord> {
    let caps = LOG_LINE.captures(&line.raw)?;

    let level = Level::from_code(&caps["level"])?;
    let timestamp = DateTime::parse_from_str(&caps["timestamp"], TIMESTAMP_FORMAT).ok()?;
    let count = caps["count"].parse().ok()?;
    let (message, topics) = split_topics(&caps["message"]);

    Some(LogRecord {
        location: line.location.clone(),
        raw: line.raw.clone(),
        timestamp,
        level,
        message: message.to_string(),
        topics: topics.to_string(),
        count: Some(count),
    })
}

/// Split free text into (message, topics). The topics segment may be empty;
/// the message is trimmed of trailing whitespace.
fn split_topics(body: &str) -> (&str, &str) {
    match TOPICS.find(body) {
        Some(found) => (body[..found.start()].trim_end(), found.as_str()),
        None => (body.trim_end(), ""),
    }
}

/// Stream stage that parses a raw source into log records.
///
/// Unparseable lines are skipped with a diagnostic on the tracing channel,
/// keeping the record stream itself clean. Resource errors from the
/// underlying source propagate unchanged.
pub struct ChroniclesSource<S> {
    source: S,
}

impl<S: RawSource> ChroniclesSource<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: RawSource> LogSource for ChroniclesSource<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        while let Some(line) = self.source.next_record()? {
            match parse_line(&line) {
                Some(record) => return Ok(Some(record)),
                None => warn!("skipping unparseable line at {}: {}", line.location, line.raw),
            }
        }
        Ok(None)
    }
}
