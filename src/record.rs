//! Record model for logweave.
//!
//! A log line enters the pipeline as a `RawRecord` (verbatim text plus
//! provenance) and leaves the parser as a `LogRecord` with typed fields.
//! Records are immutable once produced: transformers move them by value,
//! they never rewrite one.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

/// Matches one `key=value` pair inside a topics segment. Values are either a
/// bare token or a double-quoted string with `\"`-escaped embedded quotes.
static TOPICS_KV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>\w+)=(?P<value>"(?:[^"\\]|\\")+"|\S+)"#)
        .expect("topics key=value regex must compile")
});

/// Severity of a log line, encoded on the wire as a fixed 3-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Note,
}

impl Level {
    /// Decode a 3-letter level code (case-insensitive). Returns `None` for
    /// codes outside the closed set.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "TRC" => Some(Level::Trace),
            "DBG" => Some(Level::Debug),
            "INF" => Some(Level::Info),
            "WRN" => Some(Level::Warning),
            "ERR" => Some(Level::Error),
            "NOT" => Some(Level::Note),
            _ => None,
        }
    }

    /// The wire code for this level.
    pub fn code(&self) -> &'static str {
        match self {
            Level::Trace => "TRC",
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warning => "WRN",
            Level::Error => "ERR",
            Level::Note => "NOT",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where a record came from. Display-only context for diagnostics; never
/// consulted for ordering or filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Bare line number, for anonymous streams such as stdin.
    Line { line: u64 },
    /// A file on disk plus the 1-based line number within it.
    File { path: PathBuf, line: u64 },
    /// A named in-memory buffer plus the 1-based line number within it.
    Buffer { name: String, line: u64 },
    /// A hit from a remote search backend: index id, result offset within the
    /// query, and origin identifiers.
    Remote {
        index: String,
        offset: u64,
        origin: String,
        run_id: String,
    },
}

impl Location {
    /// The per-source ordinal of this record: the line number for line-based
    /// sources, the result offset for remote hits.
    pub fn ordinal(&self) -> u64 {
        match self {
            Location::Line { line } => *line,
            Location::File { line, .. } => *line,
            Location::Buffer { line, .. } => *line,
            Location::Remote { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line { line } => write!(f, "line {}", line),
            Location::File { path, line } => write!(f, "{}:{}", path.display(), line),
            Location::Buffer { name, line } => write!(f, "{}:{}", name, line),
            Location::Remote {
                index,
                offset,
                origin,
                ..
            } => write!(f, "{}[{}] ({})", index, offset, origin),
        }
    }
}

/// One unparsed line of log text plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub location: Location,
    pub raw: String,
}

/// One parsed Chronicles log line.
///
/// `topics` is the verbatim trailing `key=value` run of the line (empty when
/// the line carried none); [`LogRecord::fields`] tokenizes it on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub location: Location,
    pub raw: String,
    pub timestamp: DateTime<FixedOffset>,
    pub level: Level,
    pub message: String,
    pub topics: String,
    pub count: Option<u64>,
}

impl LogRecord {
    /// Tokenize the topics segment into a key → raw-value map. Values are kept
    /// verbatim, surrounding quotes and escapes included. If a key occurs more
    /// than once the last occurrence wins (upstream leaves duplicate handling
    /// unspecified).
    pub fn fields(&self) -> HashMap<&str, &str> {
        TOPICS_KV
            .captures_iter(&self.topics)
            .map(|caps| {
                let key = caps.name("key").expect("key group always present");
                let value = caps.name("value").expect("value group always present");
                (key.as_str(), value.as_str())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_with_topics(topics: &str) -> LogRecord {
        LogRecord {
            location: Location::Line { line: 1 },
            raw: String::new(),
            timestamp: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2023, 1, 16, 18, 30, 29)
                .unwrap(),
            level: Level::Info,
            message: "message".to_string(),
            topics: topics.to_string(),
            count: Some(1),
        }
    }

    #[test]
    fn test_level_codes_round_trip() {
        for code in ["TRC", "DBG", "INF", "WRN", "ERR", "NOT"] {
            assert_eq!(Level::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Level::from_code("inf"), Some(Level::Info));
        assert_eq!(Level::from_code("XYZ"), None);
    }

    #[test]
    fn test_fields_tokenizes_pairs() {
        let record = record_with_topics("topics=\"pubsub gossipsub\" peer=16Uiu2");
        let fields = record.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["topics"], "\"pubsub gossipsub\"");
        assert_eq!(fields["peer"], "16Uiu2");
    }

    #[test]
    fn test_fields_keeps_escaped_quotes_verbatim() {
        let record = record_with_topics(r#"address="cid: \"zDx*QP4zx9\"""#);
        let fields = record.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["address"], r#""cid: \"zDx*QP4zx9\"""#);
    }

    #[test]
    fn test_fields_empty_topics() {
        assert!(record_with_topics("").fields().is_empty());
    }

    #[test]
    fn test_fields_duplicate_key_last_wins() {
        let record = record_with_topics("peer=a peer=b");
        assert_eq!(record.fields()["peer"], "b");
    }

    #[test]
    fn test_location_display() {
        let file = Location::File {
            path: PathBuf::from("node.log"),
            line: 12,
        };
        assert_eq!(file.to_string(), "node.log:12");

        let remote = Location::Remote {
            index: "logs-2023.01.16".to_string(),
            offset: 3,
            origin: "bootstrap-2".to_string(),
            run_id: "run-7".to_string(),
        };
        assert_eq!(remote.to_string(), "logs-2023.01.16[3] (bootstrap-2)");
        assert_eq!(remote.ordinal(), 3);
    }
}
