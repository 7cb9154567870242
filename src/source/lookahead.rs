//! One-record lookahead over any log source.

use crate::record::LogRecord;
use crate::source::{LogSource, Pull};
use crate::error::SourceError;

/// Wraps a source and stays one record ahead of the consumer, so the next
/// record can be inspected without consuming it. This is the sole mechanism
/// the ordering transformers use to compare sources without losing records.
pub struct Lookahead<S> {
    source: S,
    peeked: Option<LogRecord>,
}

impl<S: LogSource> Lookahead<S> {
    /// Wrap a source, eagerly pulling the first record. A resource error
    /// while priming surfaces here rather than on the first pull.
    pub fn new(mut source: S) -> Result<Self, SourceError> {
        let peeked = source.next_record()?;
        Ok(Self { source, peeked })
    }

    /// The next record, without advancing. Stable across repeated calls.
    pub fn peek(&self) -> Option<&LogRecord> {
        self.peeked.as_ref()
    }
}

impl<S: LogSource> LogSource for Lookahead<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        match self.peeked.take() {
            None => Ok(None),
            Some(record) => {
                self.peeked = self.source.next_record()?;
                Ok(Some(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ChroniclesSource;
    use crate::source::input::BufferSource;

    fn source(lines: &str) -> Lookahead<ChroniclesSource<BufferSource>> {
        Lookahead::new(ChroniclesSource::new(BufferSource::new("test", lines))).unwrap()
    }

    const TWO_LINES: &str = "\
INF 2023-01-16 18:30:29.594+00:00 first count=1
INF 2023-01-16 18:30:29.595+00:00 second count=2
";

    #[test]
    fn test_peek_does_not_advance() {
        let lookahead = source(TWO_LINES);
        assert_eq!(lookahead.peek().unwrap().count, Some(1));
        assert_eq!(lookahead.peek().unwrap().count, Some(1));
    }

    #[test]
    fn test_next_returns_peeked_then_reprimes() {
        let mut lookahead = source(TWO_LINES);
        assert_eq!(lookahead.next_record().unwrap().unwrap().count, Some(1));
        assert_eq!(lookahead.peek().unwrap().count, Some(2));
        assert_eq!(lookahead.next_record().unwrap().unwrap().count, Some(2));
        assert!(lookahead.peek().is_none());
        assert!(lookahead.next_record().unwrap().is_none());
    }

    #[test]
    fn test_empty_source_peeks_none() {
        let lookahead = source("");
        assert!(lookahead.peek().is_none());
    }
}
