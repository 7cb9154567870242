//! Predicate filtering over a log source.

use chrono::{DateTime, FixedOffset};

use crate::record::LogRecord;
use crate::source::{LogSource, Pull};

/// Lazily yields only the records satisfying a predicate, preserving their
/// relative order. Upstream errors pass through unchanged.
pub struct Filtered<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> Filtered<S, P>
where
    S: LogSource,
    P: FnMut(&LogRecord) -> bool,
{
    pub fn new(source: S, predicate: P) -> Self {
        Self { source, predicate }
    }
}

impl<S, P> LogSource for Filtered<S, P>
where
    S: LogSource,
    P: FnMut(&LogRecord) -> bool,
{
    fn next_record(&mut self) -> Pull<LogRecord> {
        while let Some(record) = self.source.next_record()? {
            if (self.predicate)(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// Predicate keeping records with `start <= timestamp <= end`, inclusive on
/// both ends.
pub fn timestamp_range(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl FnMut(&LogRecord) -> bool {
    move |record| start <= record.timestamp && record.timestamp <= end
}
