//! Sources comparable by the timestamp of their next record.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};

use crate::error::SourceError;
use crate::record::LogRecord;
use crate::source::lookahead::Lookahead;
use crate::source::{LogSource, Pull};

/// A lookahead source with a total order defined between sources, keyed by
/// each one's peeked timestamp. An exhausted source has no comparison key:
/// asking for one is a caller bug and surfaces as [`SourceError::Exhausted`]
/// rather than some default ordering.
pub struct Ordered<S> {
    inner: Lookahead<S>,
}

impl<S: LogSource> Ordered<S> {
    pub fn new(source: S) -> Result<Self, SourceError> {
        Ok(Self {
            inner: Lookahead::new(source)?,
        })
    }

    /// The next record, without advancing.
    pub fn peek(&self) -> Option<&LogRecord> {
        self.inner.peek()
    }

    /// The comparison key: the peeked record's timestamp.
    pub fn peeked_timestamp(&self) -> Result<DateTime<FixedOffset>, SourceError> {
        self.inner
            .peek()
            .map(|record| record.timestamp)
            .ok_or(SourceError::Exhausted)
    }

    /// Compare two sources by their peeked timestamps.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, SourceError> {
        Ok(self.peeked_timestamp()?.cmp(&other.peeked_timestamp()?))
    }
}

impl<S: LogSource> LogSource for Ordered<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        self.inner.next_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ChroniclesSource;
    use crate::source::input::BufferSource;

    fn ordered(lines: &str) -> Ordered<ChroniclesSource<BufferSource>> {
        Ordered::new(ChroniclesSource::new(BufferSource::new("test", lines))).unwrap()
    }

    #[test]
    fn test_compares_by_peeked_timestamp() {
        let earlier = ordered("INF 2023-01-16 18:30:29.594+00:00 a count=1\n");
        let later = ordered("INF 2023-01-16 18:30:29.595+00:00 b count=1\n");
        assert_eq!(earlier.try_cmp(&later).unwrap(), Ordering::Less);
        assert_eq!(later.try_cmp(&earlier).unwrap(), Ordering::Greater);
        assert_eq!(earlier.try_cmp(&earlier).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_offsets_compare_as_instants() {
        // Same instant expressed in two zones.
        let utc = ordered("INF 2023-01-16 18:30:29.594+00:00 a count=1\n");
        let cet = ordered("INF 2023-01-16 19:30:29.594+01:00 b count=1\n");
        assert_eq!(utc.try_cmp(&cet).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_drained_source_cannot_be_ordered() {
        let mut drained = ordered("INF 2023-01-16 18:30:29.594+00:00 a count=1\n");
        let fresh = ordered("INF 2023-01-16 18:30:29.595+00:00 b count=1\n");
        drained.next_record().unwrap().unwrap();

        assert!(matches!(
            drained.peeked_timestamp(),
            Err(SourceError::Exhausted)
        ));
        assert!(matches!(drained.try_cmp(&fresh), Err(SourceError::Exhausted)));
        assert!(matches!(fresh.try_cmp(&drained), Err(SourceError::Exhausted)));
    }
}
