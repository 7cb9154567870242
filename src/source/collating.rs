//! Concatenation of sources without reordering.

use std::collections::VecDeque;

use crate::record::LogRecord;
use crate::source::{LogSource, Pull};

/// Drains each source fully, in the order given, before moving to the next.
/// No interleaving: use this when global time order across sources is not
/// wanted or not derivable. Exhausted sources are dropped as soon as they
/// run dry, releasing whatever they hold.
pub struct Collating<S> {
    sources: VecDeque<S>,
}

impl<S: LogSource> Collating<S> {
    pub fn new(sources: impl IntoIterator<Item = S>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }
}

impl<S: LogSource> LogSource for Collating<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        while let Some(current) = self.sources.front_mut() {
            if let Some(record) = current.next_record()? {
                return Ok(Some(record));
            }
            self.sources.pop_front();
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ChroniclesSource;
    use crate::source::collect;
    use crate::source::input::BufferSource;

    fn source(name: &str, lines: &str) -> ChroniclesSource<BufferSource> {
        ChroniclesSource::new(BufferSource::new(name, lines))
    }

    #[test]
    fn test_concatenates_in_argument_order() {
        // Second source is chronologically earlier; collation must not care.
        let collated = Collating::new(vec![
            source(
                "late",
                "INF 2023-01-16 18:30:29.650+00:00 a count=1\n\
                 INF 2023-01-16 18:30:29.651+00:00 b count=2\n",
            ),
            source("early", "INF 2023-01-16 18:30:29.100+00:00 c count=3\n"),
        ]);
        let counts: Vec<_> = collect(collated)
            .unwrap()
            .iter()
            .map(|r| r.count.unwrap())
            .collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_skips_empty_sources() {
        let collated = Collating::new(vec![
            source("empty", ""),
            source("one", "INF 2023-01-16 18:30:29.100+00:00 c count=7\n"),
            source("empty-too", ""),
        ]);
        let records = collect(collated).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, Some(7));
    }

    #[test]
    fn test_no_sources() {
        let mut collated: Collating<ChroniclesSource<BufferSource>> = Collating::new(vec![]);
        assert!(collated.next_record().unwrap().is_none());
    }
}
