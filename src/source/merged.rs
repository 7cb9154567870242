//! K-way merge of independently time-ordered sources.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use chrono::{DateTime, FixedOffset};

use crate::error::SourceError;
use crate::record::LogRecord;
use crate::source::ordered::Ordered;
use crate::source::{LogSource, Pull};

/// Heap entry: an ordered source plus its comparison key, captured at push
/// time. The key is never re-derived during heap sifting, so a source's
/// advancing lookahead cannot corrupt the heap invariant.
struct Entry<S> {
    key: Reverse<DateTime<FixedOffset>>,
    source: Ordered<S>,
}

impl<S> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<S> Eq for Entry<S> {}

impl<S> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Entry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Merges N ordered sources into one globally timestamp-sorted stream.
///
/// Sources already exhausted at construction are discarded up front; the rest
/// live in a min-heap keyed by their peeked timestamp. Each pull pops the
/// smallest source, takes its record, and re-keys it back into the heap if it
/// still has one, dropping it for good otherwise. Records from any single
/// source keep their relative order. Which source wins an exact timestamp tie
/// is unspecified.
///
/// The merge is itself a [`LogSource`], so merges nest.
pub struct Merged<S> {
    heap: BinaryHeap<Entry<S>>,
}

impl<S: LogSource> Merged<S> {
    pub fn new(sources: impl IntoIterator<Item = Ordered<S>>) -> Self {
        let heap = sources
            .into_iter()
            .filter_map(|source| {
                let key = source.peek().map(|record| record.timestamp)?;
                Some(Entry {
                    key: Reverse(key),
                    source,
                })
            })
            .collect();
        Self { heap }
    }
}

impl<S: LogSource> LogSource for Merged<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        let Some(mut entry) = self.heap.pop() else {
            return Ok(None);
        };

        // Every queued source has a peeked record by construction.
        let record = entry
            .source
            .next_record()?
            .ok_or(SourceError::Exhausted)?;

        if let Some(next) = entry.source.peek() {
            entry.key = Reverse(next.timestamp);
            self.heap.push(entry);
        }

        Ok(Some(record))
    }
}
