//! Lazy log sources and the transformers that compose them.
//!
//! Every source is a single-pass, forward-only, pull-based sequence: nothing
//! happens until a consumer asks for the next record, and a fully consumed
//! source cannot be restarted (construct a new one for a second pass).
//! Transformers own their upstream source exclusively, so plain `Drop` gives
//! deterministic resource release on every exit path: normal exhaustion,
//! early abandonment by the consumer, or a construction failure.

pub mod collating;
pub mod filtered;
pub mod input;
pub mod lookahead;
pub mod merged;
pub mod ordered;

use crate::error::SourceError;
use crate::record::{LogRecord, RawRecord};

/// Result of one pull: a record, end of sequence, or a failure.
pub type Pull<T> = Result<Option<T>, SourceError>;

/// A source of unparsed log lines.
pub trait RawSource {
    /// Pull the next raw line. `Ok(None)` means the sequence is exhausted.
    fn next_record(&mut self) -> Pull<RawRecord>;
}

/// A source of parsed log records. Implemented by the parser stage and by
/// every transformer, so arbitrary chains compose behind one contract.
pub trait LogSource {
    /// Pull the next record. `Ok(None)` means the sequence is exhausted.
    fn next_record(&mut self) -> Pull<LogRecord>;
}

impl<S: RawSource + ?Sized> RawSource for Box<S> {
    fn next_record(&mut self) -> Pull<RawRecord> {
        (**self).next_record()
    }
}

impl<S: LogSource + ?Sized> LogSource for Box<S> {
    fn next_record(&mut self) -> Pull<LogRecord> {
        (**self).next_record()
    }
}

/// Drain a source to the end, collecting every record.
///
/// Convenience for consumers that want the whole (finite) stream at once;
/// the pipeline itself never buffers like this.
pub fn collect<S: LogSource>(mut source: S) -> Result<Vec<LogRecord>, SourceError> {
    let mut records = Vec::new();
    while let Some(record) = source.next_record()? {
        records.push(record);
    }
    Ok(records)
}
