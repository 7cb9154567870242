//! Input sources: where raw lines actually come from.
//!
//! `LineSource` does the line splitting over any buffered reader; `FileSource`
//! and `BufferSource` wrap it with richer provenance. File handles are
//! released when the source is dropped, whether or not it was drained.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::record::{Location, RawRecord};
use crate::source::{Pull, RawSource};

/// Generic line-splitting source over any buffered reader. Yields records
/// located by their 1-based line number.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    line: u64,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }
}

impl<R: BufRead> RawSource for LineSource<R> {
    fn next_record(&mut self) -> Pull<RawRecord> {
        let mut raw = String::new();
        match self.reader.read_line(&mut raw) {
            Ok(0) => Ok(None),
            Ok(_) => {
                self.line += 1;
                // Strip the line terminator; printers re-add their own.
                if raw.ends_with('\n') {
                    raw.pop();
                    if raw.ends_with('\r') {
                        raw.pop();
                    }
                }
                Ok(Some(RawRecord {
                    location: Location::Line { line: self.line },
                    raw,
                }))
            }
            Err(err) => Err(SourceError::resource(
                format!("failed to read line {}", self.line + 1),
                err,
            )),
        }
    }
}

/// Raw lines from a file on disk, located by path and line number.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    inner: LineSource<BufReader<File>>,
}

impl FileSource {
    /// Open a log file. Fails up front if the file cannot be opened; the
    /// handle is owned by this source and closed when it is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|err| {
            SourceError::resource(format!("failed to open {}", path.display()), err)
        })?;
        Ok(Self {
            path,
            inner: LineSource::new(BufReader::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSource for FileSource {
    fn next_record(&mut self) -> Pull<RawRecord> {
        let Some(record) = self.inner.next_record()? else {
            return Ok(None);
        };
        Ok(Some(RawRecord {
            location: Location::File {
                path: self.path.clone(),
                line: record.location.ordinal(),
            },
            raw: record.raw,
        }))
    }
}

/// Raw lines from a named in-memory buffer. Useful for tests and for callers
/// that already hold log text.
pub struct BufferSource {
    name: String,
    inner: LineSource<Cursor<String>>,
}

impl BufferSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: LineSource::new(Cursor::new(contents.into())),
        }
    }
}

impl RawSource for BufferSource {
    fn next_record(&mut self) -> Pull<RawRecord> {
        let Some(record) = self.inner.next_record()? else {
            return Ok(None);
        };
        Ok(Some(RawRecord {
            location: Location::Buffer {
                name: self.name.clone(),
                line: record.location.ordinal(),
            },
            raw: record.raw,
        }))
    }
}
