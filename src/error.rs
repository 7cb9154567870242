//! Error types for logweave sources.
//!
//! Unparseable lines are deliberately NOT represented here: they are data
//! noise, recovered locally by the parser stage (skip + diagnostic). This
//! module covers the two failure classes that must reach the caller.

use std::fmt;

/// Error produced while pulling from or composing log sources.
#[derive(Debug)]
pub enum SourceError {
    /// Ordering misuse: a source with no peeked element was used as a merge
    /// comparison operand. Indicates a caller bug, not bad data.
    Exhausted,

    /// The underlying resource (file, stream, remote cursor) could not be
    /// opened or read. Propagated uninterpreted; the core never retries.
    Resource {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SourceError {
    /// Wrap an underlying error with a short description of what was being
    /// attempted.
    pub fn resource(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SourceError::Resource {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Exhausted => {
                write!(f, "cannot order a source that has run out of records")
            }
            SourceError::Resource { context, source } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Resource { source, .. } => Some(source.as_ref()),
            SourceError::Exhausted => None,
        }
    }
}
