//! CLI subcommand implementations.
//!
//! Each command is thin glue: build a source chain from the arguments, pull
//! records, print. All record access is read-only.

pub mod fetch;
pub mod merge;
pub mod to_csv;

/// Parse a `KEY=VALUE` argument into its two halves.
pub(crate) fn kv_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("'{}' is not a valid KEY=VALUE pair", raw)),
    }
}
