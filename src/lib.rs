// Library interface for logweave
// Exposes the record model, source transformers, and command implementations

pub mod cmd;
pub mod csv;
pub mod error;
pub mod palette;
pub mod parse;
pub mod record;
pub mod remote;
pub mod source;
pub mod timearg;
