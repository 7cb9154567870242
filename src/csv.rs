//! Minimal CSV row writer (RFC 4180 quoting).
//!
//! Small enough on purpose: quote a field only when it contains a comma,
//! quote, or line break, and double embedded quotes.

use std::borrow::Cow;
use std::io::{self, Write};

pub struct CsvWriter<W> {
    out: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one row. Fields are escaped as needed.
    pub fn write_row<I>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.out.write_all(b",")?;
            }
            first = false;
            self.out.write_all(escape(field.as_ref()).as_bytes())?;
        }
        self.out.write_all(b"\n")
    }
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> String {
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).write_row(fields).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_fields_pass_through() {
        assert_eq!(row(&["a", "b", "c"]), "a,b,c\n");
    }

    #[test]
    fn test_comma_and_newline_quoted() {
        assert_eq!(row(&["a,b", "c\nd"]), "\"a,b\",\"c\nd\"\n");
    }

    #[test]
    fn test_quotes_doubled() {
        assert_eq!(row(&[r#"say "hi""#]), "\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(row(&["", "x", ""]), ",x,\n");
    }
}
