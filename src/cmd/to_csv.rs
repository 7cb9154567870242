//! CSV export of a parsed log stream.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::csv::CsvWriter;
use crate::parse::ChroniclesSource;
use crate::source::input::{FileSource, LineSource};
use crate::source::LogSource;

/// Arguments for the to-csv subcommand.
#[derive(Args, Debug)]
pub struct ToCsvArgs {
    /// Log file to convert; reads stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Extract the given topics keys into their own CSV columns
    #[arg(long = "extract-fields", value_name = "KEY", num_args = 1..)]
    pub extract_fields: Vec<String>,

    /// Add a column with key KEY and constant value VALUE to every row
    #[arg(long = "constant-column", value_name = "KEY=VALUE", value_parser = super::kv_pair)]
    pub constant_columns: Vec<(String, String)>,
}

pub fn run(args: ToCsvArgs, out: &mut impl Write) -> Result<()> {
    match &args.file {
        Some(path) => write_csv(
            ChroniclesSource::new(FileSource::open(path)?),
            &args,
            out,
        ),
        None => write_csv(
            ChroniclesSource::new(LineSource::new(std::io::stdin().lock())),
            &args,
            out,
        ),
    }
}

fn write_csv(mut source: impl LogSource, args: &ToCsvArgs, out: &mut impl Write) -> Result<()> {
    let mut writer = CsvWriter::new(out);

    let header: Vec<String> = ["timestamp", "line_number", "level", "fields", "count", "message"]
        .iter()
        .map(|column| column.to_string())
        .chain(args.extract_fields.iter().cloned())
        .chain(args.constant_columns.iter().map(|(key, _)| key.clone()))
        .collect();
    writer.write_row(&header)?;

    while let Some(record) = source.next_record()? {
        let fields = record.fields();
        let mut row = vec![
            record.timestamp.to_rfc3339(),
            record.location.ordinal().to_string(),
            record.level.code().to_string(),
            record.topics.clone(),
            record.count.map(|count| count.to_string()).unwrap_or_default(),
            record.message.clone(),
        ];
        row.extend(
            args.extract_fields
                .iter()
                .map(|key| fields.get(key.as_str()).copied().unwrap_or("NA").to_string()),
        );
        row.extend(args.constant_columns.iter().map(|(_, value)| value.clone()));
        writer.write_row(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::input::BufferSource;

    const LINES: &str = "\
INF 2023-01-16 18:30:29.594+00:00 connected peer=16Uiu2 tid=1 count=1
WRN 2023-01-16 18:30:29.595+00:00 dial, failed peer=QmYyQS count=2
";

    fn export(args: &ToCsvArgs) -> Vec<String> {
        let mut out = Vec::new();
        write_csv(
            ChroniclesSource::new(BufferSource::new("test", LINES)),
            args,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_fixed_columns() {
        let rows = export(&ToCsvArgs {
            file: None,
            extract_fields: vec![],
            constant_columns: vec![],
        });
        assert_eq!(rows[0], "timestamp,line_number,level,fields,count,message");
        assert_eq!(
            rows[1],
            "2023-01-16T18:30:29.594+00:00,1,INF,peer=16Uiu2 tid=1,1,connected"
        );
        // Comma in the message gets quoted.
        assert_eq!(
            rows[2],
            "2023-01-16T18:30:29.595+00:00,2,WRN,peer=QmYyQS,2,\"dial, failed\""
        );
    }

    #[test]
    fn test_extracted_and_constant_columns() {
        let rows = export(&ToCsvArgs {
            file: None,
            extract_fields: vec!["peer".to_string(), "tid".to_string()],
            constant_columns: vec![("run".to_string(), "7".to_string())],
        });
        assert_eq!(
            rows[0],
            "timestamp,line_number,level,fields,count,message,peer,tid,run"
        );
        assert!(rows[1].ends_with(",connected,16Uiu2,1,7"), "{}", rows[1]);
        // Missing topics key falls back to NA.
        assert!(rows[2].ends_with(",QmYyQS,NA,7"), "{}", rows[2]);
    }
}
