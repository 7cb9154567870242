//! Chronological merge of local log files.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use colored::Colorize;

use crate::palette::ColorMap;
use crate::parse::ChroniclesSource;
use crate::record::Location;
use crate::source::filtered::{timestamp_range, Filtered};
use crate::source::input::FileSource;
use crate::source::merged::Merged;
use crate::source::ordered::Ordered;
use crate::source::LogSource;
use crate::timearg::parse_time_arg;

/// Arguments for the merge subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Log files to merge
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Aliases to print instead of the file names, matched to files in
    /// order; excess aliases are ignored
    #[arg(long = "alias", value_name = "ALIAS")]
    pub aliases: Vec<String>,

    /// Only show entries at or after this date/time
    #[arg(long, value_name = "WHEN", value_parser = parse_time_arg)]
    pub from: Option<DateTime<Utc>>,

    /// Only show entries at or before this date/time
    #[arg(long, value_name = "WHEN", value_parser = parse_time_arg)]
    pub to: Option<DateTime<Utc>>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: MergeArgs, out: &mut impl Write) -> Result<()> {
    let aliases = assign_aliases(&args.files, &args.aliases);
    let bounds = time_bounds(args.from, args.to);

    // Colors are fixed up front, in file order, so output coloring does not
    // depend on which source happens to win the first merge round.
    let mut colors = ColorMap::new();
    for path in &args.files {
        colors.color_for(&aliases[&file_name(path)]);
    }

    let mut sources = Vec::new();
    for path in &args.files {
        let parsed = ChroniclesSource::new(FileSource::open(path)?);
        let source: Box<dyn LogSource> = match bounds {
            Some((start, end)) => Box::new(Filtered::new(parsed, timestamp_range(start, end))),
            None => Box::new(parsed),
        };
        sources.push(Ordered::new(source)?);
    }

    // A single file needs no merge stage.
    let mut stream: Box<dyn LogSource> = if sources.len() == 1 {
        Box::new(sources.pop().expect("exactly one source"))
    } else {
        Box::new(Merged::new(sources))
    };

    while let Some(record) = stream.next_record()? {
        let name = match &record.location {
            Location::File { path, .. } => file_name(path),
            other => other.to_string(),
        };
        let alias = aliases.get(&name).cloned().unwrap_or(name);
        let line = format!("{}: {}", alias, record.raw);
        if args.no_color {
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}", line.color(colors.color_for(&alias)))?;
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Map each file name to its display alias, right-padded to equal width.
fn assign_aliases(files: &[PathBuf], aliases: &[String]) -> HashMap<String, String> {
    let mut named: Vec<(String, String)> = files
        .iter()
        .map(|path| {
            let name = file_name(path);
            (name.clone(), name)
        })
        .collect();
    for (entry, alias) in named.iter_mut().zip(aliases) {
        entry.1 = alias.clone();
    }

    let width = named.iter().map(|(_, alias)| alias.len()).max().unwrap_or(0);
    named
        .into_iter()
        .map(|(name, alias)| (name, format!("{:>width$}", alias)))
        .collect()
}

/// Resolve the optional bounds into a concrete inclusive range, if any
/// filtering was requested at all. Open ends widen to the epoch floor and to
/// the present.
fn time_bounds(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    if from.is_none() && to.is_none() {
        return None;
    }
    let start = from.unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = to.unwrap_or_else(Utc::now);
    Some((start.fixed_offset(), end.fixed_offset()))
}
