use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use logweave::cmd;

#[derive(Parser, Debug)]
#[command(name = "logweave")]
#[command(version)]
#[command(about = "Compose, filter and chronologically merge structured log streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge log files chronologically into colored, interleaved output
    Merge(cmd::merge::MergeArgs),
    /// Convert a log stream to CSV, optionally extracting topics into columns
    ToCsv(cmd::to_csv::ToCsvArgs),
    /// Fetch logs from a remote search backend
    Fetch(cmd::fetch::FetchArgs),
}

fn main() -> Result<()> {
    // Diagnostics (skipped lines, cursor cleanup failures) go to stderr; the
    // record stream on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Merge(args) => cmd::merge::run(args, &mut out),
        Command::ToCsv(args) => cmd::to_csv::run(args, &mut out),
        Command::Fetch(args) => cmd::fetch::run(args, &mut out),
    }
}
