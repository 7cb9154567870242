//! Fetch logs for one or more origins from the remote search backend.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;

use crate::palette::ColorMap;
use crate::record::Location;
use crate::remote::{RemoteConfig, ScrollSource};
use crate::source::RawSource;
use crate::timearg::parse_time_arg;

const DEFAULT_URL: &str = "http://localhost:9200";

/// Arguments for the fetch subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Origins (e.g. pod names) to fetch logs for
    #[arg(long = "origin", value_name = "NAME", required = true)]
    pub origins: Vec<String>,

    /// Base URL of the search backend; falls back to $LOGWEAVE_URL, then
    /// localhost:9200
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Index name or pattern to search
    #[arg(long, value_name = "INDEX", default_value = "logs-*")]
    pub index: String,

    /// Restrict to entries from a single run
    #[arg(long = "run-id", value_name = "ID")]
    pub run_id: Option<String>,

    /// Only fetch entries at or after this date/time
    #[arg(long, value_name = "WHEN", value_parser = parse_time_arg)]
    pub from: Option<DateTime<Utc>>,

    /// Only fetch entries at or before this date/time
    #[arg(long, value_name = "WHEN", value_parser = parse_time_arg)]
    pub to: Option<DateTime<Utc>>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: FetchArgs, out: &mut impl Write) -> Result<()> {
    let url = args
        .url
        .clone()
        .or_else(|| std::env::var("LOGWEAVE_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let mut config = RemoteConfig::new(url, args.index.clone());
    config.origins = args.origins.clone();
    config.run_id = args.run_id.clone();
    config.start = args.from.map(|when| when.fixed_offset());
    config.end = args.to.map(|when| when.fixed_offset());

    let mut colors = ColorMap::new();
    for origin in &args.origins {
        colors.color_for(origin);
    }

    let mut source = ScrollSource::open(config)?;
    while let Some(record) = source.next_record()? {
        let origin = match &record.location {
            Location::Remote { origin, .. } => origin.as_str(),
            _ => "unknown",
        };
        let line = format!("[{}]: {}", origin, record.raw);
        if args.no_color {
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}", line.color(colors.color_for(origin)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;
    use std::thread;

    #[test]
    fn test_prints_origin_prefixed_lines() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let url = format!("http://{}", server.server_addr().to_ip().unwrap());

        let backend = thread::spawn(move || {
            let pages = [
                json!({
                    "_scroll_id": "cursor-1",
                    "hits": { "hits": [
                        { "_index": "logs-2023.01.16", "_source": {
                            "message": "INF 2023-01-16 18:30:29.594+00:00 up count=1",
                            "origin": "node-1",
                            "run_id": "run-1",
                        }},
                    ]},
                })
                .to_string(),
                json!({ "_scroll_id": "cursor-1", "hits": { "hits": [] } }).to_string(),
                "{}".to_string(),
            ];
            for body in pages {
                let mut request = server.recv().unwrap();
                let mut payload = String::new();
                request.as_reader().read_to_string(&mut payload).unwrap();
                request.respond(tiny_http::Response::from_string(body)).unwrap();
            }
        });

        let mut out = Vec::new();
        run(
            FetchArgs {
                origins: vec!["node-1".to_string()],
                url: Some(url),
                index: "logs-*".to_string(),
                run_id: None,
                from: None,
                to: None,
                no_color: true,
            },
            &mut out,
        )
        .unwrap();
        backend.join().unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[node-1]: INF 2023-01-16 18:30:29.594+00:00 up count=1\n"
        );
    }
}
