//! Remote log source backed by a scroll-paginated search API.
//!
//! The backend is an Elasticsearch-style HTTP endpoint: an initial `_search`
//! opens a server-side scroll cursor, continuation requests drain it page by
//! page, and the cursor must be deleted when the client is done with it.
//! This source conforms to the same pull contract as every local source:
//! single forward pass, and the cursor is cleared on every exit path
//! (exhaustion, a mid-stream failure, or the consumer dropping the source
//! early). Failed calls are never retried.

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::SourceError;
use crate::record::{Location, RawRecord};
use crate::source::{Pull, RawSource};

const SCROLL_KEEPALIVE: &str = "2m";
const DEFAULT_PAGE_SIZE: usize = 5_000;

/// What to fetch, and from where.
pub struct RemoteConfig {
    pub base_url: String,
    /// Index name or pattern to search, e.g. `logs-*`.
    pub index: String,
    /// Restrict to these origins (e.g. pod names). Empty means all.
    pub origins: Vec<String>,
    pub run_id: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub page_size: usize,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            index: index.into(),
            origins: Vec::new(),
            run_id: None,
            start: None,
            end: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sorted, optionally filtered search request body.
fn build_query(config: &RemoteConfig) -> Value {
    let mut filters = Vec::new();

    if config.start.is_some() || config.end.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(start) = config.start {
            range.insert(
                "gte".to_string(),
                start.to_rfc3339_opts(SecondsFormat::Millis, true).into(),
            );
        }
        if let Some(end) = config.end {
            range.insert(
                "lte".to_string(),
                end.to_rfc3339_opts(SecondsFormat::Millis, true).into(),
            );
        }
        filters.push(json!({ "range": { "@timestamp": range } }));
    }

    if !config.origins.is_empty() {
        filters.push(json!({ "terms": { "origin.keyword": config.origins } }));
    }

    if let Some(run_id) = &config.run_id {
        filters.push(json!({ "term": { "run_id.keyword": run_id } }));
    }

    let query = if filters.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "filter": filters } })
    };

    json!({
        "size": config.page_size,
        "sort": [{ "@timestamp": "asc" }],
        "query": query,
    })
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Deserialize)]
struct HitSource {
    message: String,
    origin: String,
    #[serde(default)]
    run_id: String,
}

/// Raw records from the remote backend, in server-side timestamp order.
pub struct ScrollSource {
    client: Client,
    base_url: String,
    index: String,
    query: Value,
    scroll_id: Option<String>,
    done: bool,
    buffered: VecDeque<RawRecord>,
    offset: u64,
}

impl ScrollSource {
    /// Build the source. No network traffic happens until the first pull.
    pub fn open(config: RemoteConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .build()
            .map_err(|err| SourceError::resource("failed to build http client", err))?;
        let query = build_query(&config);
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            index: config.index,
            query,
            scroll_id: None,
            done: false,
            buffered: VecDeque::new(),
            offset: 0,
        })
    }

    /// Fetch the next page into the buffer; an empty page ends the scroll.
    fn fetch_page(&mut self) -> Result<(), SourceError> {
        let response = match &self.scroll_id {
            None => {
                let url = format!(
                    "{}/{}/_search?scroll={}",
                    self.base_url, self.index, SCROLL_KEEPALIVE
                );
                self.request(&url, &self.query)?
            }
            Some(id) => {
                let url = format!("{}/_search/scroll", self.base_url);
                let body = json!({ "scroll": SCROLL_KEEPALIVE, "scroll_id": id });
                self.request(&url, &body)?
            }
        };

        if let Some(id) = response.scroll_id {
            self.scroll_id = Some(id);
        }

        if response.hits.hits.is_empty() {
            self.done = true;
            self.clear_scroll();
            return Ok(());
        }

        for hit in response.hits.hits {
            self.buffered.push_back(RawRecord {
                location: Location::Remote {
                    index: hit.index,
                    offset: self.offset,
                    origin: hit.source.origin,
                    run_id: hit.source.run_id,
                },
                raw: hit.source.message,
            });
            self.offset += 1;
        }
        Ok(())
    }

    fn request(&self, url: &str, body: &Value) -> Result<SearchResponse, SourceError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| SourceError::resource(format!("failed to reach {}", url), err))?
            .error_for_status()
            .map_err(|err| SourceError::resource("remote search failed", err))?;
        response
            .json()
            .map_err(|err| SourceError::resource("malformed remote response", err))
    }

    /// Delete the server-side cursor, if one is open. Best effort: the
    /// cursor expires on its own after the keepalive anyway.
    fn clear_scroll(&mut self) {
        if let Some(id) = self.scroll_id.take() {
            let url = format!("{}/_search/scroll", self.base_url);
            let result = self
                .client
                .delete(&url)
                .json(&json!({ "scroll_id": id }))
                .send();
            if let Err(err) = result {
                debug!("failed to clear remote scroll cursor: {}", err);
            }
        }
    }
}

impl RawSource for ScrollSource {
    fn next_record(&mut self) -> Pull<RawRecord> {
        loop {
            if let Some(record) = self.buffered.pop_front() {
                return Ok(Some(record));
            }
            if self.done {
                return Ok(None);
            }
            self.fetch_page()?;
        }
    }
}

impl Drop for ScrollSource {
    fn drop(&mut self) {
        self.clear_scroll();
    }
}
