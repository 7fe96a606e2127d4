//! Synchronous client for the **UK coronavirus dashboard API (v1)**.
//!
//! This module talks to the `data` endpoint, which takes two parameters:
//! - `filters`: `;`-joined `key=value` pairs selecting areas (e.g. `areaType=nation`)
//! - `structure`: a JSON object mapping *output* names to *source* metric names
//!
//! Records are returned under `data`; `pagination.next` is `null` on the last page
//! and an HTTP `204 No Content` means the query matched nothing.
//!
//! ### Notes
//! - No retry: a failed request aborts the whole fetch.
//! - No total timeout unless configured through [`ClientOptions::timeout`].
//!
//! Typical usage:
//! ```no_run
//! # use ukvax::Client;
//! let client = Client::default();
//! let rows = client.fetch_vaccinations()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::VaccinationRecord;
use anyhow::{Context, Result};
use log::{debug, info};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Public endpoint root; `/data` is appended per request.
pub const DEFAULT_BASE_URL: &str = "https://api.coronavirus.data.gov.uk/v1";

/// Default cap on pages walked per query.
pub const MAX_PAGES: u32 = 1000;

/// API-level failures (transport errors are surfaced by `reqwest` as-is).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with HTTP {status} for {url}")]
    Http { status: u16, url: String },
    #[error("unexpected response shape: {0}")]
    Malformed(String),
    #[error("page limit exceeded ({0})")]
    PageLimit(u32),
}

/// A structured query: area filters plus the output-name → source-field mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<String>,
    pub structure: Vec<(String, String)>,
}

impl Query {
    pub fn new<F, S, K, V>(filters: F, structure: S) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        S: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
            structure: structure
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Per-nation cumulative first/second dose counts, shaped for [`VaccinationRecord`].
    pub fn nations_vaccinations() -> Self {
        Self::new(
            ["areaType=nation"],
            [
                ("Date", "date"),
                ("Name", "areaName"),
                ("First", "cumPeopleVaccinatedFirstDoseByPublishDate"),
                ("Second", "cumPeopleVaccinatedSecondDoseByPublishDate"),
            ],
        )
    }

    /// The `structure` parameter as compact JSON.
    pub fn structure_json(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .structure
            .iter()
            .map(|(out, src)| (out.clone(), Value::String(src.clone())))
            .collect();
        Value::Object(map).to_string()
    }

    /// Build the request URL for one page (1-based).
    pub fn to_url(&self, base_url: &str, page: u32) -> String {
        let filters = self
            .filters
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/data?filters={}&structure={}&format=json&page={}",
            base_url.trim_end_matches('/'),
            enc(&filters),
            enc(&self.structure_json()),
            page
        )
    }
}

// Allow -, _, . unescaped (common in metric names)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SAFE).to_string()
}

/// One decoded response page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// `true` while `pagination.next` points at another page.
    pub has_next: bool,
}

/// Decode one response body into typed records.
///
/// ### Errors
/// - body is not an object or lacks a `data` array ([`ApiError::Malformed`])
/// - a record does not match `T`
pub fn parse_page<T: DeserializeOwned>(body: Value) -> Result<Page<T>> {
    let obj = body
        .as_object()
        .ok_or_else(|| ApiError::Malformed("not a top-level object".into()))?;
    let data = obj
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Malformed("missing `data` array".into()))?;

    let records = data
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            serde_json::from_value::<T>(rec.clone()).with_context(|| format!("parse record {i}"))
        })
        .collect::<Result<Vec<T>>>()?;

    let has_next = obj
        .get("pagination")
        .and_then(|p| p.get("next"))
        .map(|n| !n.is_null())
        .unwrap_or(false);

    Ok(Page { records, has_next })
}

/// Knobs for [`Client::with_options`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Total per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Give up with [`ApiError::PageLimit`] past this many pages.
    pub max_pages: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            max_pages: MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    max_pages: u32,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_options(ClientOptions::default()).expect("reqwest client build")
    }
}

impl Client {
    pub fn with_options(opts: ClientOptions) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(opts.timeout) // None disables the blocking client's default
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("ukvax/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: opts.base_url,
            max_pages: opts.max_pages,
            http,
        })
    }

    /// Fetch every record matching `query`, walking pages until `pagination.next` is null.
    ///
    /// ### Errors
    /// - Network error (no retry)
    /// - HTTP status outside 2xx ([`ApiError::Http`])
    /// - JSON decoding / shape errors
    /// - More than [`ClientOptions::max_pages`] pages ([`ApiError::PageLimit`])
    pub fn fetch_records<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let mut out: Vec<T> = Vec::new();
        let mut page = 1u32;
        loop {
            if page > self.max_pages {
                return Err(ApiError::PageLimit(self.max_pages).into());
            }
            let url = query.to_url(&self.base_url, page);
            debug!("GET {url}");

            let resp = self
                .http
                .get(&url)
                .send()
                .with_context(|| format!("GET {url}"))?;
            let status = resp.status();
            if status == StatusCode::NO_CONTENT {
                debug!("page {page}: no content");
                break;
            }
            if !status.is_success() {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    url,
                }
                .into());
            }

            let body: Value = resp
                .json()
                .with_context(|| format!("decode json from {url}"))?;
            let parsed: Page<T> = parse_page(body).with_context(|| format!("page {page}"))?;
            debug!("page {page}: {} records", parsed.records.len());
            out.extend(parsed.records);

            if !parsed.has_next {
                break;
            }
            page += 1;
        }
        Ok(out)
    }

    /// Fetch per-nation cumulative first/second dose counts.
    pub fn fetch_vaccinations(&self) -> Result<Vec<VaccinationRecord>> {
        let rows: Vec<VaccinationRecord> =
            self.fetch_records(&Query::nations_vaccinations())?;
        info!("fetched {} nation/day rows", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_filters_and_structure() {
        let url = Query::nations_vaccinations().to_url("https://example.test/v1/", 2);
        assert!(url.starts_with("https://example.test/v1/data?filters=areaType%3Dnation&"));
        assert!(url.contains("structure=%7B%22Date%22%3A%22date%22"));
        assert!(url.contains("cumPeopleVaccinatedFirstDoseByPublishDate"));
        assert!(url.ends_with("&format=json&page=2"));
    }

    #[test]
    fn multiple_filters_are_semicolon_joined() {
        let q = Query::new(["areaType=nation", " areaName=Wales "], [("Date", "date")]);
        let url = q.to_url(DEFAULT_BASE_URL, 1);
        assert!(url.contains("filters=areaType%3Dnation%3BareaName%3DWales&"));
    }

    #[test]
    fn structure_json_maps_output_to_source() {
        let q = Query::new(Vec::<String>::new(), [("Name", "areaName")]);
        assert_eq!(q.structure_json(), r#"{"Name":"areaName"}"#);
    }

    #[test]
    fn client_keeps_base_url() {
        let c = Client::with_options(ClientOptions {
            base_url: "http://localhost:1".into(),
            timeout: Some(Duration::from_secs(1)),
            ..ClientOptions::default()
        })
        .unwrap();
        assert_eq!(c.base_url, "http://localhost:1");
    }
}
