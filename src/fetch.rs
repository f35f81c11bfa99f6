//! Aggregated error-stats fetch against the dashboard's internal flush API.

use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::http;
use crate::records::ErrorRecord;
use crate::window::TimeWindow;

/// Stats endpoint under the dashboard base URL.
const STATS_PATH: &str = "/yard/api/flush";
/// Project code the aggregation endpoint expects.
const PROJECT_CODE: u32 = 10;
/// Single fixed-size page; the tool never paginates further.
const PAGE_SIZE: u32 = 1000;

/// Body of the flush POST. The shape is fixed apart from the window bounds;
/// a unit test pins the serialized field set.
#[derive(Debug, Serialize)]
pub struct StatsQuery {
    #[serde(rename = "type")]
    query_type: &'static str,
    path: &'static str,
    pcode: u32,
    params: StatsParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsParams {
    stime: i64,
    etime: i64,
    ptotal: u32,
    skip: u32,
    psize: u32,
    filter: serde_json::Map<String, serde_json::Value>,
    order: &'static str,
    #[serde(rename = "type")]
    record_type: &'static str,
    text_length: u32,
    oids: Vec<u64>,
}

impl StatsQuery {
    /// Aggregated error-count query for the window, ordered by count.
    pub fn for_window(window: &TimeWindow) -> Self {
        Self {
            query_type: "stat",
            path: "ap",
            pcode: PROJECT_CODE,
            params: StatsParams {
                stime: window.start_ms,
                etime: window.end_ms,
                ptotal: 100,
                skip: 0,
                psize: PAGE_SIZE,
                filter: serde_json::Map::new(),
                order: "count",
                record_type: "error",
                text_length: 0,
                oids: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    /// A missing upstream key means an empty result, not a malformed body.
    #[serde(default)]
    pub records: Vec<ErrorRecord>,
}

#[derive(Debug)]
pub enum FetchError {
    /// The endpoint answered with something other than 200.
    Status { status: StatusCode },
    /// The request or body read ran past the heavy timeout.
    Timeout,
    /// The request failed at the transport level.
    Transport { source: reqwest::Error },
    /// The response body did not decode as a stats payload.
    Body { source: reqwest::Error },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status } => write!(f, "stats endpoint returned HTTP {status}"),
            Self::Timeout => write!(f, "stats request timed out"),
            Self::Transport { source } => write!(f, "stats request failed: {source}"),
            Self::Body { source } => {
                write!(f, "could not decode stats response: {source}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source } | Self::Body { source } => Some(source),
            Self::Status { .. } | Self::Timeout => None,
        }
    }
}

/// POST the aggregation query for `window` and decode the response.
///
/// Must run on an authenticated session client; the dashboard answers the
/// flush API with a login redirect otherwise.
///
/// # Errors
///
/// Returns [`FetchError::Status`] on any non-200 answer,
/// [`FetchError::Timeout`] when the heavy timeout elapses, and
/// [`FetchError::Transport`]/[`FetchError::Body`] for send and decode
/// failures.
pub fn fetch_stats(
    client: &Client,
    base_url: &str,
    window: &TimeWindow,
) -> Result<StatsResponse, FetchError> {
    let url = format!("{base_url}{STATS_PATH}");
    tracing::debug!(
        "fetching stats for window {}..{}",
        window.start_ms,
        window.end_ms
    );

    let resp = client
        .post(&url)
        .timeout(std::time::Duration::from_secs(http::HEAVY_TIMEOUT_SECS))
        .json(&StatsQuery::for_window(window))
        .send()
        .map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport { source }
            }
        })?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status { status });
    }

    resp.json::<StatsResponse>().map_err(|source| {
        if source.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body { source }
        }
    })
}
