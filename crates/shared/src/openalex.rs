use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::models::WorkRecord;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// OpenAlex refuses `per-page` values above this.
pub const MAX_PER_PAGE: u32 = 200;

/// Fields requested from `/works`; nothing else is needed downstream.
const SELECT_FIELDS: &str = "id,title,doi,publication_date,authorships,primary_location";

/// Bounds for a single topic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkQuery {
    pub days_back: u32,
    pub max_results: u32,
}

impl Default for WorkQuery {
    fn default() -> Self {
        Self {
            days_back: 30,
            max_results: 20,
        }
    }
}

impl WorkQuery {
    pub fn new(days_back: u32, max_results: u32) -> Result<Self> {
        if max_results == 0 || max_results > MAX_PER_PAGE {
            return Err(FeedError::config(format!(
                "max results must be between 1 and {}, got {}",
                MAX_PER_PAGE, max_results
            )));
        }
        Ok(Self {
            days_back,
            max_results,
        })
    }

    /// Earliest publication date included when querying on `today`.
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(chrono::Days::new(u64::from(self.days_back)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// The `filter` parameter: topic membership, date floor, no paratext.
    pub fn filter(&self, topic_id: &str, today: NaiveDate) -> String {
        format!(
            "topics.id:{},from_publication_date:{},is_paratext:false",
            topic_id,
            self.since(today).format("%Y-%m-%d")
        )
    }
}

/// Anything that can produce the recent works for a topic.
#[allow(async_fn_in_trait)]
pub trait WorkSource {
    async fn fetch_recent(&self, topic_id: &str, query: &WorkQuery) -> Result<Vec<WorkRecord>>;
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

pub struct OpenAlexClient {
    client: Client,
    base_url: String,
}

impl OpenAlexClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| FeedError::config(format!("failed to create HTTP client: {e}")))?;

        let base_url = config.openalex_base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| FeedError::config(format!("invalid OpenAlex base URL {base_url:?}: {e}")))?;

        Ok(Self { client, base_url })
    }

    async fn fetch_page(&self, topic_id: &str, query: &WorkQuery) -> Result<Vec<WorkRecord>> {
        let filter = query.filter(topic_id, Utc::now().date_naive());
        let per_page = query.max_results.to_string();
        let url = Url::parse_with_params(
            &format!("{}/works", self.base_url),
            &[
                ("filter", filter.as_str()),
                ("sort", "publication_date:desc"),
                ("per-page", per_page.as_str()),
                ("select", SELECT_FIELDS),
            ],
        )
        .map_err(|e| FeedError::fetch_failed(topic_id, format!("bad request URL: {e}")))?;
        debug!(%url, "querying OpenAlex");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::fetch_failed(topic_id, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(FeedError::fetch_failed(
                topic_id,
                format!("OpenAlex returned {} - {}", status, error_text.trim()),
            ));
        }

        let body = response
            .json::<WorksResponse>()
            .await
            .map_err(|e| FeedError::fetch_failed(topic_id, format!("bad response body: {e}")))?;

        Ok(parse_results(topic_id, body.results))
    }
}

impl WorkSource for OpenAlexClient {
    async fn fetch_recent(&self, topic_id: &str, query: &WorkQuery) -> Result<Vec<WorkRecord>> {
        self.fetch_page(topic_id, query).await
    }
}

/// Decode each result on its own so one record without an `id` does not
/// cost the whole page.
fn parse_results(topic_id: &str, results: Vec<serde_json::Value>) -> Vec<WorkRecord> {
    results
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<WorkRecord>(value) {
            Ok(work) if !work.id.trim().is_empty() => Some(work),
            Ok(_) => {
                warn!(topic_id, index, "skipping work with empty id");
                None
            }
            Err(e) => {
                warn!(topic_id, index, error = %e, "skipping undecodable work");
                None
            }
        })
        .collect()
}
