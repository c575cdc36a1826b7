use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::feed::GameFeed;
use super::models::{Game, WinProbability};
use super::scoreboard::{parse_scoreboard, parse_win_probability};

pub const DEFAULT_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard";
pub const DEFAULT_SUMMARY_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/summary";

const INITIAL_BACKOFF_MS: u64 = 250;
const MAX_BACKOFF_MS: u64 = 4_000;
const MAX_JITTER_MS: u64 = 100;

/// Client for ESPN's public NBA scoreboard and game summary endpoints.
#[derive(Clone)]
pub struct EspnClient {
    http: Client,
    scoreboard_url: Url,
    summary_url: Url,
    max_retries: u32,
}

enum Attempt {
    Retry(anyhow::Error),
    Fail(anyhow::Error),
}

impl EspnClient {
    pub fn new(
        scoreboard_url: &str,
        summary_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnClient {
            http,
            scoreboard_url: Url::parse(scoreboard_url)
                .with_context(|| format!("Invalid scoreboard URL '{}'", scoreboard_url))?,
            summary_url: Url::parse(summary_url)
                .with_context(|| format!("Invalid summary URL '{}'", summary_url))?,
            max_retries,
        })
    }

    fn scoreboard_request(&self, date: NaiveDate) -> Url {
        let mut url = self.scoreboard_url.clone();
        url.query_pairs_mut()
            .append_pair("dates", &date.format("%Y%m%d").to_string());
        url
    }

    fn summary_request(&self, event_id: &str) -> Url {
        let mut url = self.summary_url.clone();
        url.query_pairs_mut().append_pair("event", event_id);
        url
    }

    /// GET a JSON document, retrying transport failures and 5xx responses
    /// with exponential backoff.
    async fn get_json(&self, url: Url) -> Result<serde_json::Value> {
        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let mut attempt = 0u32;

        loop {
            match self.try_get_json(&url).await {
                Ok(v) => return Ok(v),
                Err(Attempt::Fail(e)) => return Err(e),
                Err(Attempt::Retry(e)) if attempt >= self.max_retries => return Err(e),
                Err(Attempt::Retry(e)) => {
                    attempt += 1;
                    let jitter = rand::thread_rng().gen_range(0..=MAX_JITTER_MS);
                    warn!(
                        "ESPN request failed ({}), retry {}/{} in {}ms",
                        e,
                        attempt,
                        self.max_retries,
                        backoff_ms + jitter
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms + jitter)).await;
                    backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                }
            }
        }
    }

    async fn try_get_json(&self, url: &Url) -> Result<serde_json::Value, Attempt> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .context("ESPN request failed")
            .map_err(Attempt::Retry)?;

        let status = resp.status();
        if !status.is_success() {
            let err = anyhow::anyhow!("ESPN error {} for {}", status, url);
            return Err(if is_retryable(status) {
                Attempt::Retry(err)
            } else {
                Attempt::Fail(err)
            });
        }

        resp.json()
            .await
            .context("Failed to parse ESPN response")
            .map_err(Attempt::Fail)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl GameFeed for EspnClient {
    fn name(&self) -> &str {
        "ESPN"
    }

    async fn fetch_games(&self, date: NaiveDate) -> Result<Vec<Game>> {
        let raw = self
            .get_json(self.scoreboard_request(date))
            .await
            .with_context(|| format!("Failed to fetch scoreboard for {}", date))?;
        Ok(parse_scoreboard(&raw))
    }

    async fn fetch_win_probability(&self, event_id: &str) -> Result<WinProbability> {
        let raw = self
            .get_json(self.summary_request(event_id))
            .await
            .with_context(|| format!("Failed to fetch summary for event {}", event_id))?;
        Ok(parse_win_probability(&raw))
    }
}
