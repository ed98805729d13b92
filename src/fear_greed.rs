//! CNN Fear & Greed index retrieval.
//!
//! The dataviz endpoint is tried first. When it fails and a model is
//! configured, the index is looked up through grounded search instead.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::BROWSER_USER_AGENT;
use crate::llm::parse::{parse_json, ParseOutcome};
use crate::llm::{GenerateRequest, Llm};
use crate::models::FearAndGreedIndex;

const SEARCH_PROMPT: &str = r#"請上網查詢 CNN Fear & Greed Index（恐懼與貪婪指數）目前的數值。
只輸出一個 JSON 物件，不要加上 markdown 標記或任何說明文字，格式如下：
{"score": 50, "rating": "Neutral"}
score 為 0 到 100 的數字，rating 為 CNN 使用的英文評級（Extreme Fear、Fear、Neutral、Greed、Extreme Greed）。"#;

#[derive(Debug, Deserialize)]
struct GraphData {
    fear_and_greed: CurrentIndex,
}

#[derive(Debug, Deserialize)]
struct CurrentIndex {
    score: f64,
    rating: String,
    #[serde(default)]
    timestamp: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchedIndex {
    score: f64,
    #[serde(default)]
    rating: String,
}

/// Retrieves the current Fear & Greed index.
#[derive(Clone)]
pub struct FearGreedRetriever {
    client: Client,
    url: String,
    llm: Llm,
}

impl FearGreedRetriever {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config, llm: Llm) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build Fear & Greed HTTP client")?;

        Ok(Self {
            client,
            url: config.fear_greed_url.clone(),
            llm,
        })
    }

    /// Current index, or `None` when every source failed.
    pub async fn fetch_index(&self) -> Option<FearAndGreedIndex> {
        match self.fetch_direct().await {
            Ok(index) => return Some(index),
            Err(e) => warn!(url = %self.url, "Fear & Greed endpoint failed: {e:#}"),
        }

        if !self.llm.is_available() {
            return None;
        }

        let request = GenerateRequest::new(SEARCH_PROMPT).grounded();
        let generation = match self.llm.generate(request).await {
            Ok(g) => g,
            Err(e) => {
                warn!("Fear & Greed search failed: {e}");
                return None;
            }
        };

        match parse_json::<SearchedIndex>(&generation.text) {
            ParseOutcome::Parsed(found) => {
                debug!(score = found.score, "Fear & Greed index found by search");
                let rating = if found.rating.trim().is_empty() {
                    rating_for_score(found.score).to_string()
                } else {
                    title_case(&found.rating)
                };
                Some(FearAndGreedIndex::new(found.score, rating, Utc::now()))
            }
            ParseOutcome::ParseError(raw) => {
                warn!(raw = %raw, "Unparseable Fear & Greed search result");
                None
            }
        }
    }

    async fn fetch_direct(&self) -> Result<FearAndGreedIndex> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .header("Referer", "https://edition.cnn.com/")
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {status}");
        }

        let data: GraphData = response.json().await.context("Unexpected response shape")?;
        let current = data.fear_and_greed;
        let timestamp = current
            .timestamp
            .as_ref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        Ok(FearAndGreedIndex::new(
            current.score,
            title_case(&current.rating),
            timestamp,
        ))
    }
}

/// Neutral placeholder for when no source answered.
#[must_use]
pub fn mock_index() -> FearAndGreedIndex {
    FearAndGreedIndex::new(50.0, "Neutral", Utc::now())
}

/// CNN's rating bands.
#[must_use]
pub fn rating_for_score(score: f64) -> &'static str {
    match score {
        s if s < 25.0 => "Extreme Fear",
        s if s < 45.0 => "Fear",
        s if s <= 55.0 => "Neutral",
        s if s <= 75.0 => "Greed",
        _ => "Extreme Greed",
    }
}

fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    }
}

fn title_case(rating: &str) -> String {
    rating
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
