//! Podcast episode discovery.
//!
//! The feed URL comes from the iTunes catalog; the feed itself is fetched
//! through an ordered list of network paths, first success wins. Any failure
//! yields the mock episode list, so callers never see an empty result.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{BROWSER_USER_AGENT, MAX_EPISODES};
use crate::models::Episode;

static EPISODE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bEP\.?(\d+)").expect("Invalid regex"));

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("catalog lookup failed: {0}")]
    Lookup(String),
    #[error("catalog has no feed URL for collection {0}")]
    NoFeedUrl(String),
    #[error("all {attempts} feed paths failed")]
    AllPathsFailed { attempts: usize },
    #[error("feed is not valid RSS: {0}")]
    Parse(#[from] rss::Error),
    #[error("feed has no items")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult {
    feed_url: Option<String>,
}

/// One way of reaching the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPath {
    Direct,
    /// Proxy whose prefix is followed by the percent-encoded target URL.
    Proxy(String),
}

impl FeedPath {
    #[must_use]
    pub fn url_for(&self, feed_url: &str) -> String {
        match self {
            Self::Direct => feed_url.to_string(),
            Self::Proxy(prefix) => format!("{prefix}{}", urlencoding::encode(feed_url)),
        }
    }
}

/// Resolves the newest podcast episodes.
#[derive(Clone)]
pub struct EpisodeResolver {
    client: Client,
    lookup_url: String,
    collection_id: String,
    paths: Vec<FeedPath>,
}

impl EpisodeResolver {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        let mut paths = vec![FeedPath::Direct];
        paths.extend(config.feed_proxies.iter().cloned().map(FeedPath::Proxy));

        Ok(Self {
            client,
            lookup_url: config.itunes_lookup_url.clone(),
            collection_id: config.podcast_collection_id.clone(),
            paths,
        })
    }

    /// Newest episodes first, at most ten, never empty.
    pub async fn resolve_episodes(&self) -> Vec<Episode> {
        match self.try_resolve().await {
            Ok(episodes) => {
                info!(count = episodes.len(), "Resolved podcast episodes");
                episodes
            }
            Err(e) => {
                warn!("Episode resolution failed, using mock episodes: {e}");
                mock_episodes()
            }
        }
    }

    async fn try_resolve(&self) -> Result<Vec<Episode>, FeedError> {
        let feed_url = self.lookup_feed_url().await?;
        let body = self.fetch_feed(&feed_url).await?;
        let episodes = parse_feed(&body, Local::now().date_naive())?;
        if episodes.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(episodes)
    }

    async fn lookup_feed_url(&self) -> Result<String, FeedError> {
        let response = self
            .client
            .get(&self.lookup_url)
            .query(&[("id", self.collection_id.as_str()), ("entity", "podcast")])
            .send()
            .await
            .map_err(|e| FeedError::Lookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Lookup(format!("HTTP {}", response.status())));
        }

        // The catalog answers with text/javascript, so decode by hand.
        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Lookup(e.to_string()))?;
        let lookup: LookupResponse =
            serde_json::from_str(&body).map_err(|e| FeedError::Lookup(e.to_string()))?;

        lookup
            .results
            .into_iter()
            .find_map(|r| r.feed_url.filter(|u| !u.is_empty()))
            .ok_or_else(|| FeedError::NoFeedUrl(self.collection_id.clone()))
    }

    /// Try each path in order; the first non-empty successful body wins.
    async fn fetch_feed(&self, feed_url: &str) -> Result<String, FeedError> {
        for path in &self.paths {
            let url = path.url_for(feed_url);
            match self.fetch_text(&url).await {
                Ok(body) if !body.trim().is_empty() => {
                    debug!(path = ?path, "Fetched podcast feed");
                    return Ok(body);
                }
                Ok(_) => warn!(path = ?path, "Feed path returned an empty body"),
                Err(e) => warn!(path = ?path, "Feed path failed: {e}"),
            }
        }
        Err(FeedError::AllPathsFailed {
            attempts: self.paths.len(),
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Parse an RSS document into at most ten episodes in feed order.
///
/// # Errors
///
/// Returns an error if the document is not RSS.
pub fn parse_feed(xml: &str, today: chrono::NaiveDate) -> Result<Vec<Episode>, FeedError> {
    let channel = rss::Channel::read_from(xml.as_bytes())?;
    let items = channel.items();
    let total = items.len();

    let episodes = items
        .iter()
        .take(MAX_EPISODES)
        .enumerate()
        .map(|(index, item)| {
            let title = item.title().unwrap_or_default().trim().to_string();
            let itunes_episode = item.itunes_ext().and_then(|ext| ext.episode());
            let episode_number = episode_number(&title, itunes_episode, total, index);
            let date = item
                .pub_date()
                .and_then(normalize_date)
                .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

            Episode {
                id: episode_number.clone(),
                title,
                date,
                episode_number,
            }
        })
        .collect();

    Ok(episodes)
}

/// `EP<digits>` in the title, then the feed's episode field, then the
/// position counted from the oldest item.
#[must_use]
pub fn episode_number(
    title: &str,
    itunes_episode: Option<&str>,
    total: usize,
    index: usize,
) -> String {
    if let Some(caps) = EPISODE_NUMBER_RE.captures(title) {
        return caps[1].to_string();
    }
    if let Some(ep) = itunes_episode.map(str::trim).filter(|e| !e.is_empty()) {
        return ep.to_string();
    }
    total.saturating_sub(index).to_string()
}

fn normalize_date(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(raw.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()))
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Placeholder list shown when the feed cannot be resolved.
#[must_use]
pub fn mock_episodes() -> Vec<Episode> {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    vec![
        Episode {
            id: "mock-2".to_string(),
            title: "[模擬資料] 無法取得節目清單 (範例集數 2)".to_string(),
            date: today.clone(),
            episode_number: "2".to_string(),
        },
        Episode {
            id: "mock-1".to_string(),
            title: "[模擬資料] 無法取得節目清單 (範例集數 1)".to_string(),
            date: today,
            episode_number: "1".to_string(),
        },
    ]
}

/// Whether an episode came from [`mock_episodes`].
#[must_use]
pub fn is_mock(episode: &Episode) -> bool {
    episode.id.starts_with("mock-")
}
