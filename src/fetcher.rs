//! Page fetching for forum pages.
//!
//! Failures never escape this module: every error is logged and turned into
//! an empty body, which callers treat as "unavailable".

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::Client;
use tracing::{debug, warn};

use crate::constants::{BROWSER_USER_AGENT, PTT_AGE_COOKIE};

/// HTTP client that looks like a browser that already passed the age gate.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(PTT_AGE_COOKIE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-TW,zh;q=0.9,en;q=0.8"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build forum HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a page body, returning an empty string on any failure.
    pub async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!(url = %url, bytes = body.len(), "Fetched page");
                body
            }
            Err(e) => {
                warn!(url = %url, "Failed to fetch page: {e:#}");
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {status}");
        }

        response.text().await.context("Failed to read body")
    }
}
