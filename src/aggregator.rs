//! Forum aggregation: walk listing pages, pick candidates, classify them.
//!
//! The walk is strictly sequential. Each page's "previous" link is only known
//! after that page is parsed, and one request at a time keeps the forum and
//! model call rates bounded by the page and per-page limits.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::SentimentClassifier;
use crate::config::Config;
use crate::constants::PTT_DOMAIN_MARKER;
use crate::fetcher::PageFetcher;
use crate::models::{AnalyzedArticle, Category, ForumPost};
use crate::ptt::{categorize, extract_article, extract_stock_id, parse_listing, ListingEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("failed to fetch listing page {0}")]
    ListingUnavailable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeUrlError {
    #[error("URL is not a forum article: {0}")]
    InvalidUrl(String),
    #[error("failed to fetch article {0}")]
    FetchFailed(String),
}

/// Limits applied to one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPolicy {
    pub max_pages: usize,
    pub max_posts_per_page: usize,
    pub popularity_threshold: u32,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            max_pages: 3,
            max_posts_per_page: 5,
            popularity_threshold: 20,
        }
    }
}

impl From<&Config> for AggregationPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_pages: config.max_pages,
            max_posts_per_page: config.max_posts_per_page,
            popularity_threshold: config.popularity_threshold,
        }
    }
}

/// Runs forum aggregation and single-article analysis.
#[derive(Clone)]
pub struct ForumAggregator {
    fetcher: PageFetcher,
    classifier: SentimentClassifier,
    policy: AggregationPolicy,
    start_url: String,
}

impl ForumAggregator {
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        classifier: SentimentClassifier,
        policy: AggregationPolicy,
        start_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            policy,
            start_url: start_url.into(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Collect classified posts from the newest listing pages.
    ///
    /// # Errors
    ///
    /// Returns an error only when the first listing page cannot be fetched.
    /// Later pages that fail simply end the walk.
    pub async fn run(&self) -> Result<Vec<ForumPost>, AggregateError> {
        let mut current_page_url = Some(self.start_url.clone());
        let mut pages_visited = 0;
        let mut collected_posts = Vec::new();

        while let Some(page_url) = current_page_url.take() {
            if pages_visited >= self.policy.max_pages {
                break;
            }

            let html = self.fetcher.fetch(&page_url).await;
            if html.is_empty() {
                if pages_visited == 0 {
                    return Err(AggregateError::ListingUnavailable(page_url));
                }
                warn!(url = %page_url, "Listing page unavailable, stopping");
                break;
            }
            pages_visited += 1;

            let page = parse_listing(&html, &page_url);
            let candidates = self.select_candidates(page.entries);
            debug!(
                url = %page_url,
                page = pages_visited,
                candidates = candidates.len(),
                "Processing listing page"
            );

            for candidate in candidates {
                collected_posts.push(self.analyze_candidate(candidate).await);
            }

            current_page_url = page.prev_page_url;
        }

        info!(
            pages = pages_visited,
            posts = collected_posts.len(),
            "Forum aggregation finished"
        );
        Ok(collected_posts)
    }

    /// Keep entries that pass the category filter, up to the per-page cap.
    fn select_candidates(
        &self,
        entries: Vec<ListingEntry>,
    ) -> Vec<(ListingEntry, Category)> {
        entries
            .into_iter()
            .filter_map(|entry| {
                categorize(&entry.title, entry.push_value, self.policy.popularity_threshold)
                    .map(|category| (entry, category))
            })
            .take(self.policy.max_posts_per_page)
            .collect()
    }

    async fn analyze_candidate(
        &self,
        (entry, category): (ListingEntry, Category),
    ) -> ForumPost {
        let html = self.fetcher.fetch(&entry.link).await;
        // An unreachable detail page still yields a post, classified on its title.
        let content = if html.is_empty() {
            String::new()
        } else {
            extract_article(&html).full_text()
        };

        let result = self.classifier.classify(&entry.title, &content).await;

        ForumPost {
            stock_id: extract_stock_id(&entry.title),
            title: entry.title,
            author: entry.author,
            date: entry.date,
            link: entry.link,
            push_count: entry.push_count,
            sentiment: result.sentiment,
            reason: result.reason,
            category,
        }
    }

    /// Deep analysis of a single forum article.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeUrlError::InvalidUrl`] before any network I/O when the
    /// URL is not a forum URL, and [`AnalyzeUrlError::FetchFailed`] when the
    /// page cannot be fetched.
    pub async fn analyze_url(&self, url: &str) -> Result<AnalyzedArticle, AnalyzeUrlError> {
        if !is_forum_url(url) {
            return Err(AnalyzeUrlError::InvalidUrl(url.to_string()));
        }

        let html = self.fetcher.fetch(url).await;
        if html.is_empty() {
            return Err(AnalyzeUrlError::FetchFailed(url.to_string()));
        }

        let article = extract_article(&html);
        let analysis = self
            .classifier
            .classify_deep(&article.title, &article.full_text())
            .await;

        Ok(AnalyzedArticle::new(article.title, analysis))
    }
}

/// Whether `url` points at the forum.
#[must_use]
pub fn is_forum_url(url: &str) -> bool {
    url.contains(PTT_DOMAIN_MARKER)
}
