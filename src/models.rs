//! Domain records produced by the pipelines.
//!
//! Every sentiment-bearing field is a [`Sentiment`]. External strings are
//! normalized through [`Sentiment::normalize`] before they reach these types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one sentiment vocabulary used throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Map any external label onto the canonical enum.
    ///
    /// Accepts both casings used by the forum and podcast responses as well as
    /// the Chinese labels the model sometimes answers with. Anything else is
    /// Neutral.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "bullish" | "bull" | "positive" | "看多" | "偏多" | "多" => Self::Bullish,
            "bearish" | "bear" | "negative" | "看空" | "偏空" | "空" => Self::Bearish,
            _ => Self::Neutral,
        }
    }

    /// Forum wire form (`Bullish`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }

    /// Podcast wire form (`BULLISH`).
    #[must_use]
    pub const fn as_upper(&self) -> &'static str {
        match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
        }
    }

    /// Label shown on the dashboard.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "看多",
            Self::Bearish => "看空",
            Self::Neutral => "中立",
        }
    }

    pub const ALL: [Self; 3] = [Self::Bullish, Self::Bearish, Self::Neutral];
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a forum post was kept by the aggregation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Title carries the target-pick marker.
    Target,
    /// Popular post without the marker.
    Other,
}

/// A classified forum post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub title: String,
    pub author: String,
    pub date: String,
    /// Unique per post.
    pub link: String,
    /// Display string as shown on the board, e.g. `"12"` or `"爆"`.
    pub push_count: String,
    pub stock_id: Option<String>,
    pub sentiment: Sentiment,
    pub reason: String,
    pub category: Category,
}

/// Sentiment plus a short rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub reason: String,
}

/// A representative opinion quoted from an article or its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    #[serde(rename = "type")]
    pub kind: Sentiment,
    pub content: String,
}

/// Output of the deep single-article analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub sentiment: Sentiment,
    pub reason: String,
    pub opinions: Vec<Opinion>,
}

/// [`ArticleAnalysis`] merged with the extracted article title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub title: String,
    pub sentiment: Sentiment,
    pub reason: String,
    pub opinions: Vec<Opinion>,
}

impl AnalyzedArticle {
    #[must_use]
    pub fn new(title: String, analysis: ArticleAnalysis) -> Self {
        Self {
            title,
            sentiment: analysis.sentiment,
            reason: analysis.reason,
            opinions: analysis.opinions,
        }
    }
}

/// A podcast episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub episode_number: String,
}

/// Sentiment toward one company mentioned in an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySentiment {
    pub name: String,
    pub ticker: Option<String>,
    pub sentiment: Sentiment,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastAnalysis {
    pub episode_title: String,
    pub summary_points: Vec<String>,
    pub companies: Vec<CompanySentiment>,
}

/// A web page the model cited while answering a grounded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearAndGreedIndex {
    /// Clamped to `0.0..=100.0`.
    pub score: f64,
    pub rating: String,
    pub timestamp: DateTime<Utc>,
}

impl FearAndGreedIndex {
    #[must_use]
    pub fn new(score: f64, rating: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            rating: rating.into(),
            timestamp,
        }
    }
}
