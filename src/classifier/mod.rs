//! LLM-backed sentiment classification.
//!
//! Every entry point here is infallible. Model errors, empty answers and
//! malformed JSON all collapse into a documented fallback value, so callers
//! always get a well-typed record.

pub mod keyword;
mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use keyword::classify_by_keyword;

use crate::constants::{
    DEEP_ANALYSIS_FAILED_REASON, DEEP_CONTENT_BUDGET, LIGHT_CONTENT_BUDGET,
    MAX_OPINIONS_PER_LABEL,
};
use crate::llm::parse::{parse_json, truncate_chars, ParseOutcome};
use crate::llm::{GenerateRequest, Llm};
use crate::models::{
    ArticleAnalysis, CompanySentiment, Episode, GroundingSource, Opinion, PodcastAnalysis,
    Sentiment, SentimentResult,
};

/// Summary shown when a podcast analysis could not be produced.
pub const PODCAST_UNAVAILABLE: &str = "目前無法取得本集分析";

// ── Wire shapes (validated before entering the domain) ──────────────

#[derive(Debug, Deserialize)]
struct RawSentiment {
    sentiment: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct RawOpinion {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawArticleAnalysis {
    sentiment: String,
    reason: String,
    opinions: Vec<RawOpinion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPodcastAnalysis {
    #[serde(default)]
    episode_title: String,
    #[serde(default)]
    summary_points: Vec<String>,
    #[serde(default)]
    companies: Vec<RawCompany>,
}

#[derive(Debug, Deserialize)]
struct RawCompany {
    #[serde(default)]
    name: String,
    /// Models sometimes answer with a bare number.
    #[serde(default)]
    ticker: Option<serde_json::Value>,
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    reason: String,
}

/// A podcast analysis together with the pages the model cited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodcastReport {
    pub analysis: PodcastAnalysis,
    pub sources: Vec<GroundingSource>,
}

/// Sentiment classifier over the injected LLM capability.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    llm: Llm,
    podcast_name: String,
}

impl SentimentClassifier {
    #[must_use]
    pub fn new(llm: Llm, podcast_name: impl Into<String>) -> Self {
        Self {
            llm,
            podcast_name: podcast_name.into(),
        }
    }

    #[must_use]
    pub fn llm(&self) -> &Llm {
        &self.llm
    }

    /// Lightweight classification of a forum post.
    ///
    /// Falls back to [`classify_by_keyword`] over the title when the model is
    /// absent or its answer cannot be used.
    pub async fn classify(&self, title: &str, content: &str) -> SentimentResult {
        if !self.llm.is_available() {
            return classify_by_keyword(title);
        }

        let content = truncate_chars(content, LIGHT_CONTENT_BUDGET);
        let request = GenerateRequest::new(prompts::light_prompt(title, content))
            .with_schema(prompts::light_schema());

        let generation = match self.llm.generate(request).await {
            Ok(g) => g,
            Err(e) => {
                warn!(title = %title, "Classification request failed, using keywords: {e}");
                return classify_by_keyword(title);
            }
        };

        match parse_json::<RawSentiment>(&generation.text) {
            ParseOutcome::Parsed(raw) if !raw.reason.trim().is_empty() => SentimentResult {
                sentiment: Sentiment::normalize(&raw.sentiment),
                reason: raw.reason.trim().to_string(),
            },
            ParseOutcome::Parsed(_) => {
                warn!(title = %title, "Classification has a blank reason, using keywords");
                classify_by_keyword(title)
            }
            ParseOutcome::ParseError(raw) => {
                warn!(title = %title, raw = %raw, "Unparseable classification, using keywords");
                classify_by_keyword(title)
            }
        }
    }

    /// Full analysis of one article with representative opinions.
    ///
    /// Falls back to `{Neutral, "分析失敗", []}`.
    pub async fn classify_deep(&self, title: &str, content: &str) -> ArticleAnalysis {
        let content = truncate_chars(content, DEEP_CONTENT_BUDGET);
        let request = GenerateRequest::new(prompts::deep_prompt(title, content))
            .with_schema(prompts::deep_schema());

        let generation = match self.llm.generate(request).await {
            Ok(g) => g,
            Err(e) => {
                warn!(title = %title, "Deep analysis request failed: {e}");
                return failed_article_analysis();
            }
        };

        match parse_json::<RawArticleAnalysis>(&generation.text) {
            ParseOutcome::Parsed(raw) if !raw.reason.trim().is_empty() => ArticleAnalysis {
                sentiment: Sentiment::normalize(&raw.sentiment),
                reason: raw.reason.trim().to_string(),
                opinions: cap_opinions(raw.opinions),
            },
            ParseOutcome::Parsed(_) => {
                warn!(title = %title, "Deep analysis has a blank reason");
                failed_article_analysis()
            }
            ParseOutcome::ParseError(raw) => {
                warn!(title = %title, raw = %raw, "Unparseable deep analysis");
                failed_article_analysis()
            }
        }
    }

    /// Summarize an episode using web search.
    pub async fn analyze_episode(&self, episode: &Episode) -> PodcastReport {
        let request =
            GenerateRequest::new(prompts::episode_prompt(&self.podcast_name, episode)).grounded();
        self.run_podcast_request(request, &episode.title).await
    }

    /// Summarize an uploaded episode recording.
    pub async fn analyze_audio(&self, mime_type: &str, audio: Vec<u8>) -> PodcastReport {
        let request = GenerateRequest::new(prompts::audio_prompt())
            .with_schema(prompts::podcast_schema())
            .with_attachment(mime_type, audio);
        self.run_podcast_request(request, "上傳音檔").await
    }

    async fn run_podcast_request(&self, request: GenerateRequest, fallback_title: &str) -> PodcastReport {
        let generation = match self.llm.generate(request).await {
            Ok(g) => g,
            Err(e) => {
                warn!(episode = %fallback_title, "Podcast analysis request failed: {e}");
                return unavailable_podcast_report(fallback_title);
            }
        };

        match parse_json::<RawPodcastAnalysis>(&generation.text) {
            ParseOutcome::Parsed(raw) => {
                debug!(
                    episode = %fallback_title,
                    companies = raw.companies.len(),
                    sources = generation.sources.len(),
                    "Podcast analysis parsed"
                );
                PodcastReport {
                    analysis: podcast_from_raw(raw, fallback_title),
                    sources: generation.sources,
                }
            }
            ParseOutcome::ParseError(raw) => {
                warn!(episode = %fallback_title, raw = %raw, "Unparseable podcast analysis");
                unavailable_podcast_report(fallback_title)
            }
        }
    }
}

#[must_use]
pub fn failed_article_analysis() -> ArticleAnalysis {
    ArticleAnalysis {
        sentiment: Sentiment::Neutral,
        reason: DEEP_ANALYSIS_FAILED_REASON.to_string(),
        opinions: Vec::new(),
    }
}

fn unavailable_podcast_report(title: &str) -> PodcastReport {
    PodcastReport {
        analysis: PodcastAnalysis {
            episode_title: title.to_string(),
            summary_points: vec![PODCAST_UNAVAILABLE.to_string()],
            companies: Vec::new(),
        },
        sources: Vec::new(),
    }
}

/// Normalize labels, drop empty opinions and keep at most three per label.
fn cap_opinions(raw: Vec<RawOpinion>) -> Vec<Opinion> {
    let mut counts = [0usize; 3];
    let mut opinions = Vec::new();

    for item in raw {
        let content = item.content.trim();
        if content.is_empty() {
            continue;
        }
        let kind = Sentiment::normalize(&item.kind);
        let slot = Sentiment::ALL
            .iter()
            .position(|s| *s == kind)
            .unwrap_or(2);
        if counts[slot] >= MAX_OPINIONS_PER_LABEL {
            continue;
        }
        counts[slot] += 1;
        opinions.push(Opinion {
            kind,
            content: content.to_string(),
        });
    }

    opinions
}

fn ticker_text(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn podcast_from_raw(raw: RawPodcastAnalysis, fallback_title: &str) -> PodcastAnalysis {
    let episode_title = if raw.episode_title.trim().is_empty() {
        fallback_title.to_string()
    } else {
        raw.episode_title.trim().to_string()
    };

    let summary_points = raw
        .summary_points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let companies = raw
        .companies
        .into_iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| CompanySentiment {
            name: c.name.trim().to_string(),
            ticker: c.ticker.and_then(|t| ticker_text(&t)),
            sentiment: Sentiment::normalize(&c.sentiment),
            reason: c.reason.trim().to_string(),
        })
        .collect();

    PodcastAnalysis {
        episode_title,
        summary_points,
        companies,
    }
}
