//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tw_market_sentiment::aggregator::{AggregationPolicy, ForumAggregator};
use tw_market_sentiment::classifier::SentimentClassifier;
use tw_market_sentiment::config::Config;
use tw_market_sentiment::fetcher::PageFetcher;
use tw_market_sentiment::llm::{GenerateRequest, Generation, LanguageModel, Llm, LlmError};
use tw_market_sentiment::models::GroundingSource;

/// One canned model answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Grounded(String, Vec<GroundingSource>),
    Fail,
}

/// A language model that answers from a script and records every request.
///
/// Once the script runs out it keeps failing.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(texts.into_iter().map(|t| Reply::Text(t.to_string())))
    }

    pub fn llm(&self) -> Llm {
        Llm::new(self.clone())
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(Generation {
                text,
                sources: Vec::new(),
            }),
            Some(Reply::Grounded(text, sources)) => Ok(Generation { text, sources }),
            Some(Reply::Fail) | None => Err(LlmError::EmptyResponse),
        }
    }
}

/// Configuration with the forum pointed at `server_uri`.
pub fn config_for(server_uri: &str) -> Config {
    Config {
        ptt_base_url: server_uri.to_string(),
        ..Config::for_testing()
    }
}

pub fn aggregator(config: &Config, llm: Llm, policy: AggregationPolicy) -> ForumAggregator {
    let fetcher = PageFetcher::new(config.http_timeout).unwrap();
    let classifier = SentimentClassifier::new(llm, config.podcast_name.clone());
    ForumAggregator::new(fetcher, classifier, policy, config.board_index_url())
}

/// A listing row: `(push, title, href)`. An empty href renders a deleted row.
pub type Row<'a> = (&'a str, &'a str, &'a str);

pub fn listing_page(rows: &[Row], prev_href: Option<&str>) -> String {
    let mut html = String::from(
        r#"<html><head><title>看板 Stock 文章列表 - 批踢踢實業坊</title></head><body>
<div class="action-bar"><div class="btn-group btn-group-paging">
<a class="btn wide" href="/bbs/Stock/index1.html">最舊</a>"#,
    );
    match prev_href {
        Some(href) => html.push_str(&format!(
            r#"<a class="btn wide" href="{href}">&lsaquo; 上頁</a>"#
        )),
        None => html.push_str(r#"<a class="btn wide disabled">&lsaquo; 上頁</a>"#),
    }
    html.push_str(r#"<a class="btn wide disabled">下頁 &rsaquo;</a></div></div><div class="r-list-container">"#);

    for (push, title, href) in rows {
        let title_html = if href.is_empty() {
            format!("({title})")
        } else {
            format!(r#"<a href="{href}">{title}</a>"#)
        };
        html.push_str(&format!(
            r#"<div class="r-ent">
<div class="nrec"><span class="hl f2">{push}</span></div>
<div class="title">{title_html}</div>
<div class="meta"><div class="author">tester</div><div class="date"> 1/02</div></div>
</div>"#
        ));
    }
    html.push_str("</div></body></html>");
    html
}

pub fn article_page(title: &str, body: &str, pushes: &[(&str, &str)]) -> String {
    let push_html: String = pushes
        .iter()
        .map(|(tag, content)| {
            format!(
                r#"<div class="push"><span class="hl push-tag">{tag} </span><span class="f3 hl push-userid">u</span><span class="f3 push-content">: {content}</span><span class="push-ipdatetime"> 01/02 10:00</span></div>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>{title} - 看板 Stock - 批踢踢實業坊</title></head><body>
<div id="main-content" class="bbs-screen bbs-content">
<div class="article-metaline"><span class="article-meta-tag">作者</span><span class="article-meta-value">tester (測試)</span></div>
<div class="article-metaline-right"><span class="article-meta-tag">看板</span><span class="article-meta-value">Stock</span></div>
<div class="article-metaline"><span class="article-meta-tag">標題</span><span class="article-meta-value">{title}</span></div>
<div class="article-metaline"><span class="article-meta-tag">時間</span><span class="article-meta-value">Thu Jan  2 10:00:00 2025</span></div>
{body}
--
{push_html}
</div></body></html>"#
    )
}
