//! Single-article deep analysis page.

use maud::{html, Markup};

use crate::aggregator::AnalyzeUrlError;
use crate::components::{Alert, BaseLayout, EmptyState, SentimentBadge};
use crate::models::{AnalyzedArticle, Sentiment};

/// Render the analysis form, plus the result when a URL was submitted.
#[must_use]
pub fn render_analyze_page(
    url: &str,
    result: Option<&Result<AnalyzedArticle, AnalyzeUrlError>>,
) -> Markup {
    let content = html! {
        h1 { "PTT 文章分析" }
        form method="get" action="/analyze" {
            fieldset role="group" {
                input
                    type="url"
                    name="url"
                    value=(url)
                    placeholder="https://www.ptt.cc/bbs/Stock/M.xxxxxxxxxx.A.xxx.html"
                    required;
                button type="submit" { "分析" }
            }
        }
        @match result {
            None => {}
            Some(Err(AnalyzeUrlError::InvalidUrl(_))) => {
                (Alert::error("請輸入 PTT 文章網址").with_title("無效的網址"))
            }
            Some(Err(AnalyzeUrlError::FetchFailed(_))) => {
                (Alert::error("無法取得文章內容，請確認網址是否正確").with_title("錯誤"))
            }
            Some(Ok(article)) => (render_article(article)),
        }
    };

    BaseLayout::new("文章分析").render(content)
}

fn render_article(article: &AnalyzedArticle) -> Markup {
    html! {
        article {
            header {
                h2 { (article.title) }
                (SentimentBadge::new(article.sentiment))
                " "
                (article.reason)
            }
            @for sentiment in Sentiment::ALL {
                @let opinions: Vec<_> = article.opinions.iter().filter(|o| o.kind == sentiment).collect();
                h3 { (sentiment.label()) "觀點" }
                @if opinions.is_empty() {
                    (EmptyState::new("無"))
                } @else {
                    ul {
                        @for opinion in opinions {
                            li { (opinion.content) }
                        }
                    }
                }
            }
        }
    }
}
