//! PTT aggregation results page.

use maud::{html, Markup};

use crate::components::{
    Alert, BaseLayout, CategoryBadge, EmptyState, SentimentBadge, StatsCard, StatsCardGrid,
};
use crate::models::{ForumPost, Sentiment};

#[must_use]
pub fn render_ptt_page(posts: &[ForumPost]) -> Markup {
    let count = |s: Sentiment| posts.iter().filter(|p| p.sentiment == s).count();
    let stats = StatsCardGrid::new(vec![
        StatsCard::new("文章數", posts.len()),
        StatsCard::new(Sentiment::Bullish.label(), count(Sentiment::Bullish)),
        StatsCard::new(Sentiment::Bearish.label(), count(Sentiment::Bearish)),
        StatsCard::new(Sentiment::Neutral.label(), count(Sentiment::Neutral)),
    ]);

    let content = html! {
        h1 { "PTT Stock 板情緒" }
        (stats)
        @if posts.is_empty() {
            (EmptyState::new("目前沒有符合條件的文章"))
        } @else {
            table {
                thead {
                    tr {
                        th { "分類" }
                        th { "推文" }
                        th { "標題" }
                        th { "代號" }
                        th { "情緒" }
                        th { "理由" }
                    }
                }
                tbody {
                    @for post in posts {
                        tr {
                            td { (CategoryBadge::new(post.category)) }
                            td { (post.push_count) }
                            td {
                                a href=(post.link) target="_blank" rel="noopener noreferrer" { (post.title) }
                                br;
                                small { (post.author) " · " (post.date) " · " }
                                small {
                                    a href=(format!("/analyze?url={}", urlencoding::encode(&post.link))) { "深入分析" }
                                }
                            }
                            td { (post.stock_id.as_deref().unwrap_or("-")) }
                            td { (SentimentBadge::new(post.sentiment)) }
                            td { (post.reason) }
                        }
                    }
                }
            }
        }
    };

    BaseLayout::new("PTT 情緒").render(content)
}

#[must_use]
pub fn render_ptt_error_page() -> Markup {
    let content = html! {
        h1 { "PTT Stock 板情緒" }
        (Alert::error("無法取得 PTT 資料，請稍後再試").with_title("錯誤"))
    };
    BaseLayout::new("PTT 情緒").render(content)
}
