//! Podcast episode analysis page.

use maud::{html, Markup};

use crate::classifier::PodcastReport;
use crate::components::{Alert, BaseLayout, EmptyState, SentimentBadge};
use crate::models::Episode;

#[must_use]
pub fn render_podcast_page(episode: &Episode, report: &PodcastReport) -> Markup {
    let analysis = &report.analysis;

    let content = html! {
        hgroup {
            h1 { (analysis.episode_title) }
            p { "EP" (episode.episode_number) " · " (episode.date) }
        }

        section {
            h2 { "本集重點" }
            ol {
                @for point in &analysis.summary_points {
                    li { (point) }
                }
            }
        }

        section {
            h2 { "提及公司" }
            @if analysis.companies.is_empty() {
                (EmptyState::new("本集未提及特定公司"))
            } @else {
                table {
                    thead {
                        tr {
                            th { "公司" }
                            th { "代號" }
                            th { "情緒" }
                            th { "理由" }
                        }
                    }
                    tbody {
                        @for company in &analysis.companies {
                            tr {
                                td { (company.name) }
                                td { (company.ticker.as_deref().unwrap_or("-")) }
                                td { (SentimentBadge::new(company.sentiment)) }
                                td { (company.reason) }
                            }
                        }
                    }
                }
            }
        }

        @if !report.sources.is_empty() {
            section {
                h2 { "參考來源" }
                ul {
                    @for source in &report.sources {
                        li {
                            a href=(source.uri) target="_blank" rel="noopener noreferrer" {
                                @if source.title.is_empty() { (source.uri) } @else { (source.title) }
                            }
                        }
                    }
                }
            }
        }
    };

    BaseLayout::new(&analysis.episode_title).render(content)
}

#[must_use]
pub fn render_episode_not_found_page(episode_number: &str) -> Markup {
    let message = format!("找不到第 {episode_number} 集");
    let content = html! {
        h1 { "Podcast" }
        (Alert::error(&message).with_title("404"))
        p { a href="/" { "回到總覽" } }
    };
    BaseLayout::new("找不到集數").render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanySentiment, GroundingSource, PodcastAnalysis, Sentiment};

    fn episode() -> Episode {
        Episode {
            id: "531".to_string(),
            title: "EP531".to_string(),
            date: "2025-01-02".to_string(),
            episode_number: "531".to_string(),
        }
    }

    #[test]
    fn test_podcast_page() {
        let report = PodcastReport {
            analysis: PodcastAnalysis {
                episode_title: "EP531 | 🐳".to_string(),
                summary_points: vec!["重點一".to_string(), "重點二".to_string()],
                companies: vec![CompanySentiment {
                    name: "台積電".to_string(),
                    ticker: Some("2330".to_string()),
                    sentiment: Sentiment::Bullish,
                    reason: "AI".to_string(),
                }],
            },
            sources: vec![GroundingSource {
                title: String::new(),
                uri: "https://news.example.com/a".to_string(),
            }],
        };
        let html = render_podcast_page(&episode(), &report).into_string();

        assert!(html.contains("<li>重點一</li><li>重點二</li>"));
        assert!(html.contains("<td>台積電</td><td>2330</td>"));
        assert!(html.contains("sentiment-bullish"));
        assert!(html.contains(">https://news.example.com/a</a>"));
    }

    #[test]
    fn test_episode_not_found_page() {
        let html = render_episode_not_found_page("999").into_string();
        assert!(html.contains("找不到第 999 集"));
    }
}
