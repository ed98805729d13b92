//! Home page: Fear & Greed gauge and the latest podcast episodes.

use maud::{html, Markup};

use crate::components::{Alert, BaseLayout, EmptyState, GaugeCard};
use crate::models::{Episode, FearAndGreedIndex};
use crate::podcast::is_mock;

#[must_use]
pub fn render_home_page(index: Option<&FearAndGreedIndex>, episodes: &[Episode]) -> Markup {
    let content = html! {
        h1 { "台股市場情緒" }

        section {
            @match index {
                Some(index) => (GaugeCard::new(index)),
                None => (Alert::error("目前無法取得 Fear & Greed 指數").with_title("錯誤")),
            }
        }

        section {
            h2 { "Podcast 最新集數" }
            @if episodes.iter().any(is_mock) {
                (Alert::warning("無法取得節目清單，以下為模擬資料").with_title("注意"))
            }
            @if episodes.is_empty() {
                (EmptyState::new("目前沒有集數"))
            } @else {
                table {
                    thead {
                        tr {
                            th { "集數" }
                            th { "標題" }
                            th { "日期" }
                        }
                    }
                    tbody {
                        @for episode in episodes {
                            tr {
                                td { "EP" (episode.episode_number) }
                                td {
                                    a href=(format!("/podcast/{}", urlencoding::encode(&episode.episode_number))) {
                                        (episode.title)
                                    }
                                }
                                td { (episode.date) }
                            }
                        }
                    }
                }
            }
        }
    };

    BaseLayout::new("總覽").render(content)
}
