//! Card components for summaries and the Fear & Greed gauge.

use maud::{html, Markup, Render};

use crate::models::FearAndGreedIndex;

/// A single labelled number.
#[derive(Debug, Clone)]
pub struct StatsCard<'a> {
    pub label: &'a str,
    pub value: String,
}

impl<'a> StatsCard<'a> {
    #[must_use]
    pub fn new(label: &'a str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

impl Render for StatsCard<'_> {
    fn render(&self) -> Markup {
        html! {
            article class="stats-card" {
                header { (self.label) }
                h2 { (self.value) }
            }
        }
    }
}

/// A responsive grid of [`StatsCard`]s.
#[derive(Debug, Clone)]
pub struct StatsCardGrid<'a> {
    pub cards: Vec<StatsCard<'a>>,
}

impl<'a> StatsCardGrid<'a> {
    #[must_use]
    pub const fn new(cards: Vec<StatsCard<'a>>) -> Self {
        Self { cards }
    }
}

impl Render for StatsCardGrid<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="stats-grid" {
                @for card in &self.cards {
                    (card)
                }
            }
        }
    }
}

/// The Fear & Greed index as a horizontal gauge.
#[derive(Debug, Clone)]
pub struct GaugeCard<'a> {
    pub index: &'a FearAndGreedIndex,
}

impl<'a> GaugeCard<'a> {
    #[must_use]
    pub const fn new(index: &'a FearAndGreedIndex) -> Self {
        Self { index }
    }
}

impl Render for GaugeCard<'_> {
    fn render(&self) -> Markup {
        let index = self.index;
        let marker_style = format!("left: calc({:.1}% - 0.125rem);", index.score);

        html! {
            article class="gauge-card" {
                header { "CNN Fear & Greed Index" }
                h2 {
                    (format!("{:.0}", index.score))
                    " "
                    small { (index.rating) }
                }
                div class="gauge" {
                    div class="gauge-marker" style=(marker_style) {}
                }
                footer {
                    small { "更新時間：" (index.timestamp.format("%Y-%m-%d %H:%M UTC")) }
                }
            }
        }
    }
}

/// Shown in place of an empty list.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}
