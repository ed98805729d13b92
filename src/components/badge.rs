//! Badge components for sentiment labels and post categories.

use maud::{html, Markup, Render};

use crate::models::{Category, Sentiment};

/// A colored badge showing a sentiment label.
#[derive(Debug, Clone, Copy)]
pub struct SentimentBadge {
    pub sentiment: Sentiment,
}

impl SentimentBadge {
    #[must_use]
    pub const fn new(sentiment: Sentiment) -> Self {
        Self { sentiment }
    }

    /// Get the CSS class for this sentiment.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.sentiment {
            Sentiment::Bullish => "sentiment-badge sentiment-bullish",
            Sentiment::Bearish => "sentiment-badge sentiment-bearish",
            Sentiment::Neutral => "sentiment-badge sentiment-neutral",
        }
    }
}

impl Render for SentimentBadge {
    fn render(&self) -> Markup {
        html! {
            span class=(self.css_class()) title=(self.sentiment.as_str()) {
                (self.sentiment.label())
            }
        }
    }
}

/// Why a post made it into the results.
#[derive(Debug, Clone, Copy)]
pub struct CategoryBadge {
    pub category: Category,
}

impl CategoryBadge {
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self { category }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.category {
            Category::Target => "標的",
            Category::Other => "熱門",
        }
    }
}

impl Render for CategoryBadge {
    fn render(&self) -> Markup {
        html! {
            span class="category-badge" { (self.label()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_badge_classes() {
        let html = SentimentBadge::new(Sentiment::Bullish).render().into_string();
        assert!(html.contains("sentiment-bullish"));
        assert!(html.contains("看多"));
        assert!(html.contains(r#"title="Bullish""#));

        let html = SentimentBadge::new(Sentiment::Bearish).render().into_string();
        assert!(html.contains("sentiment-bearish"));
        assert!(html.contains("看空"));

        let html = SentimentBadge::new(Sentiment::Neutral).render().into_string();
        assert!(html.contains("sentiment-neutral"));
    }

    #[test]
    fn test_category_badge_labels() {
        assert_eq!(CategoryBadge::new(Category::Target).label(), "標的");
        let html = CategoryBadge::new(Category::Other).render().into_string();
        assert_eq!(html, r#"<span class="category-badge">熱門</span>"#);
    }
}
