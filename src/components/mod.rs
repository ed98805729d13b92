//! Maud HTML template components for the dashboard.
//!
//! - `layout`: Base page layout and navigation
//! - `badge`: Sentiment and category badges
//! - `alert`: Alert messages and error panels
//! - `card`: Summary cards and the Fear & Greed gauge

pub mod alert;
pub mod badge;
pub mod card;
pub mod layout;

pub use alert::{Alert, AlertVariant};
pub use badge::{CategoryBadge, SentimentBadge};
pub use card::{EmptyState, GaugeCard, StatsCard, StatsCardGrid};
pub use layout::BaseLayout;

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, DOCTYPE};
