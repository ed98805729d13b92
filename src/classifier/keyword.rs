//! Keyword-count sentiment heuristic used when no model answer is available.

use crate::models::{Sentiment, SentimentResult};

const BULLISH_TERMS: &[&str] = &[
    "看多", "做多", "利多", "偏多", "噴", "漲", "買進", "加碼", "突破", "創新高", "起飛", "多頭",
    "bull", "call", "moon",
];

const BEARISH_TERMS: &[&str] = &[
    "看空", "做空", "利空", "偏空", "崩", "跌", "賣出", "減碼", "破底", "套牢", "逃命", "空頭",
    "bear", "put", "dump",
];

/// Suffix carried by every keyword-derived reason.
pub const KEYWORD_REASON_TAG: &str = "(關鍵字判斷)";

pub const BULLISH_REASON: &str = "看多關鍵字較多 (關鍵字判斷)";
pub const BEARISH_REASON: &str = "看空關鍵字較多 (關鍵字判斷)";
pub const NEUTRAL_REASON: &str = "無明顯多空傾向 (關鍵字判斷)";

/// Classify `text` by counting bullish and bearish term occurrences.
///
/// Matching is case-insensitive substring counting. The side with strictly
/// more hits wins; a tie, including no hits at all, is Neutral.
#[must_use]
pub fn classify_by_keyword(text: &str) -> SentimentResult {
    let folded = text.to_lowercase();
    let bullish = count_terms(&folded, BULLISH_TERMS);
    let bearish = count_terms(&folded, BEARISH_TERMS);

    let (sentiment, reason) = match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => (Sentiment::Bullish, BULLISH_REASON),
        std::cmp::Ordering::Less => (Sentiment::Bearish, BEARISH_REASON),
        std::cmp::Ordering::Equal => (Sentiment::Neutral, NEUTRAL_REASON),
    };

    SentimentResult {
        sentiment,
        reason: reason.to_string(),
    }
}

/// Whether a reason string came from [`classify_by_keyword`].
#[must_use]
pub fn is_keyword_reason(reason: &str) -> bool {
    reason.ends_with(KEYWORD_REASON_TAG)
}

fn count_terms(text: &str, terms: &[&str]) -> usize {
    terms.iter().map(|term| text.matches(term).count()).sum()
}
