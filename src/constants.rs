//! Shared constants used across the application.

/// User agent string used for forum and feed requests.
///
/// The forum rejects requests that do not look like a normal browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Age-verification cookie required by age-gated boards.
pub const PTT_AGE_COOKIE: &str = "over18=1";

/// Marker that must appear in a URL for it to be accepted as a forum article.
pub const PTT_DOMAIN_MARKER: &str = "ptt.cc";

/// Title marker for posts nominating a specific security.
pub const TARGET_MARKER: &str = "[標的]";

/// Push-count display token for very active threads.
pub const PUSH_OVERFLOW_TOKEN: &str = "爆";

/// Numeric value the overflow token compares as.
pub const PUSH_OVERFLOW_VALUE: u32 = 100;

/// Placeholder title for articles whose title cannot be found.
pub const UNTITLED_PLACEHOLDER: &str = "無標題";

/// Character budget for content sent to the lightweight classifier.
pub const LIGHT_CONTENT_BUDGET: usize = 2000;

/// Character budget for content sent to the deep classifier.
pub const DEEP_CONTENT_BUDGET: usize = 5000;

/// Most opinions kept per sentiment label in a deep analysis.
pub const MAX_OPINIONS_PER_LABEL: usize = 3;

/// Most episodes returned by the episode resolver.
pub const MAX_EPISODES: usize = 10;

/// Reason attached to a deep analysis that could not be produced.
pub const DEEP_ANALYSIS_FAILED_REASON: &str = "分析失敗";

/// Largest accepted podcast audio upload; inline model attachments are capped near this.
pub const MAX_AUDIO_BYTES: usize = 20 * 1024 * 1024;
