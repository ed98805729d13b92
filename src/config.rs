use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // LLM
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,

    // Forum
    pub ptt_base_url: String,
    pub ptt_board: String,

    // Aggregation policy
    pub max_pages: usize,
    pub max_posts_per_page: usize,
    pub popularity_threshold: u32,

    // Podcast
    pub podcast_name: String,
    pub podcast_collection_id: String,
    pub itunes_lookup_url: String,
    pub feed_proxies: Vec<String>,

    // Fear & Greed
    pub fear_greed_url: String,
    pub fear_greed_mock_fallback: bool,

    // HTTP
    pub http_timeout: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; a missing `GEMINI_API_KEY` is not an error
    /// and leaves the LLM capability absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // LLM
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: env_or_default("GEMINI_MODEL", "gemini-2.5-flash"),
            gemini_api_base: env_or_default(
                "GEMINI_API_BASE",
                "https://generativelanguage.googleapis.com/v1beta",
            ),

            // Forum
            ptt_base_url: env_or_default("PTT_BASE_URL", "https://www.ptt.cc"),
            ptt_board: env_or_default("PTT_BOARD", "Stock"),

            // Aggregation policy
            max_pages: parse_env_usize("AGG_MAX_PAGES", 3)?,
            max_posts_per_page: parse_env_usize("AGG_MAX_POSTS_PER_PAGE", 5)?,
            popularity_threshold: parse_env_u32("AGG_POPULARITY_THRESHOLD", 20)?,

            // Podcast
            podcast_name: env_or_default("PODCAST_NAME", "股癌 Gooaye"),
            podcast_collection_id: env_or_default("PODCAST_COLLECTION_ID", "1500839292"),
            itunes_lookup_url: env_or_default(
                "ITUNES_LOOKUP_URL",
                "https://itunes.apple.com/lookup",
            ),
            feed_proxies: parse_list(&env_or_default(
                "FEED_PROXIES",
                "https://api.allorigins.win/raw?url=,https://corsproxy.io/?",
            )),

            // Fear & Greed
            fear_greed_url: env_or_default(
                "FEAR_GREED_URL",
                "https://production.dataviz.cnn.io/index/fearandgreed/graphdata",
            ),
            fear_greed_mock_fallback: parse_env_bool("FEAR_GREED_MOCK_FALLBACK", true)?,

            // HTTP
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 20)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,
        })
    }

    /// Default policy with every external URL pointing at an unroutable local
    /// port. Tests override the URLs they mock.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_base: "http://127.0.0.1:9/v1beta".to_string(),
            ptt_base_url: "http://127.0.0.1:9".to_string(),
            ptt_board: "Stock".to_string(),
            max_pages: 3,
            max_posts_per_page: 5,
            popularity_threshold: 20,
            podcast_name: "股癌 Gooaye".to_string(),
            podcast_collection_id: "1500839292".to_string(),
            itunes_lookup_url: "http://127.0.0.1:9/lookup".to_string(),
            feed_proxies: Vec::new(),
            fear_greed_url: "http://127.0.0.1:9/graphdata".to_string(),
            fear_greed_mock_fallback: true,
            http_timeout: Duration::from_secs(5),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                name: "AGG_MAX_PAGES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_posts_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                name: "AGG_MAX_POSTS_PER_PAGE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if url::Url::parse(&self.ptt_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "PTT_BASE_URL".to_string(),
                message: format!("not a valid URL: '{}'", self.ptt_base_url),
            });
        }
        if self.ptt_board.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "PTT_BOARD".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// URL of the board's newest listing page.
    #[must_use]
    pub fn board_index_url(&self) -> String {
        format!(
            "{}/bbs/{}/index.html",
            self.ptt_base_url.trim_end_matches('/'),
            self.ptt_board
        )
    }

    /// Whether an API credential for the LLM was provided.
    #[must_use]
    pub fn has_llm_credential(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
