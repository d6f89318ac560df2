//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to keep code and
//! deployment settings separate. A `.env` file is honoured when present.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default number of history messages handed to the model per turn
pub const DEFAULT_CONTEXT_WINDOW: usize = 20;

/// Default apology sent when the model cannot produce a reply
pub const DEFAULT_FALLBACK_TEXT: &str = "Maaf, saya sedang mengalami gangguan. Bisa ulangi lagi?";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Token signing
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_ttl_hours: i64,

    /// Generative model gateway
    pub llm_provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,

    /// Conversation behaviour
    pub chat_context_window: usize,
    pub chat_fallback_text: String,

    /// Runtime configuration
    pub cors_allowed_origins: String,
    pub log_format: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let chat_context_window = parse_or("CHAT_CONTEXT_WINDOW", DEFAULT_CONTEXT_WINDOW);
        if chat_context_window == 0 {
            return Err(anyhow::anyhow!("CHAT_CONTEXT_WINDOW must be at least 1"));
        }

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            jwt_audience: env::var("JWT_AUDIENCE").ok(),
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 24 * 7),

            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_base_url: env::var("GEMINI_BASE_URL").ok(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            llm_max_tokens: parse_or("LLM_MAX_TOKENS", 1024),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", 30),

            chat_context_window,
            chat_fallback_text: env::var("CHAT_FALLBACK_TEXT")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_TEXT.to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            port: parse_or("PORT", 3000),
        };

        Ok(config)
    }

    /// True when `LOG_FORMAT=json`; anything else means human-readable logs
    pub fn json_logs(&self) -> bool {
        self.log_format.trim().eq_ignore_ascii_case("json")
    }
}

/// Parse an optional variable, falling back to `default` when unset or malformed
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed configuration value");
            default
        }),
        Err(_) => default,
    }
}
