use std::env;

use anyhow::{Context, Result};

/// Standard T20 innings length
pub const DEFAULT_TOTAL_OVERS: u32 = 20;

/// Settings the pure statistics code needs; passed in, never global
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    /// Innings length used when the match format is unknown
    pub default_total_overs: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            default_total_overs: DEFAULT_TOTAL_OVERS,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: String,

    /// Cricbuzz site root, used for listing and match pages
    pub cricbuzz_base_url: String,

    /// ESPN scoreboard header feed URL
    pub espn_scoreboard_url: String,

    /// Sport ID ESPN uses for cricket
    pub espn_cricket_sport_id: String,

    /// User-Agent sent to upstream sites
    pub user_agent: String,

    /// Timeout in seconds for upstream requests
    pub http_timeout: u64,

    /// Innings length assumed when the format is unknown
    pub default_total_overs: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            cricbuzz_base_url: env::var("CRICBUZZ_BASE_URL")
                .unwrap_or_else(|_| "https://www.cricbuzz.com".to_string()),

            espn_scoreboard_url: env::var("ESPN_SCOREBOARD_URL").unwrap_or_else(|_| {
                "https://site.api.espn.com/apis/personalized/v2/scoreboard/header".to_string()
            }),

            espn_cricket_sport_id: env::var("ESPN_CRICKET_SPORT_ID")
                .unwrap_or_else(|_| "200".to_string()),

            user_agent: env::var("HTTP_USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string()
            }),

            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a valid number")?,

            default_total_overs: env::var("DEFAULT_TOTAL_OVERS")
                .unwrap_or_else(|_| DEFAULT_TOTAL_OVERS.to_string())
                .parse()
                .context("DEFAULT_TOTAL_OVERS must be a valid number")?,
        })
    }

    pub fn rate_config(&self) -> RateConfig {
        RateConfig {
            default_total_overs: self.default_total_overs,
        }
    }
}
