//! Configuration management for the Coin Sleuth system.
//!
//! All configuration is read once at startup and handed to the clients
//! explicitly; nothing reads the environment mid-investigation.

use serde::Deserialize;
use std::env;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub coingecko: CoinGeckoConfig,
    pub alchemy: AlchemyConfig,
    pub reddit: RedditConfig,
    pub twitter: TwitterConfig,
    /// Deadline applied to each aggregation branch, in seconds.
    pub source_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlchemyConfig {
    pub rpc_url: Option<String>,
    pub api_key: Option<String>,
}

impl AlchemyConfig {
    pub fn get_rpc_url(&self) -> Option<String> {
        self.rpc_url.clone().or_else(|| {
            self.api_key
                .as_ref()
                .map(|key| format!("https://eth-mainnet.g.alchemy.com/v2/{}", key))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub user_agent: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            user_agent: "CoinSleuth/0.1 (by /u/coin_sleuth_bot)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TwitterConfig {
    /// App-only bearer token for the X API v2. Absent means the twitter
    /// branch reports `api_not_configured` instead of calling out.
    pub bearer_token: Option<String>,
}

impl Config {
    pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            coingecko: CoinGeckoConfig {
                base_url: env::var("COINGECKO_BASE_URL").ok(),
                api_key: env::var("COINGECKO_API_KEY").ok(),
            },
            alchemy: AlchemyConfig {
                rpc_url: env::var("ALCHEMY_RPC_URL").ok(),
                api_key: env::var("ALCHEMY_API_KEY").ok(),
            },
            reddit: RedditConfig {
                user_agent: env::var("REDDIT_USER_AGENT")
                    .unwrap_or_else(|_| RedditConfig::default().user_agent),
            },
            twitter: TwitterConfig {
                bearer_token: env::var("X_BEARER_TOKEN")
                    .ok()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            },
            source_timeout_secs: env::var("SOURCE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_SOURCE_TIMEOUT_SECS),
        }
    }

    /// Configuration for testing (no credentials, default timeouts).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            coingecko: CoinGeckoConfig {
                base_url: None,
                api_key: None,
            },
            alchemy: AlchemyConfig {
                rpc_url: None,
                api_key: None,
            },
            reddit: RedditConfig::default(),
            twitter: TwitterConfig::default(),
            source_timeout_secs: Self::DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }
}
