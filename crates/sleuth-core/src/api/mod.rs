//! Provider API clients.
//!
//! Each external data source sits behind a trait so the pipeline can be
//! exercised against fakes. The live implementations are thin `reqwest`
//! clients with explicit timeouts; none of them retries, since every
//! caller treats a miss as a degraded-but-valid outcome.

pub mod alchemy;
pub mod coingecko;
pub mod reddit;
pub mod twitter;

pub use alchemy::AlchemyClient;
pub use coingecko::CoinGeckoClient;
pub use reddit::{parse_subreddit_name, RedditClient};
pub use twitter::TwitterClient;

use crate::types::{MarketRecord, OnChainRecord, RedditStats, TwitterStats};
use crate::Result;

/// Primary market-data provider: canonical records and name search.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the full market record for a canonical coin id.
    async fn fetch_coin(&self, id: &str) -> Result<MarketRecord>;

    /// Resolve free text to a canonical coin id.
    async fn search_coin(&self, query: &str) -> Result<String>;
}

/// On-chain token metadata provider.
#[async_trait::async_trait]
pub trait ChainDataSource: Send + Sync {
    async fn fetch_token_metadata(&self, address: &str) -> Result<OnChainRecord>;
}

/// Subreddit statistics provider.
#[async_trait::async_trait]
pub trait RedditSource: Send + Sync {
    async fn fetch_subreddit_stats(&self, subreddit: &str) -> Result<RedditStats>;
}

/// X/Twitter account statistics provider.
///
/// Infallible by contract: every failure mode is encoded in the returned
/// record's `status` tag so the caller can distinguish "no data" from
/// "unavailable by configuration" from "fetch failed".
#[async_trait::async_trait]
pub trait TwitterSource: Send + Sync {
    async fn fetch_user(&self, handle: &str) -> TwitterStats;
}
