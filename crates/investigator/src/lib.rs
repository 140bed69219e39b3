//! Coin Sleuth investigation pipeline.
//!
//! One shared entry point wires identity resolution, multi-source
//! aggregation, and evidence normalization together, so interactive and
//! batch callers run the exact same fallback chain.

pub mod aggregator;
pub mod explain;
pub mod normalizer;
pub mod resolver;
pub mod social;
pub mod verdict;

use sleuth_core::api::{
    AlchemyClient, ChainDataSource, CoinGeckoClient, MarketDataSource, RedditClient, RedditSource,
    TwitterClient, TwitterSource,
};
use sleuth_core::config::Config;
use sleuth_core::types::{Evidence, Identity};
use sleuth_core::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use aggregator::Aggregator;
use resolver::IdentityResolver;

/// The outcome of one investigation: who the asset is and what the
/// sources said about it. Built fresh per request; nothing is cached.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Investigation {
    pub identity: Identity,
    pub evidence: Evidence,
}

/// Shared pipeline façade over resolver, aggregator, and normalizer.
pub struct Investigator {
    market: Arc<dyn MarketDataSource>,
    aggregator: Aggregator,
}

impl Investigator {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        chain: Arc<dyn ChainDataSource>,
        reddit: Arc<dyn RedditSource>,
        twitter: Arc<dyn TwitterSource>,
    ) -> Self {
        Self {
            market,
            aggregator: Aggregator::new(chain, reddit, twitter),
        }
    }

    /// Build an investigator with live provider clients.
    pub fn from_config(config: &Config) -> Self {
        let market = Arc::new(CoinGeckoClient::new(
            config.coingecko.base_url.clone(),
            config.coingecko.api_key.clone(),
        ));
        let chain = Arc::new(AlchemyClient::new(config.alchemy.get_rpc_url()));
        let reddit = Arc::new(RedditClient::new(config.reddit.user_agent.clone()));
        let twitter = Arc::new(TwitterClient::new(config.twitter.bearer_token.clone()));

        Self::new(market, chain, reddit, twitter)
            .with_branch_timeout(Duration::from_secs(config.source_timeout_secs))
    }

    pub fn with_branch_timeout(mut self, branch_timeout: Duration) -> Self {
        self.aggregator = self.aggregator.with_branch_timeout(branch_timeout);
        self
    }

    /// Run the full pipeline for one query.
    ///
    /// Only identity resolution can fail; every aggregation branch
    /// degrades to defaults in the returned evidence instead.
    pub async fn investigate(&self, query: &str) -> Result<Investigation> {
        let resolver = IdentityResolver::new(self.market.as_ref());
        let (identity, record) = resolver.resolve(query).await?;
        info!(
            canonical_id = %identity.canonical_id,
            resolved_via = ?identity.resolved_via,
            token_address = ?identity.token_address,
            "Resolved identity"
        );

        let aggregated = self
            .aggregator
            .aggregate(&record, identity.token_address.as_deref())
            .await;
        let evidence = normalizer::normalize(&record, &aggregated);

        Ok(Investigation { identity, evidence })
    }
}
