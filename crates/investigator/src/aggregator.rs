//! Multi-source evidence aggregation.
//!
//! Fans out to the on-chain, Reddit, and X sources concurrently. Each
//! branch is independently guarded by a deadline and settles to an
//! explicit outcome; one branch failing can never abort or affect its
//! siblings, and the aggregate always comes back fully shaped.

use sleuth_core::api::{ChainDataSource, RedditSource, TwitterSource};
use sleuth_core::api::parse_subreddit_name;
use sleuth_core::types::{MarketRecord, OnChainRecord, RedditStats, SocialStatus, TwitterStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Settled outcome of one aggregation branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome<T> {
    /// The source answered.
    Ok(T),
    /// The branch never ran; the precondition for calling it was absent.
    Skipped { reason: &'static str },
    /// The branch ran and failed (error, bad payload, or deadline).
    Failed { error: String },
}

impl<T> SourceOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            SourceOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            SourceOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SourceOutcome::Ok(_))
    }
}

/// Result of one aggregation pass. Every branch has its own slot.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub on_chain: SourceOutcome<OnChainRecord>,
    pub reddit: SourceOutcome<RedditStats>,
    pub twitter: SourceOutcome<TwitterStats>,
}

/// Concurrent fan-out over the three secondary sources.
pub struct Aggregator {
    chain: Arc<dyn ChainDataSource>,
    reddit: Arc<dyn RedditSource>,
    twitter: Arc<dyn TwitterSource>,
    branch_timeout: Duration,
}

impl Aggregator {
    pub const DEFAULT_BRANCH_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        chain: Arc<dyn ChainDataSource>,
        reddit: Arc<dyn RedditSource>,
        twitter: Arc<dyn TwitterSource>,
    ) -> Self {
        Self {
            chain,
            reddit,
            twitter,
            branch_timeout: Self::DEFAULT_BRANCH_TIMEOUT,
        }
    }

    pub fn with_branch_timeout(mut self, branch_timeout: Duration) -> Self {
        self.branch_timeout = branch_timeout;
        self
    }

    /// Run all three branches concurrently and join when all have
    /// settled. Never fail-fast.
    pub async fn aggregate(
        &self,
        market: &MarketRecord,
        token_address: Option<&str>,
    ) -> AggregateOutcome {
        let (on_chain, reddit, twitter) = tokio::join!(
            self.fetch_on_chain(token_address),
            self.fetch_reddit(market),
            self.fetch_twitter(market),
        );

        AggregateOutcome {
            on_chain,
            reddit,
            twitter,
        }
    }

    async fn fetch_on_chain(&self, token_address: Option<&str>) -> SourceOutcome<OnChainRecord> {
        let Some(address) = token_address else {
            debug!("No token address resolved, skipping on-chain lookup");
            return SourceOutcome::Skipped {
                reason: "no token address",
            };
        };

        match timeout(self.branch_timeout, self.chain.fetch_token_metadata(address)).await {
            Ok(Ok(record)) => SourceOutcome::Ok(record),
            Ok(Err(e)) => {
                warn!(address, error = %e, "On-chain lookup failed");
                SourceOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    address,
                    timeout_secs = self.branch_timeout.as_secs(),
                    "On-chain lookup timed out"
                );
                SourceOutcome::Failed {
                    error: "timed out".to_string(),
                }
            }
        }
    }

    async fn fetch_reddit(&self, market: &MarketRecord) -> SourceOutcome<RedditStats> {
        let Some(subreddit_url) = market
            .links
            .subreddit_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        else {
            debug!(coin = %market.id, "No subreddit link, skipping Reddit lookup");
            return SourceOutcome::Skipped {
                reason: "no subreddit url",
            };
        };

        let subreddit = parse_subreddit_name(subreddit_url);
        match timeout(
            self.branch_timeout,
            self.reddit.fetch_subreddit_stats(&subreddit),
        )
        .await
        {
            Ok(Ok(stats)) => SourceOutcome::Ok(stats),
            Ok(Err(e)) => {
                warn!(%subreddit, error = %e, "Reddit lookup failed");
                SourceOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    %subreddit,
                    timeout_secs = self.branch_timeout.as_secs(),
                    "Reddit lookup timed out"
                );
                SourceOutcome::Failed {
                    error: "timed out".to_string(),
                }
            }
        }
    }

    async fn fetch_twitter(&self, market: &MarketRecord) -> SourceOutcome<TwitterStats> {
        // Strip a leading `@` and surrounding whitespace before deciding
        // whether a handle exists at all.
        let handle = market
            .links
            .twitter_screen_name
            .as_deref()
            .map(|raw| raw.trim().trim_start_matches('@').trim().to_string())
            .filter(|handle| !handle.is_empty());

        let Some(handle) = handle else {
            debug!(coin = %market.id, "No X handle, skipping X lookup");
            return SourceOutcome::Skipped {
                reason: "no twitter handle",
            };
        };

        match timeout(self.branch_timeout, self.twitter.fetch_user(&handle)).await {
            Ok(stats) => {
                if stats.status != SocialStatus::Ok {
                    debug!(%handle, status = stats.status.as_str(), "X lookup degraded");
                }
                SourceOutcome::Ok(stats)
            }
            Err(_) => {
                warn!(
                    %handle,
                    timeout_secs = self.branch_timeout.as_secs(),
                    "X lookup timed out"
                );
                SourceOutcome::Failed {
                    error: "timed out".to_string(),
                }
            }
        }
    }
}
