//! Identity resolution.
//!
//! Turns a user-supplied name or id into a canonical coin identity plus
//! the best-known token contract address, including the wrapped-token
//! fallback search for assets that are not natively on Ethereum.

use sleuth_core::api::MarketDataSource;
use sleuth_core::types::{Identity, MarketRecord, ResolvedVia};
use sleuth_core::{Error, Result};
use tracing::{debug, info};

/// Resolves free-text queries against the market-data source.
pub struct IdentityResolver<'a> {
    market: &'a dyn MarketDataSource,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(market: &'a dyn MarketDataSource) -> Self {
        Self { market }
    }

    /// Resolve a query to an identity and its market record.
    ///
    /// Tries the query directly as a canonical id first, then falls back
    /// to name search. Failure of both paths is fatal; everything in the
    /// wrapped-token path is absorbed.
    pub async fn resolve(&self, query: &str) -> Result<(Identity, MarketRecord)> {
        let (record, mut resolved_via) = match self.market.fetch_coin(query).await {
            Ok(record) => (record, ResolvedVia::Direct),
            Err(e) => {
                debug!(query, error = %e, "Direct id lookup failed, trying name search");
                let id = self
                    .market
                    .search_coin(query)
                    .await
                    .map_err(|_| Error::CoinNotFound {
                        query: query.to_string(),
                    })?;
                let record =
                    self.market
                        .fetch_coin(&id)
                        .await
                        .map_err(|_| Error::CoinNotFound {
                            query: query.to_string(),
                        })?;
                (record, ResolvedVia::Search)
            }
        };

        let mut token_address = token_address_from(&record);

        // The platform check, not the address check, gates the fallback:
        // an Ethereum-native asset never triggers a wrapped search even
        // when no address resolved.
        if token_address.is_none() && record.asset_platform_id.as_deref() != Some("ethereum") {
            if let Some(address) = self.wrapped_fallback(&record.name).await {
                token_address = Some(address);
                resolved_via = ResolvedVia::WrappedFallback;
            }
        }

        let identity = Identity {
            query_text: query.to_string(),
            canonical_id: record.id.clone(),
            resolved_via,
            token_address,
        };
        Ok((identity, record))
    }

    /// Search for a "Wrapped <Name>" token and extract its address.
    ///
    /// Every failure here leaves the token address absent; the canonical
    /// identity is never touched.
    async fn wrapped_fallback(&self, name: &str) -> Option<String> {
        let query = format!("Wrapped {}", name);
        let wrapped_id = match self.market.search_coin(&query).await {
            Ok(id) => id,
            Err(e) => {
                debug!(name, error = %e, "No wrapped version found");
                return None;
            }
        };
        let wrapped = match self.market.fetch_coin(&wrapped_id).await {
            Ok(record) => record,
            Err(e) => {
                debug!(%wrapped_id, error = %e, "Wrapped record fetch failed");
                return None;
            }
        };

        let address = token_address_from(&wrapped);
        if let Some(address) = &address {
            info!(%wrapped_id, %address, "Resolved token address via wrapped token");
        }
        address
    }
}

/// Extract a token address with the platforms-then-contract priority.
/// Empty strings count as absent.
pub fn token_address_from(record: &MarketRecord) -> Option<String> {
    record
        .platforms
        .get("ethereum")
        .and_then(|address| address.as_deref())
        .filter(|address| !address.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            record
                .contract_address
                .as_deref()
                .filter(|address| !address.is_empty())
                .map(str::to_owned)
        })
}
