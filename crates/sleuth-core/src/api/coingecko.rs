//! CoinGecko API client.
//!
//! Provides the canonical market record for an asset and the free-text
//! name search used by the identity fallback chain.

use crate::api::MarketDataSource;
use crate::types::MarketRecord;
use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// CoinGecko REST client.
pub struct CoinGeckoClient {
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl CoinGeckoClient {
    /// Default public API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            api_key,
            http_client,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http_client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }
        request
    }
}

#[async_trait::async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_coin(&self, id: &str) -> Result<MarketRecord> {
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=true&developer_data=true&sparkline=false",
            self.base_url, id
        );
        let response = self.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::CoinNotFound {
                query: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("coin lookup failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        let record: MarketRecord = response.json().await?;
        debug!(id = %record.id, name = %record.name, "Fetched market record");
        Ok(record)
    }

    async fn search_coin(&self, query: &str) -> Result<String> {
        let url = format!("{}/search", self.base_url);
        let response = self.get(&url).query(&[("query", query)]).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("coin search failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        let results: SearchResponse = response.json().await?;
        let hit = results
            .coins
            .into_iter()
            .next()
            .ok_or_else(|| Error::CoinNotFound {
                query: query.to_string(),
            })?;

        debug!(query, id = %hit.id, "Resolved coin id via search");
        Ok(hit.id)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_takes_first_hit() {
        let body = r#"{"coins": [{"id": "wrapped-bitcoin", "name": "Wrapped Bitcoin"},
                                 {"id": "wbtc-clone", "name": "WBTC Clone"}]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.coins[0].id, "wrapped-bitcoin");
    }

    #[test]
    fn search_response_tolerates_empty_result() {
        let response: SearchResponse = serde_json::from_str(r#"{"coins": []}"#).unwrap();
        assert!(response.coins.is_empty());
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.coins.is_empty());
    }

    #[test]
    fn coin_payload_parses_platform_addresses() {
        let body = r#"{
            "id": "chainlink",
            "name": "Chainlink",
            "symbol": "link",
            "asset_platform_id": "ethereum",
            "platforms": {"ethereum": "0x514910771af9ca656af840dff83e8264ecf986ca"},
            "links": {"subreddit_url": "https://www.reddit.com/r/Chainlink/", "twitter_screen_name": "chainlink"},
            "market_data": {"current_price": {"usd": 18.4}, "ath": {"usd": 52.7}}
        }"#;
        let record: MarketRecord = serde_json::from_str(body).unwrap();
        assert_eq!(
            record.platforms.get("ethereum").unwrap().as_deref(),
            Some("0x514910771af9ca656af840dff83e8264ecf986ca")
        );
        assert_eq!(record.market_data.current_price.get("usd"), Some(&18.4));
        assert_eq!(
            record.links.subreddit_url.as_deref(),
            Some("https://www.reddit.com/r/Chainlink/")
        );
    }
}
