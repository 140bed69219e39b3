//! Alchemy JSON-RPC client for on-chain token metadata.

use crate::api::ChainDataSource;
use crate::types::OnChainRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Ethereum mainnet RPC client for querying token contract metadata.
pub struct AlchemyClient {
    rpc_url: Option<String>,
    http_client: reqwest::Client,
}

impl AlchemyClient {
    /// Create a client from an optional RPC URL. `None` means the chain
    /// source is unconfigured; fetches then fail with a configuration
    /// error that the aggregator absorbs.
    pub fn new(rpc_url: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            rpc_url,
            http_client,
        }
    }

    async fn rpc_call<T: for<'de> Deserialize<'de>>(
        &self,
        rpc_url: &str,
        method: &str,
        params: serde_json::Value,
    ) -> Result<JsonRpcResponse<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(rpc_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("RPC request failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl ChainDataSource for AlchemyClient {
    async fn fetch_token_metadata(&self, address: &str) -> Result<OnChainRecord> {
        let rpc_url = self.rpc_url.as_deref().ok_or(Error::ConfigurationMissing {
            what: "ALCHEMY_API_KEY",
        })?;

        let response: JsonRpcResponse<TokenMetadata> = self
            .rpc_call(
                rpc_url,
                "alchemy_getTokenMetadata",
                serde_json::json!([address]),
            )
            .await?;

        let metadata = response.result.ok_or_else(|| Error::Api {
            message: response
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "No result in response".to_string()),
            status: None,
        })?;

        debug!(address, name = ?metadata.name, "Fetched token metadata");
        Ok(OnChainRecord {
            address: address.to_string(),
            name: metadata.name,
            symbol: metadata.symbol,
            decimals: metadata.decimals,
            logo: metadata.logo,
        })
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    decimals: Option<u32>,
    #[serde(default)]
    logo: Option<String>,
}
