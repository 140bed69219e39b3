//! X (Twitter) API v2 client, app-only bearer authentication.
//!
//! This source never fails outright: a missing bearer token, an HTTP
//! error, and an unexpected failure each produce a placeholder record
//! tagged with the corresponding status, so the aggregation result always
//! explains *why* follower data is absent.

use crate::api::TwitterSource;
use crate::types::{SocialStatus, TwitterStats};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// X API v2 client for account lookups.
pub struct TwitterClient {
    base_url: String,
    bearer_token: Option<String>,
    http_client: reqwest::Client,
}

impl TwitterClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twitter.com";

    pub fn new(bearer_token: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            bearer_token,
            http_client,
        }
    }

    async fn lookup(&self, handle: &str, token: &str) -> TwitterStats {
        let url = format!(
            "{}/2/users/by/username/{}?user.fields=public_metrics,verified,created_at,description",
            self.base_url, handle
        );

        let response = match self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(handle, error = %e, "X API request failed");
                return TwitterStats::placeholder(
                    handle,
                    SocialStatus::Error,
                    "Unexpected X fetch error.",
                );
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(handle, status, "X API returned an error status");
            return TwitterStats::placeholder(
                handle,
                SocialStatus::ApiError,
                format!("X API request failed ({}).", status),
            );
        }

        let body: UserLookupResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(handle, error = %e, "Could not parse X API response");
                return TwitterStats::placeholder(
                    handle,
                    SocialStatus::Error,
                    "Unexpected X fetch error.",
                );
            }
        };

        let user = body.data.unwrap_or_default();
        let metrics = user.public_metrics.unwrap_or_default();
        debug!(handle, followers = metrics.followers_count, "Fetched X account stats");

        TwitterStats {
            handle: handle.to_string(),
            status: SocialStatus::Ok,
            followers: metrics.followers_count,
            following: metrics.following_count,
            tweet_count: metrics.tweet_count,
            listed_count: metrics.listed_count,
            verified: user.verified,
            created_at: user.created_at,
            note: None,
        }
    }
}

#[async_trait::async_trait]
impl TwitterSource for TwitterClient {
    async fn fetch_user(&self, handle: &str) -> TwitterStats {
        match &self.bearer_token {
            Some(token) => self.lookup(handle, token).await,
            None => {
                debug!(handle, "X bearer token missing, skipping lookup");
                TwitterStats::placeholder(
                    handle,
                    SocialStatus::ApiNotConfigured,
                    "Set X_BEARER_TOKEN to enable X API lookups.",
                )
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserLookupResponse {
    #[serde(default)]
    data: Option<UserData>,
}

#[derive(Debug, Default, Deserialize)]
struct UserData {
    #[serde(default)]
    public_metrics: Option<PublicMetrics>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    following_count: u64,
    #[serde(default)]
    tweet_count: u64,
    #[serde(default)]
    listed_count: u64,
}
