//! Reddit public-endpoint client.
//!
//! No API key required for public subreddits, but Reddit rejects generic
//! user agents, so a descriptive one is mandatory.

use crate::api::RedditSource;
use crate::types::RedditStats;
use crate::{Error, Result};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ACTIVE_WINDOW_SECS: i64 = 48 * 60 * 60;

/// Client for the public `about.json` / `new.json` subreddit endpoints.
pub struct RedditClient {
    base_url: String,
    user_agent: String,
    http_client: reqwest::Client,
}

impl RedditClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.reddit.com";

    pub fn new(user_agent: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            user_agent,
            http_client,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("Reddit API error: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl RedditSource for RedditClient {
    async fn fetch_subreddit_stats(&self, subreddit: &str) -> Result<RedditStats> {
        let about_url = format!("{}/r/{}/about.json", self.base_url, subreddit);
        let about: AboutResponse = self.get_json(&about_url).await?;

        let new_url = format!("{}/r/{}/new.json?limit=100", self.base_url, subreddit);
        let listing: ListingResponse = self.get_json(&new_url).await?;

        let posts: Vec<PostData> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect();
        let active = active_accounts_48h(&posts, Utc::now().timestamp());

        let stats = RedditStats {
            subscribers: about.data.subscribers.unwrap_or(0),
            live_users: about.data.active_user_count.unwrap_or(0),
            active_accounts_48h: active,
        };
        debug!(subreddit, subscribers = stats.subscribers, active_48h = active, "Fetched subreddit stats");
        Ok(stats)
    }
}

/// Extract a subreddit name from a subreddit URL (`.../r/<name>/...`),
/// defaulting to `"all"` when no name can be parsed.
pub fn parse_subreddit_name(subreddit_url: &str) -> String {
    let parsed = match Url::parse(subreddit_url) {
        Ok(url) => url,
        Err(_) => return "all".to_string(),
    };

    let mut segments = match parsed.path_segments() {
        Some(segments) => segments,
        None => return "all".to_string(),
    };

    while let Some(segment) = segments.next() {
        if segment == "r" {
            if let Some(name) = segments.next().filter(|n| !n.is_empty()) {
                return name.to_string();
            }
            break;
        }
    }
    "all".to_string()
}

/// Count distinct post authors whose post was created within the last
/// 48 hours of `now_ts`. Deduplication is by author name, not post count.
fn active_accounts_48h(posts: &[PostData], now_ts: i64) -> u64 {
    let cutoff = (now_ts - ACTIVE_WINDOW_SECS) as f64;
    let authors: HashSet<&str> = posts
        .iter()
        .filter(|post| post.created_utc.unwrap_or(0.0) > cutoff)
        .filter_map(|post| post.author.as_deref())
        .collect();
    authors.len() as u64
}

#[derive(Debug, Deserialize)]
struct AboutResponse {
    #[serde(default)]
    data: AboutData,
}

#[derive(Debug, Default, Deserialize)]
struct AboutData {
    #[serde(default)]
    subscribers: Option<u64>,
    #[serde(default)]
    active_user_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: PostData,
}

#[derive(Debug, Default, Deserialize)]
struct PostData {
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created_utc: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subreddit_name_from_url() {
        assert_eq!(
            parse_subreddit_name("https://www.reddit.com/r/Bitcoin/"),
            "Bitcoin"
        );
        assert_eq!(
            parse_subreddit_name("https://reddit.com/r/ethereum"),
            "ethereum"
        );
    }

    #[test]
    fn unparseable_subreddit_url_defaults_to_all() {
        assert_eq!(parse_subreddit_name("not a url"), "all");
        assert_eq!(parse_subreddit_name("https://www.reddit.com/"), "all");
        assert_eq!(parse_subreddit_name("https://www.reddit.com/r/"), "all");
        assert_eq!(parse_subreddit_name("https://example.com/user/foo"), "all");
    }

    fn post(author: &str, age_secs: i64, now: i64) -> PostData {
        PostData {
            author: Some(author.to_string()),
            created_utc: Some((now - age_secs) as f64),
        }
    }

    #[test]
    fn active_accounts_deduplicate_by_author() {
        let now = 1_700_000_000;
        let posts = vec![
            post("alice", 60, now),
            post("alice", 3_600, now),
            post("bob", 7_200, now),
            post("carol", ACTIVE_WINDOW_SECS + 60, now), // outside the window
        ];
        assert_eq!(active_accounts_48h(&posts, now), 2);
    }

    #[test]
    fn active_accounts_ignores_missing_fields() {
        let now = 1_700_000_000;
        let posts = vec![
            PostData {
                author: None,
                created_utc: Some((now - 60) as f64),
            },
            PostData {
                author: Some("dave".to_string()),
                created_utc: None,
            },
        ];
        assert_eq!(active_accounts_48h(&posts, now), 0);
    }

    #[test]
    fn listing_parses_reddit_shape() {
        let body = r#"{"data": {"children": [
            {"data": {"author": "alice", "created_utc": 1700000000.0}},
            {"data": {"author": "bob"}}
        ]}}"#;
        let listing: ListingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        assert_eq!(
            listing.data.children[0].data.author.as_deref(),
            Some("alice")
        );
    }
}
