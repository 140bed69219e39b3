//! Domain types for the Coin Sleuth system.
//!
//! `MarketRecord` and friends mirror the primary provider's response
//! shapes with aggressive defaulting, so that a partially populated
//! payload never fails deserialization. `Evidence` is the normalized
//! context handed to the scoring collaborator; `VerdictReport` is what
//! comes back.

use crate::num::lenient_f64;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an identity resolution was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedVia {
    /// The query was already a canonical id.
    Direct,
    /// The query was free text resolved through name search.
    Search,
    /// The token address came from the wrapped-token search.
    WrappedFallback,
}

/// Canonical identity of an investigated asset. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub query_text: String,
    pub canonical_id: String,
    pub resolved_via: ResolvedVia,
    /// Best-known ERC-20 contract address, if any was found.
    pub token_address: Option<String>,
}

/// Raw market record for one asset, fetched once per investigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub asset_platform_id: Option<String>,
    /// Chain name to contract address. Values can be empty strings,
    /// which must be treated as absent.
    #[serde(default)]
    pub platforms: HashMap<String, Option<String>>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub genesis_date: Option<NaiveDate>,
    #[serde(default)]
    pub sentiment_votes_up_percentage: Option<f64>,
    #[serde(default)]
    pub sentiment_votes_down_percentage: Option<f64>,
    #[serde(default)]
    pub links: CoinLinks,
    #[serde(default)]
    pub image: CoinImage,
    #[serde(default)]
    pub market_data: MarketData,
    #[serde(default)]
    pub community_data: CommunityData,
    #[serde(default)]
    pub developer_data: DeveloperData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub subreddit_url: Option<String>,
    #[serde(default)]
    pub twitter_screen_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub large: Option<String>,
}

/// Per-currency maps and change percentages from the market provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub fully_diluted_valuation: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: HashMap<String, f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_14d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_60d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_200d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1y: Option<f64>,
    #[serde(default)]
    pub ath: HashMap<String, f64>,
    #[serde(default)]
    pub ath_change_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub atl: HashMap<String, f64>,
    #[serde(default)]
    pub atl_change_percentage: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityData {
    #[serde(default)]
    pub twitter_followers: Option<u64>,
    #[serde(default)]
    pub reddit_subscribers: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperData {
    #[serde(default)]
    pub stars: Option<u64>,
    #[serde(default)]
    pub commit_count_4_weeks: Option<u64>,
    #[serde(default)]
    pub closed_issues: Option<u64>,
    #[serde(default)]
    pub total_issues: Option<u64>,
}

/// On-chain token metadata. Present only when a token address resolved
/// and the chain provider answered; absence is a valid terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainRecord {
    /// The contract address this record was fetched for.
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Why a social record does or does not carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialStatus {
    Ok,
    ApiNotConfigured,
    ApiError,
    Error,
}

impl SocialStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SocialStatus::Ok => "ok",
            SocialStatus::ApiNotConfigured => "api_not_configured",
            SocialStatus::ApiError => "api_error",
            SocialStatus::Error => "error",
        }
    }
}

/// Subreddit statistics from the public Reddit endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditStats {
    pub subscribers: u64,
    pub live_users: u64,
    /// Distinct post authors active within the last 48 hours.
    pub active_accounts_48h: u64,
}

/// X/Twitter account statistics, always tagged with a status explaining
/// whether the data is real, unavailable by configuration, or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterStats {
    pub handle: String,
    pub status: SocialStatus,
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TwitterStats {
    /// Placeholder record for a branch that could not produce data.
    pub fn placeholder(handle: &str, status: SocialStatus, note: impl Into<String>) -> Self {
        Self {
            handle: handle.to_string(),
            status,
            followers: 0,
            following: 0,
            tweet_count: 0,
            listed_count: 0,
            verified: false,
            created_at: None,
            note: Some(note.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized evidence
// ---------------------------------------------------------------------------

/// The single merged context handed to the scoring collaborator.
///
/// Every field is present regardless of which upstream sources failed;
/// missing data degrades to zeros, empty strings, or an explanatory note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub name: String,
    pub symbol: String,
    pub age_days: i64,
    pub market_integrity: MarketIntegrityEvidence,
    pub dev_velocity: DevVelocityEvidence,
    pub on_chain_security: OnChainSecurityEvidence,
    pub social_sentiment: SocialSentimentEvidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketIntegrityEvidence {
    pub current_price_usd: f64,
    pub market_cap_usd: f64,
    pub fdv_usd: f64,
    pub volume_24h_usd: f64,
    pub performance: PerformanceEvidence,
    pub extremes: ExtremesEvidence,
    pub security_signals: SecuritySignals,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceEvidence {
    pub change_1h: f64,
    pub change_24h: f64,
    pub change_7d: f64,
    pub change_14d: f64,
    pub change_30d: f64,
    pub change_60d: f64,
    pub change_200d: f64,
    pub change_1y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtremesEvidence {
    pub ath_usd: f64,
    pub ath_change_percent: f64,
    pub atl_usd: f64,
    pub atl_change_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySignals {
    pub has_logo: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevVelocityEvidence {
    pub stars: u64,
    pub recent_commits_4w: u64,
    pub issues_resolution_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnChainSecurityEvidence {
    pub contract_address: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub decimals: Option<u32>,
    pub has_logo: bool,
    /// Present when contract signals were limited or unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialSentimentEvidence {
    pub reddit_subscribers: u64,
    pub reddit_live_users: u64,
    pub reddit_active_accounts_48h: u64,
    pub sentiment_votes_up_pct: f64,
    pub sentiment_votes_down_pct: f64,
    pub twitter_followers: u64,
    pub twitter_status: String,
}

// ---------------------------------------------------------------------------
// Verdict types (produced externally, consumed read-only)
// ---------------------------------------------------------------------------

/// A single factor's assessment as returned by a scoring module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorAssessment {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub subscore: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Subscore per factor, on the 0-100 scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscores {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_integrity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dev_velocity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub on_chain_security: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub social_sentiment: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rationale {
    #[serde(default)]
    pub market_integrity: String,
    #[serde(default)]
    pub dev_velocity: String,
    #[serde(default)]
    pub on_chain_security: String,
    #[serde(default)]
    pub social_sentiment: String,
}

/// Composite verdict returned by the scoring collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictReport {
    pub coin: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub master_score: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub coverage: f64,
    #[serde(default)]
    pub included_components: Vec<String>,
    #[serde(default)]
    pub excluded_components: Vec<String>,
    #[serde(default)]
    pub subscores: Subscores,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub rationale: Rationale,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_via_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ResolvedVia::WrappedFallback).unwrap(),
            "\"WRAPPED_FALLBACK\""
        );
        assert_eq!(
            serde_json::to_string(&ResolvedVia::Direct).unwrap(),
            "\"DIRECT\""
        );
    }

    #[test]
    fn social_status_tags_match_wire_format() {
        assert_eq!(
            serde_json::to_string(&SocialStatus::ApiNotConfigured).unwrap(),
            "\"api_not_configured\""
        );
        assert_eq!(SocialStatus::ApiError.as_str(), "api_error");
    }

    #[test]
    fn market_record_deserializes_partial_payload() {
        let record: MarketRecord = serde_json::from_str(
            r#"{
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "btc",
                "asset_platform_id": null,
                "platforms": {"": null}
            }"#,
        )
        .unwrap();

        assert_eq!(record.id, "bitcoin");
        assert!(record.contract_address.is_none());
        assert!(record.links.subreddit_url.is_none());
        assert!(record.market_data.current_price.is_empty());
    }

    #[test]
    fn verdict_report_tolerates_string_numbers() {
        let report: VerdictReport = serde_json::from_str(
            r#"{
                "coin": "Bitcoin",
                "master_score": "72.5",
                "confidence": 0.8,
                "coverage": "1.0",
                "subscores": {"market_integrity": "60", "dev_velocity": 40}
            }"#,
        )
        .unwrap();

        assert_eq!(report.master_score, 72.5);
        assert_eq!(report.coverage, 1.0);
        assert_eq!(report.subscores.market_integrity, 60.0);
        assert_eq!(report.subscores.dev_velocity, 40.0);
        assert_eq!(report.subscores.social_sentiment, 0.0);
    }
}
