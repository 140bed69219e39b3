//! Evidence normalization.
//!
//! Pure merge of the market record and the aggregated source outcomes
//! into the canonical `Evidence` context. Absent sources degrade to
//! defaults; normalization itself can never fail.

use crate::aggregator::AggregateOutcome;
use chrono::{NaiveDate, Utc};
use sleuth_core::types::{
    DevVelocityEvidence, Evidence, ExtremesEvidence, MarketIntegrityEvidence, MarketRecord,
    OnChainSecurityEvidence, PerformanceEvidence, SecuritySignals, SocialSentimentEvidence,
};
use std::collections::HashMap;

const LIMITED_SIGNALS_NOTE: &str =
    "No verifiable contract signals were available for this asset.";

/// Merge everything into the canonical evidence context.
pub fn normalize(market: &MarketRecord, aggregated: &AggregateOutcome) -> Evidence {
    Evidence {
        name: market.name.clone(),
        symbol: market.symbol.to_uppercase(),
        age_days: age_days(market.genesis_date, Utc::now().date_naive()),
        market_integrity: market_integrity(market),
        dev_velocity: dev_velocity(market),
        on_chain_security: on_chain_security(aggregated),
        social_sentiment: social_sentiment(market, aggregated),
    }
}

fn usd(map: &HashMap<String, f64>) -> f64 {
    map.get("usd").copied().unwrap_or(0.0)
}

fn age_days(genesis: Option<NaiveDate>, today: NaiveDate) -> i64 {
    genesis
        .map(|date| (today - date).num_days().max(0))
        .unwrap_or(0)
}

fn market_integrity(market: &MarketRecord) -> MarketIntegrityEvidence {
    let data = &market.market_data;
    MarketIntegrityEvidence {
        current_price_usd: usd(&data.current_price),
        market_cap_usd: usd(&data.market_cap),
        fdv_usd: usd(&data.fully_diluted_valuation),
        volume_24h_usd: usd(&data.total_volume),
        performance: PerformanceEvidence {
            change_1h: usd(&data.price_change_percentage_1h_in_currency),
            change_24h: data.price_change_percentage_24h.unwrap_or(0.0),
            change_7d: data.price_change_percentage_7d.unwrap_or(0.0),
            change_14d: data.price_change_percentage_14d.unwrap_or(0.0),
            change_30d: data.price_change_percentage_30d.unwrap_or(0.0),
            change_60d: data.price_change_percentage_60d.unwrap_or(0.0),
            change_200d: data.price_change_percentage_200d.unwrap_or(0.0),
            change_1y: data.price_change_percentage_1y.unwrap_or(0.0),
        },
        extremes: ExtremesEvidence {
            ath_usd: usd(&data.ath),
            ath_change_percent: usd(&data.ath_change_percentage),
            atl_usd: usd(&data.atl),
            atl_change_percent: usd(&data.atl_change_percentage),
        },
        security_signals: SecuritySignals {
            has_logo: market.image.large.is_some(),
        },
    }
}

fn dev_velocity(market: &MarketRecord) -> DevVelocityEvidence {
    let data = &market.developer_data;
    let total_issues = data.total_issues.unwrap_or(0);
    let closed_issues = data.closed_issues.unwrap_or(0);
    DevVelocityEvidence {
        stars: data.stars.unwrap_or(0),
        recent_commits_4w: data.commit_count_4_weeks.unwrap_or(0),
        issues_resolution_rate: if total_issues > 0 {
            closed_issues as f64 / total_issues as f64
        } else {
            0.0
        },
    }
}

fn on_chain_security(aggregated: &AggregateOutcome) -> OnChainSecurityEvidence {
    match aggregated.on_chain.value() {
        Some(record) => OnChainSecurityEvidence {
            contract_address: Some(record.address.clone()),
            token_name: record.name.clone(),
            token_symbol: record.symbol.clone(),
            decimals: record.decimals,
            has_logo: record.logo.is_some(),
            note: None,
        },
        None => OnChainSecurityEvidence {
            contract_address: None,
            token_name: None,
            token_symbol: None,
            decimals: None,
            has_logo: false,
            note: Some(LIMITED_SIGNALS_NOTE.to_string()),
        },
    }
}

fn social_sentiment(market: &MarketRecord, aggregated: &AggregateOutcome) -> SocialSentimentEvidence {
    let reddit = aggregated.reddit.value();
    let twitter = aggregated.twitter.value();

    SocialSentimentEvidence {
        reddit_subscribers: reddit.map(|r| r.subscribers).unwrap_or(0),
        reddit_live_users: reddit.map(|r| r.live_users).unwrap_or(0),
        reddit_active_accounts_48h: reddit.map(|r| r.active_accounts_48h).unwrap_or(0),
        sentiment_votes_up_pct: market.sentiment_votes_up_percentage.unwrap_or(0.0),
        sentiment_votes_down_pct: market.sentiment_votes_down_percentage.unwrap_or(0.0),
        twitter_followers: twitter.map(|t| t.followers).unwrap_or(0),
        twitter_status: twitter
            .map(|t| t.status.as_str().to_string())
            .unwrap_or_else(|| "unavailable".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SourceOutcome;
    use sleuth_core::types::{OnChainRecord, RedditStats, SocialStatus, TwitterStats};

    fn empty_aggregate() -> AggregateOutcome {
        AggregateOutcome {
            on_chain: SourceOutcome::Skipped {
                reason: "no token address",
            },
            reddit: SourceOutcome::Failed {
                error: "connection reset".to_string(),
            },
            twitter: SourceOutcome::Skipped {
                reason: "no twitter handle",
            },
        }
    }

    #[test]
    fn empty_inputs_degrade_to_defaults_without_panicking() {
        let market = MarketRecord {
            id: "ghost".to_string(),
            name: "Ghost".to_string(),
            ..Default::default()
        };

        let evidence = normalize(&market, &empty_aggregate());

        assert_eq!(evidence.name, "Ghost");
        assert_eq!(evidence.age_days, 0);
        assert_eq!(evidence.market_integrity.current_price_usd, 0.0);
        assert_eq!(evidence.dev_velocity.stars, 0);
        assert_eq!(evidence.dev_velocity.issues_resolution_rate, 0.0);
        assert!(evidence.on_chain_security.contract_address.is_none());
        assert!(evidence.on_chain_security.note.is_some());
        assert_eq!(evidence.social_sentiment.reddit_subscribers, 0);
        assert_eq!(evidence.social_sentiment.twitter_status, "unavailable");
    }

    #[test]
    fn full_inputs_map_through() {
        let mut market = MarketRecord {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            symbol: "btc".to_string(),
            genesis_date: Some(NaiveDate::from_ymd_opt(2009, 1, 3).unwrap()),
            sentiment_votes_up_percentage: Some(82.5),
            sentiment_votes_down_percentage: Some(17.5),
            ..Default::default()
        };
        market
            .market_data
            .current_price
            .insert("usd".to_string(), 69_992.0);
        market
            .market_data
            .market_cap
            .insert("usd".to_string(), 1.39e12);
        market.market_data.price_change_percentage_24h = Some(1.58);
        market.market_data.ath.insert("usd".to_string(), 126_080.0);
        market.developer_data.stars = Some(73_168);
        market.developer_data.commit_count_4_weeks = Some(108);
        market.developer_data.closed_issues = Some(953);
        market.developer_data.total_issues = Some(1000);
        market.image.large = Some("https://img.example/btc.png".to_string());

        let aggregated = AggregateOutcome {
            on_chain: SourceOutcome::Ok(OnChainRecord {
                address: "0x2260fac5".to_string(),
                name: Some("Wrapped BTC".to_string()),
                symbol: Some("WBTC".to_string()),
                decimals: Some(8),
                logo: Some("https://img.example/wbtc.png".to_string()),
            }),
            reddit: SourceOutcome::Ok(RedditStats {
                subscribers: 5_000_000,
                live_users: 12_000,
                active_accounts_48h: 340,
            }),
            twitter: SourceOutcome::Ok(TwitterStats {
                handle: "bitcoin".to_string(),
                status: SocialStatus::Ok,
                followers: 6_400_000,
                following: 0,
                tweet_count: 30_000,
                listed_count: 900,
                verified: true,
                created_at: None,
                note: None,
            }),
        };

        let evidence = normalize(&market, &aggregated);

        assert_eq!(evidence.symbol, "BTC");
        assert!(evidence.age_days > 6_000);
        assert_eq!(evidence.market_integrity.current_price_usd, 69_992.0);
        assert_eq!(evidence.market_integrity.performance.change_24h, 1.58);
        assert_eq!(evidence.market_integrity.extremes.ath_usd, 126_080.0);
        assert!(evidence.market_integrity.security_signals.has_logo);
        assert_eq!(evidence.dev_velocity.recent_commits_4w, 108);
        assert_eq!(evidence.dev_velocity.issues_resolution_rate, 0.953);
        assert_eq!(
            evidence.on_chain_security.contract_address.as_deref(),
            Some("0x2260fac5")
        );
        assert_eq!(
            evidence.on_chain_security.token_symbol.as_deref(),
            Some("WBTC")
        );
        assert!(evidence.on_chain_security.note.is_none());
        assert_eq!(evidence.social_sentiment.reddit_active_accounts_48h, 340);
        assert_eq!(evidence.social_sentiment.sentiment_votes_up_pct, 82.5);
        assert_eq!(evidence.social_sentiment.twitter_status, "ok");
    }

    #[test]
    fn age_days_never_negative() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(age_days(Some(future), today), 0);
        assert_eq!(age_days(None, today), 0);
        assert_eq!(
            age_days(Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), today),
            31
        );
    }

    #[test]
    fn evidence_serializes_every_expected_field() {
        let market = MarketRecord::default();
        let value = serde_json::to_value(normalize(&market, &empty_aggregate())).unwrap();

        for section in [
            "market_integrity",
            "dev_velocity",
            "on_chain_security",
            "social_sentiment",
        ] {
            assert!(value.get(section).is_some(), "missing section {}", section);
        }
        assert_eq!(value["social_sentiment"]["reddit_subscribers"], 0);
        assert_eq!(value["market_integrity"]["performance"]["change_7d"], 0.0);
    }
}
