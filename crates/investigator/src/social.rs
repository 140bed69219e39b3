//! Deterministic social-sentiment scoring.
//!
//! The social factor is computed locally from the normalized evidence
//! rather than delegated to the verdict collaborator. Log scaling keeps
//! very large communities from dominating the score.

use serde_json::json;
use sleuth_core::num::clamp_score;
use sleuth_core::types::{Evidence, FactorAssessment};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score the social-sentiment factor from evidence.
pub fn score_social(evidence: &Evidence) -> FactorAssessment {
    let social = &evidence.social_sentiment;

    let reddit_subscribers = social.reddit_subscribers as f64;
    let reddit_active_48h = social.reddit_active_accounts_48h as f64;
    let up_pct = clamp_score(social.sentiment_votes_up_pct);
    let down_pct = clamp_score(social.sentiment_votes_down_pct);
    let twitter_followers = social.twitter_followers as f64;

    let reddit_size_score = clamp_score((reddit_subscribers + 1.0).log10() / 6.0 * 100.0);
    let twitter_size_score = clamp_score((twitter_followers + 1.0).log10() / 7.0 * 100.0);

    let active_ratio = reddit_active_48h / reddit_subscribers.max(1.0);
    let active_score = clamp_score(active_ratio * 5000.0);

    let sentiment_delta = up_pct - down_pct;
    let sentiment_score = clamp_score(50.0 + sentiment_delta * 0.5);

    let has_reddit = reddit_subscribers > 0.0;
    let has_sentiment_votes = up_pct + down_pct > 0.0;
    let has_twitter = twitter_followers > 0.0;

    let (subscore, confidence, flags, explanation) =
        if !(has_reddit || has_sentiment_votes || has_twitter) {
            (
                50.0,
                0.25,
                vec!["Social data unavailable".to_string()],
                "Social signals are unavailable, so a neutral social sentiment score was applied."
                    .to_string(),
            )
        } else {
            let subscore = 0.35 * reddit_size_score
                + 0.25 * active_score
                + 0.30 * sentiment_score
                + 0.10 * twitter_size_score;

            let mut confidence: f64 = 0.35;
            if has_reddit {
                confidence += 0.30;
            }
            if has_sentiment_votes {
                confidence += 0.25;
            }
            if has_twitter {
                confidence += 0.10;
            }
            confidence = confidence.min(0.95);

            let mut flags = Vec::new();
            if reddit_subscribers < 1000.0 {
                flags.push("Low Reddit community size".to_string());
            }
            if has_reddit && active_ratio < 0.002 {
                flags.push("Low Reddit activity ratio".to_string());
            }
            if sentiment_delta < -10.0 {
                flags.push("Negative sentiment bias".to_string());
            }
            if sentiment_delta > 25.0 {
                flags.push("Strong positive sentiment".to_string());
            }

            let explanation = format!(
                "Social sentiment uses Reddit size/activity and vote sentiment (up {}%, down {}%).",
                round2(up_pct),
                round2(down_pct)
            );
            (subscore, confidence, flags, explanation)
        };

    FactorAssessment {
        subscore: round2(clamp_score(subscore)),
        confidence: round2(confidence),
        flags,
        explanation,
        details: json!({
            "reddit_subscribers": social.reddit_subscribers,
            "reddit_active_accounts_48h": social.reddit_active_accounts_48h,
            "reddit_activity_ratio": active_ratio,
            "sentiment_votes_up_pct": round2(up_pct),
            "sentiment_votes_down_pct": round2(down_pct),
            "twitter_followers": social.twitter_followers,
            "reddit_size_score": round2(reddit_size_score),
            "activity_score": round2(active_score),
            "sentiment_score": round2(sentiment_score),
            "twitter_size_score": round2(twitter_size_score),
        }),
    }
}
