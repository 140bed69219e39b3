//! Verdict composition.
//!
//! Blends four per-factor assessments into a composite report with a
//! weight-normalized master score, a blended confidence, and the union of
//! all flags. The weights are shared with the explainability calculator.

use crate::explain::FactorKey;
use serde_json::json;
use sleuth_core::num::finite_or;
use sleuth_core::types::{FactorAssessment, Rationale, Subscores, VerdictReport};
use std::collections::BTreeSet;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bring a confidence value onto the [0, 1] scale. Values above 1 are
/// assumed to be percentages.
fn normalize_confidence(value: f64) -> f64 {
    let value = finite_or(value, 0.5);
    let value = if value > 1.0 { value / 100.0 } else { value };
    value.clamp(0.0, 1.0)
}

/// Blend the four factor assessments into one composite report.
pub fn compose_verdict(
    coin: &str,
    market: &FactorAssessment,
    dev: &FactorAssessment,
    onchain: &FactorAssessment,
    social: &FactorAssessment,
) -> VerdictReport {
    let w_market = FactorKey::MarketIntegrity.weight();
    let w_dev = FactorKey::DevVelocity.weight();
    let w_onchain = FactorKey::OnChainSecurity.weight();
    let w_social = FactorKey::SocialSentiment.weight();
    let coverage = w_market + w_dev + w_onchain + w_social;

    let master_raw = w_market * market.subscore
        + w_dev * dev.subscore
        + w_onchain * onchain.subscore
        + w_social * social.subscore;
    let master = master_raw / coverage;

    let confidence_raw = w_market * normalize_confidence(market.confidence)
        + w_dev * normalize_confidence(dev.confidence)
        + w_onchain * normalize_confidence(onchain.confidence)
        + w_social * normalize_confidence(social.confidence);
    let confidence = confidence_raw / coverage;

    let flags: Vec<String> = [market, dev, onchain, social]
        .iter()
        .flat_map(|assessment| assessment.flags.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    VerdictReport {
        coin: coin.to_string(),
        master_score: round2(master),
        confidence: round2(confidence),
        coverage: round2(coverage),
        included_components: FactorKey::ALL
            .iter()
            .map(|factor| factor.as_str().to_string())
            .collect(),
        excluded_components: Vec::new(),
        subscores: Subscores {
            market_integrity: market.subscore,
            dev_velocity: dev.subscore,
            on_chain_security: onchain.subscore,
            social_sentiment: social.subscore,
        },
        flags,
        rationale: Rationale {
            market_integrity: market.explanation.clone(),
            dev_velocity: dev.explanation.clone(),
            on_chain_security: onchain.explanation.clone(),
            social_sentiment: social.explanation.clone(),
        },
        details: json!({
            "market": market.details,
            "dev": dev.details,
            "onchain": onchain.details,
            "social": social.details,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(subscore: f64, confidence: f64, flags: &[&str]) -> FactorAssessment {
        FactorAssessment {
            subscore,
            confidence,
            flags: flags.iter().map(|f| f.to_string()).collect(),
            explanation: format!("subscore {}", subscore),
            details: serde_json::Value::Null,
        }
    }

    #[test]
    fn master_score_is_the_weighted_blend() {
        let report = compose_verdict(
            "Bitcoin",
            &assessment(25.0, 0.8, &[]),
            &assessment(50.0, 0.8, &[]),
            &assessment(87.5, 0.8, &[]),
            &assessment(40.0, 0.8, &[]),
        );

        assert_eq!(report.master_score, 54.88); // 54.875 rounded
        assert_eq!(report.coverage, 1.0);
        assert_eq!(report.confidence, 0.8);
        assert_eq!(report.subscores.on_chain_security, 87.5);
        assert_eq!(report.included_components.len(), 4);
    }

    #[test]
    fn percent_scale_confidence_is_normalized() {
        assert_eq!(normalize_confidence(85.0), 0.85);
        assert_eq!(normalize_confidence(0.6), 0.6);
        assert_eq!(normalize_confidence(-2.0), 0.0);
        assert_eq!(normalize_confidence(f64::NAN), 0.5);
    }

    #[test]
    fn flags_are_deduplicated_and_sorted() {
        let report = compose_verdict(
            "Test",
            &assessment(50.0, 0.5, &["Thin order books", "Young asset"]),
            &assessment(50.0, 0.5, &["Young asset"]),
            &assessment(50.0, 0.5, &[]),
            &assessment(50.0, 0.5, &["Low Reddit community size"]),
        );

        assert_eq!(
            report.flags,
            vec![
                "Low Reddit community size",
                "Thin order books",
                "Young asset"
            ]
        );
    }

    #[test]
    fn rationale_carries_each_explanation() {
        let report = compose_verdict(
            "Test",
            &assessment(10.0, 0.5, &[]),
            &assessment(20.0, 0.5, &[]),
            &assessment(30.0, 0.5, &[]),
            &assessment(40.0, 0.5, &[]),
        );

        assert_eq!(report.rationale.market_integrity, "subscore 10");
        assert_eq!(report.rationale.social_sentiment, "subscore 40");
    }
}
