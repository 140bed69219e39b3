//! Score explainability.
//!
//! Recomputes per-factor point contributions from a verdict report so the
//! composite can be audited: `points = weight * clamp(subscore) /
//! coverage`, and the sum of points is an independent cross-check against
//! the externally supplied master score. Contributions are derived on
//! every call and never persisted.

use serde::{Deserialize, Serialize};
use sleuth_core::num::{clamp_score, finite_or};
use sleuth_core::types::VerdictReport;

/// Coverage applied when the upstream value is missing or unusable.
pub const DEFAULT_COVERAGE: f64 = 0.8;

/// The four scoring factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKey {
    MarketIntegrity,
    DevVelocity,
    OnChainSecurity,
    SocialSentiment,
}

impl FactorKey {
    pub const ALL: [FactorKey; 4] = [
        FactorKey::MarketIntegrity,
        FactorKey::DevVelocity,
        FactorKey::OnChainSecurity,
        FactorKey::SocialSentiment,
    ];

    /// Fixed factor weight. The four weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            FactorKey::MarketIntegrity => 0.25,
            FactorKey::DevVelocity => 0.20,
            FactorKey::OnChainSecurity => 0.35,
            FactorKey::SocialSentiment => 0.20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactorKey::MarketIntegrity => "market_integrity",
            FactorKey::DevVelocity => "dev_velocity",
            FactorKey::OnChainSecurity => "on_chain_security",
            FactorKey::SocialSentiment => "social_sentiment",
        }
    }
}

/// One factor's contribution to the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: FactorKey,
    pub weight: f64,
    pub raw_score: f64,
    pub points: f64,
}

/// The full derived explanation for a verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub contributions: Vec<Contribution>,
    /// Independently recomputed composite; exposed alongside the report's
    /// own master score, never substituted for it.
    pub explained_master: f64,
}

/// Coverage actually used for point scaling: missing, non-finite, and
/// non-positive values all resolve to the default, and anything above
/// full coverage is capped at 1.0.
pub fn effective_coverage(coverage: f64) -> f64 {
    let coverage = finite_or(coverage, DEFAULT_COVERAGE);
    if coverage <= 0.0 {
        DEFAULT_COVERAGE
    } else {
        coverage.min(1.0)
    }
}

/// Compute per-factor contributions and the reconciled composite.
pub fn explain(report: &VerdictReport) -> Explanation {
    let coverage = effective_coverage(report.coverage);

    let contributions: Vec<Contribution> = FactorKey::ALL
        .iter()
        .map(|&factor| {
            let raw_score = subscore_for(report, factor);
            let points = factor.weight() * clamp_score(raw_score) / coverage;
            Contribution {
                factor,
                weight: factor.weight(),
                raw_score,
                points,
            }
        })
        .collect();

    let explained_master = contributions.iter().map(|c| c.points).sum();

    Explanation {
        contributions,
        explained_master,
    }
}

fn subscore_for(report: &VerdictReport, factor: FactorKey) -> f64 {
    let subscores = &report.subscores;
    match factor {
        FactorKey::MarketIntegrity => subscores.market_integrity,
        FactorKey::DevVelocity => subscores.dev_velocity,
        FactorKey::OnChainSecurity => subscores.on_chain_security,
        FactorKey::SocialSentiment => subscores.social_sentiment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::types::Subscores;

    fn report(subscores: Subscores, coverage: f64) -> VerdictReport {
        VerdictReport {
            coin: "Bitcoin".to_string(),
            master_score: 0.0,
            confidence: 0.0,
            coverage,
            included_components: Vec::new(),
            excluded_components: Vec::new(),
            subscores,
            flags: Vec::new(),
            rationale: Default::default(),
            details: serde_json::Value::Null,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = FactorKey::ALL.iter().map(|f| f.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_coverage_reconciles_with_weighted_sum() {
        // 0.25*25 + 0.20*50 + 0.35*87.5 + 0.20*40 = 54.875
        let explanation = explain(&report(
            Subscores {
                market_integrity: 25.0,
                dev_velocity: 50.0,
                on_chain_security: 87.5,
                social_sentiment: 40.0,
            },
            1.0,
        ));

        assert!((explanation.explained_master - 54.875).abs() < 1e-9);
        let on_chain = &explanation.contributions[2];
        assert_eq!(on_chain.factor, FactorKey::OnChainSecurity);
        assert!((on_chain.points - 30.625).abs() < 1e-9);
    }

    #[test]
    fn zero_coverage_falls_back_to_default() {
        let explanation = explain(&report(
            Subscores {
                market_integrity: 80.0,
                ..Default::default()
            },
            0.0,
        ));

        // 0.25 * 80 / 0.8 = 25.0
        assert!((explanation.contributions[0].points - 25.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_coverage_falls_back_to_default() {
        assert_eq!(effective_coverage(f64::NAN), DEFAULT_COVERAGE);
        assert_eq!(effective_coverage(f64::INFINITY), DEFAULT_COVERAGE);
        assert_eq!(effective_coverage(-0.5), DEFAULT_COVERAGE);
        assert_eq!(effective_coverage(1.7), 1.0);
        assert_eq!(effective_coverage(0.6), 0.6);
    }

    #[test]
    fn out_of_range_scores_are_clamped_and_points_stay_non_negative() {
        let explanation = explain(&report(
            Subscores {
                market_integrity: 250.0,
                dev_velocity: -30.0,
                on_chain_security: f64::NAN,
                social_sentiment: 40.0,
            },
            1.0,
        ));

        for contribution in &explanation.contributions {
            assert!(contribution.points >= 0.0);
        }
        // clamp(250) = 100, clamp(-30) = 0, clamp(NaN) = 0
        assert!((explanation.contributions[0].points - 25.0).abs() < 1e-9);
        assert_eq!(explanation.contributions[1].points, 0.0);
        assert_eq!(explanation.contributions[2].points, 0.0);
    }

    #[test]
    fn partial_coverage_inflates_points() {
        let explanation = explain(&report(
            Subscores {
                market_integrity: 50.0,
                ..Default::default()
            },
            0.5,
        ));

        // 0.25 * 50 / 0.5 = 25.0
        assert!((explanation.contributions[0].points - 25.0).abs() < 1e-9);
    }
}
