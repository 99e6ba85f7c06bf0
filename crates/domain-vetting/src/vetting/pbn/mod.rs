mod config;
mod policy;
mod rules;

pub use config::{
    BonusRules, DetectionConfig, FlexibilityLevel, RiskTiers, BRAND_ALLOW_LIST, MAX_RISK_POINTS,
    SPAM_KEYWORDS,
};
pub use policy::{RecommendedAction, RiskLevel};

use super::record::{DerivedMetrics, DomainRecord};
use rules::{CheckOutcome, Subject, CHECKS};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Confidence reported when a profile is too small to analyze.
pub const INSUFFICIENT_DATA_CONFIDENCE: f64 = 0.1;

/// Private blog network risk verdict for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbnResult {
    pub risk_points: u32,
    pub risk_percent: u8,
    pub risk_level: RiskLevel,
    pub action: RecommendedAction,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    /// Share of checks that could be evaluated, in `[0, 1]`.
    pub analysis_confidence: f64,
    pub trust_bonus_points: u32,
    pub is_verified_brand: bool,
}

/// Runs the penalty checks and bonus pass against one shared configuration.
#[derive(Debug, Clone)]
pub struct PbnDetector {
    config: DetectionConfig,
}

impl PbnDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn for_level(level: FlexibilityLevel) -> Self {
        Self::new(DetectionConfig::for_level(level))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn detect(
        &self,
        record: &DomainRecord,
        metrics: &DerivedMetrics,
        verified_brand: bool,
    ) -> PbnResult {
        let config = &self.config;

        if record.refdomains_all < config.min_refdomains_analysis {
            debug!(
                domain = %record.target,
                refdomains = record.refdomains_all,
                minimum = config.min_refdomains_analysis,
                "too few referring domains for PBN analysis"
            );
            return PbnResult {
                risk_points: 0,
                risk_percent: 0,
                risk_level: RiskLevel::Insufficient,
                action: RecommendedAction::NotAnalyzed,
                alerts: vec![format!(
                    "Only {:.0} referring domains; at least {:.0} are needed for analysis",
                    record.refdomains_all, config.min_refdomains_analysis
                )],
                recommendations: policy::recommendations(RiskLevel::Insufficient),
                analysis_confidence: INSUFFICIENT_DATA_CONFIDENCE,
                trust_bonus_points: 0,
                is_verified_brand: verified_brand,
            };
        }

        let subject = Subject {
            record,
            metrics,
            verified_brand,
        };

        let mut penalty = 0u32;
        let mut evaluated = 0usize;
        let mut alerts = Vec::new();

        for (name, check) in CHECKS {
            match check(&subject, config) {
                Ok(CheckOutcome { points, factors }) => {
                    debug!(domain = %record.target, check = name, points, "check evaluated");
                    evaluated += 1;
                    penalty += points;
                    alerts.extend(factors);
                }
                Err(err) => {
                    warn!(domain = %record.target, check = name, error = %err, "check skipped");
                }
            }
        }

        let bonus = rules::authority_bonus(&subject, config);
        let reduction = bonus.points.min(config.bonus.max_reduction);
        alerts.extend(bonus.factors);

        let risk_points = penalty.saturating_sub(reduction).min(config.max_points);
        let (risk_level, action) = policy::classify(risk_points, &config.tiers);

        PbnResult {
            risk_points,
            risk_percent: policy::risk_percent(risk_points, config.max_points),
            risk_level,
            action,
            alerts,
            recommendations: policy::recommendations(risk_level),
            analysis_confidence: evaluated as f64 / CHECKS.len() as f64,
            trust_bonus_points: reduction,
            is_verified_brand: verified_brand,
        }
    }
}

impl Default for PbnDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
