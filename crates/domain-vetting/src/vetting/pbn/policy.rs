use super::config::RiskTiers;
use serde::{Deserialize, Serialize};

/// Risk classification for a domain's link profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Insufficient,
    Low,
    LowModerate,
    Moderate,
    High,
    LowWhitelist,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Insufficient => "Insufficient data",
            RiskLevel::Low => "Low risk: natural profile",
            RiskLevel::LowModerate => "Low-moderate risk: some warning signs",
            RiskLevel::Moderate => "Moderate risk: possible PBN signals",
            RiskLevel::High => "High risk: possible PBN",
            RiskLevel::LowWhitelist => "Low risk: whitelisted domain",
        }
    }
}

/// What a link builder should do with the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    NotAnalyzed,
    Confiable,
    Precaucion,
    Revision,
    Evitar,
}

impl RecommendedAction {
    pub fn label(self) -> &'static str {
        match self {
            RecommendedAction::NotAnalyzed => "Not analyzed",
            RecommendedAction::Confiable => "Trustworthy",
            RecommendedAction::Precaucion => "Proceed with caution",
            RecommendedAction::Revision => "Review manually",
            RecommendedAction::Evitar => "Avoid",
        }
    }
}

pub(crate) fn classify(points: u32, tiers: &RiskTiers) -> (RiskLevel, RecommendedAction) {
    if points >= tiers.high {
        (RiskLevel::High, RecommendedAction::Evitar)
    } else if points >= tiers.moderate {
        (RiskLevel::Moderate, RecommendedAction::Revision)
    } else if points >= tiers.low_moderate {
        (RiskLevel::LowModerate, RecommendedAction::Precaucion)
    } else {
        (RiskLevel::Low, RecommendedAction::Confiable)
    }
}

pub(crate) fn recommendations(level: RiskLevel) -> Vec<String> {
    let lines: &[&str] = match level {
        RiskLevel::High => &[
            "Avoid this domain for link building",
            "Review the backlink profile manually",
            "Check the domain history in the Wayback Machine",
            "Review the geographic spread of referring domains",
        ],
        RiskLevel::Moderate => &[
            "Investigate further before proceeding",
            "Assess the quality of the domain's content",
            "Review how natural the link profile looks",
            "Verify IP and TLD diversity",
        ],
        RiskLevel::LowModerate => &[
            "Review manually before deciding",
            "Look at how the metrics trend over time",
            "Verify topical relevance",
        ],
        RiskLevel::Low => &["Backlink profile looks natural"],
        RiskLevel::Insufficient => &["Collect more referring domains before judging this profile"],
        RiskLevel::LowWhitelist => &["Verified brand: suitable for link building"],
    };
    lines.iter().map(|line| line.to_string()).collect()
}

/// Share of the point ceiling, rounded to a whole percent.
pub(crate) fn risk_percent(points: u32, max_points: u32) -> u8 {
    if max_points == 0 {
        return 0;
    }
    let percent = (f64::from(points.min(max_points)) / f64::from(max_points) * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: RiskTiers = RiskTiers {
        high: 8,
        moderate: 5,
        low_moderate: 3,
    };

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(0, &TIERS), (RiskLevel::Low, RecommendedAction::Confiable));
        assert_eq!(classify(2, &TIERS), (RiskLevel::Low, RecommendedAction::Confiable));
        assert_eq!(
            classify(3, &TIERS),
            (RiskLevel::LowModerate, RecommendedAction::Precaucion)
        );
        assert_eq!(classify(5, &TIERS), (RiskLevel::Moderate, RecommendedAction::Revision));
        assert_eq!(classify(7, &TIERS), (RiskLevel::Moderate, RecommendedAction::Revision));
        assert_eq!(classify(8, &TIERS), (RiskLevel::High, RecommendedAction::Evitar));
        assert_eq!(classify(17, &TIERS), (RiskLevel::High, RecommendedAction::Evitar));
    }

    #[test]
    fn percent_rounds_against_ceiling() {
        assert_eq!(risk_percent(0, 17), 0);
        assert_eq!(risk_percent(8, 17), 47);
        assert_eq!(risk_percent(17, 17), 100);
        assert_eq!(risk_percent(40, 17), 100);
    }

    #[test]
    fn high_risk_recommends_avoiding() {
        let lines = recommendations(RiskLevel::High);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Avoid"));
    }
}
