use serde::{Deserialize, Serialize};

/// Strictness dial for the detector: 1 is the strictest, 10 the most lenient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FlexibilityLevel(u8);

impl FlexibilityLevel {
    pub const STRICTEST: FlexibilityLevel = FlexibilityLevel(1);
    pub const MOST_LENIENT: FlexibilityLevel = FlexibilityLevel(10);

    pub fn new(level: u8) -> Option<Self> {
        (1..=10).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position between the strict (0.0) and lenient (1.0) endpoints.
    pub fn factor(self) -> f64 {
        f64::from(self.0 - 1) / 9.0
    }
}

impl Default for FlexibilityLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for FlexibilityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("flexibility level {value} is outside 1..=10"))
    }
}

impl From<FlexibilityLevel> for u8 {
    fn from(value: FlexibilityLevel) -> Self {
        value.0
    }
}

/// Words that show up in the hostnames of mass-produced blog networks.
pub const SPAM_KEYWORDS: &[&str] = &[
    "review", "best", "top", "buy", "cheap", "discount", "blog", "news", "hub", "center",
    "network", "express",
];

/// Established brands whose link profiles are exempt from PBN heuristics.
pub const BRAND_ALLOW_LIST: &[&str] = &[
    "kommo.com",
    "amocrm.com",
    "hubspot.com",
    "salesforce.com",
    "zoho.com",
    "microsoft.com",
    "google.com",
    "facebook.com",
    "linkedin.com",
    "twitter.com",
    "instagram.com",
    "zapier.com",
    "notion.so",
    "notion.com",
    "slack.com",
    "asana.com",
    "trello.com",
    "calendly.com",
    "airtable.com",
    "medium.com",
    "wix.com",
    "wordpress.com",
    "spotify.com",
    "canva.com",
    "github.com",
    "gitlab.com",
    "stripe.com",
    "paypal.com",
    "tableau.com",
    "intercom.com",
];

/// Point ceiling every risk total is clamped to.
pub const MAX_RISK_POINTS: u32 = 17;

/// Cut-points on the clamped point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskTiers {
    pub high: u32,
    pub moderate: u32,
    pub low_moderate: u32,
}

/// Fixed positive signals and the most they may take off a penalty total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusRules {
    pub high_traffic: f64,
    pub high_traffic_points: u32,
    pub diverse_ips: f64,
    pub diverse_ips_points: u32,
    pub established_age_months: f64,
    pub established_age_points: u32,
    pub brand_anchor_share: f64,
    pub brand_anchor_points: u32,
    pub authority_tld_share: f64,
    pub authority_tld_points: u32,
    pub verified_brand_points: u32,
    pub max_reduction: u32,
}

impl Default for BonusRules {
    fn default() -> Self {
        Self {
            high_traffic: 50_000.0,
            high_traffic_points: 2,
            diverse_ips: 0.5,
            diverse_ips_points: 2,
            established_age_months: 60.0,
            established_age_points: 1,
            brand_anchor_share: 0.3,
            brand_anchor_points: 1,
            authority_tld_share: 0.05,
            authority_tld_points: 1,
            verified_brand_points: 2,
            max_reduction: 6,
        }
    }
}

/// Thresholds and penalty weights for one batch, derived from a single
/// [`FlexibilityLevel`]. Built once and shared read-only across records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionConfig {
    pub flexibility_level: FlexibilityLevel,
    pub min_refdomains_analysis: f64,
    pub max_points: u32,
    pub tiers: RiskTiers,

    pub high_density_threshold: f64,
    pub spam_density_threshold: f64,
    pub density_penalty: u32,

    pub ip_diversity_very_low: f64,
    pub ip_diversity_low: f64,
    pub ip_diversity_penalty: u32,

    pub growth_very_suspicious: f64,
    pub growth_suspicious: f64,
    pub growth_penalty: u32,

    pub dr_traffic_penalty: u32,

    pub dofollow_very_excessive: f64,
    pub dofollow_excessive: f64,
    pub dofollow_penalty: u32,

    pub very_young_months: f64,
    pub young_months: f64,
    pub young_domain_penalty: u32,

    pub ur_dr_discrepancy: f64,
    pub low_traffic_per_keyword: f64,

    pub tld_absence_penalty: u32,

    pub brand_anchor_min_ratio: f64,
    pub brand_anchor_penalty: u32,

    pub spam_pattern_count: usize,
    pub spam_keywords: Vec<String>,
    pub brand_allow_list: Vec<String>,

    pub bonus: BonusRules,
}

impl DetectionConfig {
    pub fn for_level(level: FlexibilityLevel) -> Self {
        let factor = level.factor();
        let span = |strict: f64, lenient: f64| strict + (lenient - strict) * factor;
        let weight = |strict: u32, lenient: u32| span(f64::from(strict), f64::from(lenient)).round() as u32;

        Self {
            flexibility_level: level,
            min_refdomains_analysis: span(15.0, 3.0).round(),
            max_points: MAX_RISK_POINTS,
            tiers: RiskTiers {
                high: 8,
                moderate: 5,
                low_moderate: 3,
            },

            high_density_threshold: span(20.0, 50.0),
            spam_density_threshold: span(10.0, 30.0),
            density_penalty: weight(4, 2),

            ip_diversity_very_low: span(0.15, 0.05),
            ip_diversity_low: span(0.30, 0.12),
            ip_diversity_penalty: weight(3, 1),

            growth_very_suspicious: span(50.0, 200.0),
            growth_suspicious: span(20.0, 100.0),
            growth_penalty: weight(3, 1),

            dr_traffic_penalty: weight(3, 1),

            dofollow_very_excessive: span(0.95, 0.99),
            dofollow_excessive: span(0.90, 0.97),
            dofollow_penalty: weight(3, 1),

            very_young_months: span(12.0, 4.0),
            young_months: span(24.0, 9.0),
            young_domain_penalty: weight(4, 2),

            ur_dr_discrepancy: span(0.5, 0.2),
            low_traffic_per_keyword: span(1.0, 0.2),

            tld_absence_penalty: weight(2, 1),

            brand_anchor_min_ratio: span(0.15, 0.05),
            brand_anchor_penalty: weight(3, 1),

            spam_pattern_count: span(1.0, 2.0).round() as usize,
            spam_keywords: SPAM_KEYWORDS.iter().map(|word| word.to_string()).collect(),
            brand_allow_list: BRAND_ALLOW_LIST.iter().map(|brand| brand.to_string()).collect(),

            bonus: BonusRules::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::for_level(FlexibilityLevel::default())
    }
}
