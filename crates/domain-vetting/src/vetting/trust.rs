use super::record::{DerivedMetrics, DomainRecord};
use serde::{Deserialize, Serialize};

/// Domains at or below this rating are rejected before scoring.
pub const MIN_DOMAIN_RATING: f64 = 30.0;

const DR_QUALITY_WEIGHT: f64 = 0.35;
const TRAFFIC_AUTHORITY_WEIGHT: f64 = 0.25;
const LINK_PROFILE_WEIGHT: f64 = 0.20;
const TRUST_SIGNALS_WEIGHT: f64 = 0.20;

/// Human-facing band for a trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLabel {
    Rejected,
    Risky,
    Acceptable,
    Excellent,
    /// Excellent because the domain is a verified brand.
    VerifiedBrand,
}

impl TrustLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => TrustLabel::Excellent,
            50..=74 => TrustLabel::Acceptable,
            _ => TrustLabel::Risky,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrustLabel::Rejected => "Not acceptable: DR below 30",
            TrustLabel::Risky => "Risky: little authority or possible spam",
            TrustLabel::Acceptable => "Acceptable: decent domain",
            TrustLabel::Excellent => "Excellent: strong, trustworthy domain",
            TrustLabel::VerifiedBrand => "Excellent: legitimate brand / whitelist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub trust_score: u8,
    pub trust_label: TrustLabel,
    pub trust_reason: Vec<String>,
}

/// Weighted parts of the composite, each already on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrustComponents {
    pub dr_quality: f64,
    pub traffic_authority: f64,
    pub link_profile: f64,
    pub trust_signals: f64,
}

impl TrustComponents {
    fn compute(record: &DomainRecord, metrics: &DerivedMetrics) -> Self {
        Self {
            dr_quality: record.dr.min(100.0),
            traffic_authority: traffic_authority(record),
            link_profile: link_profile(record, metrics),
            trust_signals: trust_signals(record),
        }
    }

    fn weighted_sum(&self) -> f64 {
        self.dr_quality * DR_QUALITY_WEIGHT
            + self.traffic_authority * TRAFFIC_AUTHORITY_WEIGHT
            + self.link_profile * LINK_PROFILE_WEIGHT
            + self.trust_signals * TRUST_SIGNALS_WEIGHT
    }
}

pub fn score_trust(record: &DomainRecord, metrics: &DerivedMetrics) -> ScoreResult {
    if record.dr <= MIN_DOMAIN_RATING {
        return ScoreResult {
            trust_score: 0,
            trust_label: TrustLabel::Rejected,
            trust_reason: vec![format!(
                "DR ({:.0}) does not meet the minimum of {:.0}",
                record.dr, MIN_DOMAIN_RATING
            )],
        };
    }

    let raw = TrustComponents::compute(record, metrics).weighted_sum();
    let trust_score = raw.round().clamp(1.0, 100.0) as u8;

    ScoreResult {
        trust_score,
        trust_label: TrustLabel::from_score(trust_score),
        trust_reason: reasons(record, metrics),
    }
}

fn traffic_authority(record: &DomainRecord) -> f64 {
    let traffic = record.organic_traffic;
    let base = if traffic > 0.0 {
        (traffic.log10() * 25.0).min(100.0)
    } else {
        0.0
    };
    let expected = record.dr * 1000.0;
    let quality = if expected > 0.0 {
        (traffic / expected).min(2.0)
    } else {
        1.0
    };
    (base * quality).clamp(0.0, 100.0)
}

fn link_profile(record: &DomainRecord, metrics: &DerivedMetrics) -> f64 {
    let diversity = (metrics.ref_ip_diversity * 100.0).min(100.0) * 0.3;

    let ratio_quality = if record.backlinks_all > 0.0 {
        let ratio = record.refdomains_all / record.backlinks_all;
        if (0.05..=0.5).contains(&ratio) {
            100.0
        } else {
            (100.0 - (ratio - 0.2).abs() * 500.0).max(0.0)
        }
    } else {
        0.0
    };

    let anchors = (record.pct_brand_anchors * 200.0).min(100.0) * 0.2;
    let follow = if (0.7..=0.9).contains(&metrics.pct_backlinks_followed) {
        100.0
    } else {
        50.0
    };

    (diversity + ratio_quality * 0.3 + anchors + follow * 0.2).min(100.0)
}

fn trust_signals(record: &DomainRecord) -> f64 {
    let age = (record.domain_age_years() / 20.0 * 100.0).min(100.0);
    let tlds = (record.pct_authority_tlds * 500.0).min(100.0);
    let url_rating = (record.url_rating * 2.5).min(100.0);
    (age * 0.4 + tlds * 0.3 + url_rating * 0.3).min(100.0)
}

fn reasons(record: &DomainRecord, metrics: &DerivedMetrics) -> Vec<String> {
    let mut parts = Vec::new();
    let mut push = |present: bool, text: String| {
        if present {
            parts.push(text);
        }
    };

    push(record.dr > 0.0, format!("DR: {:.0}", record.dr));
    push(
        record.organic_traffic > 0.0,
        format!("Traffic: {:.0}", record.organic_traffic),
    );
    push(
        record.refdomains_all > 0.0,
        format!("Referring domains: {:.0}", record.refdomains_all),
    );
    push(
        metrics.pct_backlinks_followed > 0.0,
        format!("Dofollow: {:.1}%", metrics.pct_backlinks_followed * 100.0),
    );
    push(
        metrics.pct_backlinks_nofollow > 0.0,
        format!("Nofollow: {:.1}%", metrics.pct_backlinks_nofollow * 100.0),
    );
    push(
        record.domain_age_months > 0.0,
        format!("Age: {:.1} years", record.domain_age_years()),
    );
    push(
        record.pct_authority_tlds > 0.0,
        format!("Authority TLDs: {:.1}%", record.pct_authority_tlds * 100.0),
    );
    push(
        record.pct_brand_anchors > 0.0,
        format!("Brand anchors: {:.1}%", record.pct_brand_anchors * 100.0),
    );
    push(
        record.url_rating > 0.0,
        format!("URL Rating: {:.0}", record.url_rating),
    );

    parts
}
