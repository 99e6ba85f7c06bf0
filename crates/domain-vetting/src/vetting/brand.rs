use super::pbn::{PbnResult, RecommendedAction, RiskLevel};
use super::record::DomainRecord;
use super::trust::{ScoreResult, TrustLabel};

/// Trust score a verified brand is lifted to.
pub const BRAND_TRUST_FLOOR: u8 = 75;

const BRAND_MIN_DR: f64 = 70.0;
const BRAND_MIN_TRAFFIC: f64 = 50_000.0;
const BRAND_MIN_ANCHOR_SHARE: f64 = 0.4;
const BRAND_MIN_AGE_YEARS: f64 = 3.0;

pub const BRAND_NOTE: &str = "Legitimate brand / whitelisted domain detected";

/// Bare lower-case host of a target: no scheme, no leading `www.`, no port or path.
pub fn hostname(target: &str) -> String {
    let lowered = target.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www
        .split(['/', '?', '#', ':'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A domain is a verified brand when its host is on (or under) the allow-list,
/// or when its metrics look like an established brand.
pub fn is_verified_brand(record: &DomainRecord, allow_list: &[String]) -> bool {
    let host = hostname(&record.target);
    let listed = !host.is_empty()
        && allow_list.iter().any(|brand| {
            let brand = brand.trim().to_lowercase();
            host == brand || host.ends_with(&format!(".{brand}"))
        });

    listed
        || (record.dr >= BRAND_MIN_DR
            && record.organic_traffic >= BRAND_MIN_TRAFFIC
            && record.pct_brand_anchors >= BRAND_MIN_ANCHOR_SHARE
            && record.domain_age_years() >= BRAND_MIN_AGE_YEARS)
}

/// Forces both verdicts to the trustworthy extreme. Applying it twice changes nothing.
pub fn apply_override(score: &mut ScoreResult, pbn: &mut PbnResult) {
    score.trust_score = score.trust_score.max(BRAND_TRUST_FLOOR);
    score.trust_label = TrustLabel::VerifiedBrand;

    pbn.risk_points = 0;
    pbn.risk_percent = 0;
    pbn.risk_level = RiskLevel::LowWhitelist;
    pbn.action = RecommendedAction::Confiable;
    pbn.alerts = vec![BRAND_NOTE.to_string()];
    pbn.recommendations = vec![BRAND_NOTE.to_string()];
    pbn.is_verified_brand = true;
}
