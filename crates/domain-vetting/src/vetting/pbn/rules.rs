use super::super::record::{DerivedMetrics, DomainRecord};
use super::config::DetectionConfig;
use thiserror::Error;

const DR_TRAFFIC_MIN_DR: f64 = 45.0;
const DR_TRAFFIC_FLOOR: f64 = 300.0;
const DR_TRAFFIC_PER_DR: f64 = 8.0;
const DOFOLLOW_FULL_MIN_REFDOMAINS: f64 = 25.0;
const DOFOLLOW_PARTIAL_MIN_REFDOMAINS: f64 = 15.0;
const YOUNG_FULL_MIN_DR: f64 = 45.0;
const YOUNG_PARTIAL_MIN_DR: f64 = 55.0;
const UR_DR_MIN_DR: f64 = 35.0;
const KEYWORDS_MIN: f64 = 80.0;
const KEYWORDS_MIN_SAMPLE: f64 = 150.0;
const TLD_ABSENCE_MIN_REFDOMAINS: f64 = 40.0;
const BRAND_ANCHOR_MIN_REFDOMAINS: f64 = 25.0;

const BRAND_DENSITY_SCALE: f64 = 0.7;
const BRAND_DIVERSITY_SCALE: f64 = 1.2;
const BRAND_GROWTH_SCALE: f64 = 1.3;
const BRAND_TRAFFIC_SCALE: f64 = 1.5;
const BRAND_AGE_SCALE: f64 = 0.8;
const BRAND_ANCHOR_SCALE: f64 = 1.5;

/// What every check sees: the cleaned record, its derived ratios and the brand verdict.
pub(crate) struct Subject<'a> {
    pub record: &'a DomainRecord,
    pub metrics: &'a DerivedMetrics,
    pub verified_brand: bool,
}

/// Points a check contributes and the notes explaining them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CheckOutcome {
    pub points: u32,
    pub factors: Vec<String>,
}

impl CheckOutcome {
    fn flagged(points: u32, factor: String) -> Self {
        Self {
            points,
            factors: vec![factor],
        }
    }

    fn clear(note: String) -> Self {
        Self {
            points: 0,
            factors: vec![note],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CheckError {
    #[error("{metric} is zero, so the ratio is undefined")]
    ZeroDenominator { metric: &'static str },
    #[error("{metric} is not reported by the export")]
    MissingInput { metric: &'static str },
    #[error("{metric} evaluated to a non-finite value")]
    NonFinite { metric: &'static str },
}

pub(crate) type CheckFn = fn(&Subject<'_>, &DetectionConfig) -> Result<CheckOutcome, CheckError>;

/// Penalty checks in evaluation order. Each one is independent of the others.
pub(crate) const CHECKS: [(&str, CheckFn); 11] = [
    ("backlink_density", backlink_density),
    ("ip_diversity", ip_diversity),
    ("growth_rate", growth_rate),
    ("dr_traffic_discrepancy", dr_traffic_discrepancy),
    ("dofollow_ratio", dofollow_ratio),
    ("young_domain_authority", young_domain_authority),
    ("url_rating_ratio", url_rating_ratio),
    ("keyword_traffic", keyword_traffic),
    ("authority_tld_absence", authority_tld_absence),
    ("brand_anchor_shortfall", brand_anchor_shortfall),
    ("spam_pattern", spam_pattern),
];

/// Weight of the secondary trigger; a partial signal always costs at least a point.
fn moderate(weight: u32) -> u32 {
    weight.saturating_sub(1).max(1)
}

fn brand_scaled(value: f64, verified_brand: bool, scale: f64) -> f64 {
    if verified_brand {
        value * scale
    } else {
        value
    }
}

fn finite(value: f64, metric: &'static str) -> Result<f64, CheckError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CheckError::NonFinite { metric })
    }
}

fn backlink_density(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    if subject.record.refdomains_all <= 0.0 {
        return Err(CheckError::ZeroDenominator {
            metric: "refdomains_all",
        });
    }
    let density = finite(subject.metrics.backlink_density, "backlink_density")?;
    let high = brand_scaled(config.high_density_threshold, subject.verified_brand, BRAND_DENSITY_SCALE);
    let spam = brand_scaled(config.spam_density_threshold, subject.verified_brand, BRAND_DENSITY_SCALE);

    Ok(if density > high {
        CheckOutcome::flagged(
            config.density_penalty,
            format!("High backlink density ({density:.1} per referring domain): artificial pattern"),
        )
    } else if density > spam {
        CheckOutcome::flagged(
            moderate(config.density_penalty),
            format!("Elevated backlink density ({density:.1} per referring domain)"),
        )
    } else {
        CheckOutcome::clear(format!(
            "Backlink density normal ({density:.1} per referring domain)"
        ))
    })
}

fn ip_diversity(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    if subject.record.ref_ips <= 0.0 {
        return Err(CheckError::MissingInput { metric: "ref_ips" });
    }
    let diversity = finite(subject.metrics.ref_ip_diversity, "ref_ip_diversity")?;
    let very_low = brand_scaled(config.ip_diversity_very_low, subject.verified_brand, BRAND_DIVERSITY_SCALE);
    let low = brand_scaled(config.ip_diversity_low, subject.verified_brand, BRAND_DIVERSITY_SCALE);
    let percent = diversity * 100.0;

    Ok(if diversity < very_low {
        CheckOutcome::flagged(
            config.ip_diversity_penalty,
            format!("Very low IP diversity ({percent:.1}% subnets per IP): concentrated hosting"),
        )
    } else if diversity < low {
        CheckOutcome::flagged(
            moderate(config.ip_diversity_penalty),
            format!("Low IP diversity ({percent:.1}% subnets per IP)"),
        )
    } else {
        CheckOutcome::clear(format!("IP diversity acceptable ({percent:.1}%)"))
    })
}

fn growth_rate(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    let Some(rate) = subject.metrics.domains_per_month else {
        return Ok(CheckOutcome::default());
    };
    let rate = finite(rate, "domains_per_month")?;
    let very = brand_scaled(config.growth_very_suspicious, subject.verified_brand, BRAND_GROWTH_SCALE);
    let suspicious = brand_scaled(config.growth_suspicious, subject.verified_brand, BRAND_GROWTH_SCALE);

    Ok(if rate > very {
        CheckOutcome::flagged(
            config.growth_penalty,
            format!("Very fast referring-domain growth ({rate:.1} per month)"),
        )
    } else if rate > suspicious {
        CheckOutcome::flagged(
            moderate(config.growth_penalty),
            format!("Fast referring-domain growth ({rate:.1} per month)"),
        )
    } else {
        CheckOutcome::clear(format!("Referring-domain growth steady ({rate:.1} per month)"))
    })
}

fn dr_traffic_discrepancy(
    subject: &Subject<'_>,
    config: &DetectionConfig,
) -> Result<CheckOutcome, CheckError> {
    let dr = subject.record.dr;
    let traffic = subject.record.organic_traffic;
    let expected = brand_scaled(
        DR_TRAFFIC_FLOOR.max(dr * DR_TRAFFIC_PER_DR),
        subject.verified_brand,
        BRAND_TRAFFIC_SCALE,
    );

    Ok(if dr > DR_TRAFFIC_MIN_DR && traffic < expected {
        CheckOutcome::flagged(
            config.dr_traffic_penalty,
            format!(
                "High DR ({dr:.0}) but low organic traffic ({traffic:.0}): authority possibly artificial"
            ),
        )
    } else {
        CheckOutcome::default()
    })
}

fn dofollow_ratio(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    let ratio = finite(subject.metrics.pct_backlinks_followed, "pct_backlinks_followed")?;
    let refdomains = subject.record.refdomains_all;
    let percent = ratio * 100.0;

    Ok(
        if ratio > config.dofollow_very_excessive && refdomains > DOFOLLOW_FULL_MIN_REFDOMAINS {
            CheckOutcome::flagged(
                config.dofollow_penalty,
                format!("Dofollow share extremely high ({percent:.2}%)"),
            )
        } else if ratio > config.dofollow_excessive && refdomains > DOFOLLOW_PARTIAL_MIN_REFDOMAINS {
            CheckOutcome::flagged(
                moderate(config.dofollow_penalty),
                format!("Dofollow share high ({percent:.2}%): review link mix"),
            )
        } else {
            CheckOutcome::default()
        },
    )
}

fn young_domain_authority(
    subject: &Subject<'_>,
    config: &DetectionConfig,
) -> Result<CheckOutcome, CheckError> {
    let age = subject.record.domain_age_months;
    if age <= 0.0 {
        return Ok(CheckOutcome::default());
    }
    let dr = subject.record.dr;
    let very_young = brand_scaled(config.very_young_months, subject.verified_brand, BRAND_AGE_SCALE);
    let young = brand_scaled(config.young_months, subject.verified_brand, BRAND_AGE_SCALE);

    Ok(if age < very_young && dr > YOUNG_FULL_MIN_DR {
        CheckOutcome::flagged(
            config.young_domain_penalty,
            format!("Very young domain ({age:.1} months) with DR {dr:.0}: possible fresh PBN"),
        )
    } else if age < young && dr > YOUNG_PARTIAL_MIN_DR {
        CheckOutcome::flagged(
            moderate(config.young_domain_penalty),
            format!("Young domain ({age:.1} months) with DR {dr:.0}"),
        )
    } else {
        CheckOutcome::default()
    })
}

fn url_rating_ratio(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    let dr = subject.record.dr;
    if dr <= 0.0 {
        return Err(CheckError::ZeroDenominator { metric: "dr" });
    }
    let ratio = finite(subject.record.url_rating / dr, "url_rating_ratio")?;

    Ok(if ratio < config.ur_dr_discrepancy && dr > UR_DR_MIN_DR {
        CheckOutcome::flagged(
            1,
            format!(
                "URL Rating ({:.0}) far below DR ({dr:.0})",
                subject.record.url_rating
            ),
        )
    } else {
        CheckOutcome::default()
    })
}

fn keyword_traffic(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    let keywords = subject.record.organic_keywords;
    if keywords <= KEYWORDS_MIN {
        return Ok(CheckOutcome::default());
    }
    let per_keyword = finite(subject.record.organic_traffic / keywords, "traffic_per_keyword")?;

    Ok(
        if per_keyword < config.low_traffic_per_keyword && keywords > KEYWORDS_MIN_SAMPLE {
            CheckOutcome::flagged(
                1,
                format!(
                    "{keywords:.0} ranking keywords but only {per_keyword:.2} visits per keyword"
                ),
            )
        } else {
            CheckOutcome::default()
        },
    )
}

fn authority_tld_absence(
    subject: &Subject<'_>,
    config: &DetectionConfig,
) -> Result<CheckOutcome, CheckError> {
    Ok(
        if subject.record.pct_authority_tlds == 0.0
            && subject.record.refdomains_all > TLD_ABSENCE_MIN_REFDOMAINS
        {
            CheckOutcome::flagged(
                config.tld_absence_penalty,
                "No links from authority TLDs (.edu/.gov/.org)".to_string(),
            )
        } else {
            CheckOutcome::default()
        },
    )
}

fn brand_anchor_shortfall(
    subject: &Subject<'_>,
    config: &DetectionConfig,
) -> Result<CheckOutcome, CheckError> {
    let share = subject.record.pct_brand_anchors;
    let minimum = brand_scaled(config.brand_anchor_min_ratio, subject.verified_brand, BRAND_ANCHOR_SCALE);

    Ok(
        if share < minimum && subject.record.refdomains_all > BRAND_ANCHOR_MIN_REFDOMAINS {
            CheckOutcome::flagged(
                config.brand_anchor_penalty,
                format!(
                    "Low branded anchor share ({:.1}%): possible over-optimization",
                    share * 100.0
                ),
            )
        } else {
            CheckOutcome::default()
        },
    )
}

fn spam_pattern(subject: &Subject<'_>, config: &DetectionConfig) -> Result<CheckOutcome, CheckError> {
    let hits = spam_keyword_hits(&subject.record.target, &config.spam_keywords);

    Ok(if !hits.is_empty() && hits.len() >= config.spam_pattern_count {
        CheckOutcome::flagged(
            1,
            format!("Domain name follows a typical PBN pattern ({})", hits.join(", ")),
        )
    } else {
        CheckOutcome::default()
    })
}

/// Keywords that appear as whole tokens of the hostname, in keyword-list order.
pub(crate) fn spam_keyword_hits(target: &str, keywords: &[String]) -> Vec<String> {
    let host = super::super::brand::hostname(target);
    let tokens: Vec<&str> = host
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    keywords
        .iter()
        .filter(|keyword| tokens.iter().any(|token| token == &keyword.as_str()))
        .cloned()
        .collect()
}

/// Positive signals; the caller caps how much they may offset.
pub(crate) fn authority_bonus(subject: &Subject<'_>, config: &DetectionConfig) -> CheckOutcome {
    let rules = &config.bonus;
    let record = subject.record;
    let mut outcome = CheckOutcome::default();

    let mut award = |fired: bool, points: u32, note: &str| {
        if fired {
            outcome.points += points;
            outcome.factors.push(note.to_string());
        }
    };

    award(
        record.organic_traffic >= rules.high_traffic,
        rules.high_traffic_points,
        "High organic traffic: positive signal",
    );
    award(
        subject.metrics.ref_ip_diversity >= rules.diverse_ips,
        rules.diverse_ips_points,
        "Diverse referring IPs: positive signal",
    );
    award(
        record.domain_age_months >= rules.established_age_months,
        rules.established_age_points,
        "Established domain age: positive signal",
    );
    award(
        record.pct_brand_anchors >= rules.brand_anchor_share,
        rules.brand_anchor_points,
        "Healthy branded anchor share: positive signal",
    );
    award(
        record.pct_authority_tlds >= rules.authority_tld_share,
        rules.authority_tld_points,
        "Links from authority TLDs: positive signal",
    );
    award(
        subject.verified_brand,
        rules.verified_brand_points,
        "Verified brand: positive signal",
    );

    outcome
}
