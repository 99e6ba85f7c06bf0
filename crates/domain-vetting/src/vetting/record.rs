use super::mapping::{CanonicalField, ColumnMapping};
use super::normalizer::{domain_age_months, numeric_value, percentage_fraction};
use super::table::{CellValue, RecordSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dofollow share assumed when an export has no usable backlink split.
pub const DEFAULT_DOFOLLOW_SHARE: f64 = 0.8;

/// Cleaned metrics for one input row. Every field is non-negative and percentage
/// fields are fractions in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainRecord {
    pub target: String,
    pub dr: f64,
    pub organic_traffic: f64,
    pub organic_keywords: f64,
    pub refdomains_all: f64,
    pub refdomains_followed: f64,
    pub refdomains_nofollowed: f64,
    pub backlinks_all: f64,
    pub backlinks_followed: f64,
    pub backlinks_nofollow: f64,
    pub ref_ips: f64,
    pub ref_subnets: f64,
    pub url_rating: f64,
    pub ahrefs_rank: f64,
    pub pct_authority_tlds: f64,
    pub pct_brand_anchors: f64,
    pub domain_age_months: f64,
}

impl DomainRecord {
    /// Builds the record for `row`, substituting the row ordinal when no column
    /// carries the domain or the row leaves it blank.
    pub fn from_row(
        records: &RecordSet,
        mapping: &ColumnMapping,
        row: usize,
        today: NaiveDate,
    ) -> Self {
        let cell = |field: CanonicalField| field_cell(records, mapping, row, field);
        let number = |field: CanonicalField| numeric_value(cell(field));

        let target = mapping
            .column_index(CanonicalField::Target)
            .map(|column| records.cell(row, column).display())
            .filter(|target| !target.is_empty())
            .unwrap_or_else(|| row.to_string());

        Self {
            target,
            dr: number(CanonicalField::Dr),
            organic_traffic: number(CanonicalField::OrganicTraffic),
            organic_keywords: number(CanonicalField::OrganicKeywords),
            refdomains_all: number(CanonicalField::RefdomainsAll),
            refdomains_followed: number(CanonicalField::RefdomainsFollowed),
            refdomains_nofollowed: number(CanonicalField::RefdomainsNofollowed),
            backlinks_all: number(CanonicalField::BacklinksAll),
            backlinks_followed: number(CanonicalField::BacklinksFollowed),
            backlinks_nofollow: number(CanonicalField::BacklinksNofollow),
            ref_ips: number(CanonicalField::RefIps),
            ref_subnets: number(CanonicalField::RefSubnets),
            url_rating: number(CanonicalField::UrlRating),
            ahrefs_rank: number(CanonicalField::AhrefsRank),
            pct_authority_tlds: percentage_fraction(cell(CanonicalField::PctAuthorityTlds)),
            pct_brand_anchors: percentage_fraction(cell(CanonicalField::PctBrandAnchors)),
            domain_age_months: domain_age_months(cell(CanonicalField::DomainAge), today),
        }
    }

    pub fn domain_age_years(&self) -> f64 {
        self.domain_age_months / 12.0
    }

    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics::from_record(self)
    }
}

/// Ratio and rate features shared by the trust scorer and the PBN detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub pct_backlinks_followed: f64,
    pub pct_backlinks_nofollow: f64,
    pub ref_ip_diversity: f64,
    /// `None` when the domain age is unknown, which reads as an unbounded rate.
    pub domains_per_month: Option<f64>,
    pub backlink_density: f64,
    pub refdomains_per_backlink: f64,
    pub pct_refdomains_followed: f64,
    pub pct_refdomains_nofollowed: f64,
    pub traffic_per_refdomain: f64,
}

impl DerivedMetrics {
    pub fn from_record(record: &DomainRecord) -> Self {
        let (pct_backlinks_followed, pct_backlinks_nofollow) = follow_split(record);

        Self {
            pct_backlinks_followed,
            pct_backlinks_nofollow,
            ref_ip_diversity: ratio(record.ref_subnets, record.ref_ips),
            domains_per_month: (record.domain_age_months > 0.0)
                .then(|| record.refdomains_all / record.domain_age_months),
            backlink_density: ratio(record.backlinks_all, record.refdomains_all),
            refdomains_per_backlink: ratio(record.refdomains_all, record.backlinks_all),
            pct_refdomains_followed: ratio(record.refdomains_followed, record.refdomains_all),
            pct_refdomains_nofollowed: ratio(record.refdomains_nofollowed, record.refdomains_all),
            traffic_per_refdomain: ratio(record.organic_traffic, record.refdomains_all),
        }
    }
}

fn field_cell<'a>(
    records: &'a RecordSet,
    mapping: &ColumnMapping,
    row: usize,
    field: CanonicalField,
) -> &'a CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    match mapping.column_index(field) {
        Some(column) => records.cell(row, column),
        None => &EMPTY,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Nofollow count wins when present; the followed share is always its complement.
fn follow_split(record: &DomainRecord) -> (f64, f64) {
    if record.backlinks_all <= 0.0 {
        return (DEFAULT_DOFOLLOW_SHARE, 1.0 - DEFAULT_DOFOLLOW_SHARE);
    }

    if record.backlinks_nofollow > 0.0 {
        let nofollow = (record.backlinks_nofollow / record.backlinks_all).min(1.0);
        (1.0 - nofollow, nofollow)
    } else if record.backlinks_followed > 0.0 {
        let followed = (record.backlinks_followed / record.backlinks_all).min(1.0);
        (followed, 1.0 - followed)
    } else {
        (DEFAULT_DOFOLLOW_SHARE, 1.0 - DEFAULT_DOFOLLOW_SHARE)
    }
}
