use chrono::NaiveDate;

use crate::vetting::{
    CellValue, DomainRecord, FlexibilityLevel, PbnDetector, RecordSet, VettingEngine,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn level(value: u8) -> FlexibilityLevel {
    FlexibilityLevel::new(value).expect("valid flexibility level")
}

pub(super) fn detector(value: u8) -> PbnDetector {
    PbnDetector::for_level(level(value))
}

pub(super) fn engine(value: u8) -> VettingEngine {
    VettingEngine::with_today(level(value), today())
}

/// Mature editorial site with a natural link profile.
pub(super) fn established_record() -> DomainRecord {
    DomainRecord {
        target: "example.com".to_string(),
        dr: 65.0,
        organic_traffic: 80_000.0,
        refdomains_all: 3000.0,
        backlinks_all: 9000.0,
        ref_ips: 500.0,
        ref_subnets: 200.0,
        domain_age_months: 141.6,
        pct_brand_anchors: 0.45,
        pct_authority_tlds: 0.02,
        url_rating: 55.0,
        ..DomainRecord::default()
    }
}

/// Young, link-dense site on a handful of IPs: the classic network member.
pub(super) fn network_record() -> DomainRecord {
    DomainRecord {
        target: "pbn-candidate.net".to_string(),
        dr: 55.0,
        organic_traffic: 200.0,
        refdomains_all: 50.0,
        backlinks_all: 2000.0,
        ref_ips: 10.0,
        ref_subnets: 1.0,
        domain_age_months: 3.6,
        pct_brand_anchors: 0.0002,
        ..DomainRecord::default()
    }
}

pub(super) fn ahrefs_headers() -> Vec<String> {
    [
        "Target",
        "Domain Rating",
        "Organic / Traffic",
        "Ref. domains / All",
        "Backlinks / All",
        "Ref. IPs / IPs",
        "Ref. IPs / Subnets",
        "Domain Age",
        "Brand Anchors",
        "Authority TLDs",
        "URL Rating",
    ]
    .iter()
    .map(|header| header.to_string())
    .collect()
}

pub(super) fn established_row() -> Vec<CellValue> {
    vec![
        CellValue::from("example.com"),
        CellValue::from(65.0),
        CellValue::from("80,000"),
        CellValue::from(3000.0),
        CellValue::from(9000.0),
        CellValue::from(500.0),
        CellValue::from(200.0),
        CellValue::from("2015-01-01"),
        CellValue::from(45.0),
        CellValue::from(2.0),
        CellValue::from(55.0),
    ]
}

pub(super) fn network_row() -> Vec<CellValue> {
    vec![
        CellValue::from("pbn-candidate.net"),
        CellValue::from(55.0),
        CellValue::from(200.0),
        CellValue::from(50.0),
        CellValue::from(2000.0),
        CellValue::from(10.0),
        CellValue::from(1.0),
        CellValue::from(0.3),
        CellValue::from(0.02),
        CellValue::Empty,
        CellValue::Empty,
    ]
}

pub(super) fn ahrefs_sheet(rows: Vec<Vec<CellValue>>) -> RecordSet {
    RecordSet::new(ahrefs_headers(), rows).expect("valid record set")
}
