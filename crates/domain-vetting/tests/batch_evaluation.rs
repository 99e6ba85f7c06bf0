use chrono::NaiveDate;
use domain_vetting::vetting::{
    write_csv, FlexibilityLevel, MetricsImporter, RecommendedAction, RiskLevel, TrustLabel,
    VettingEngine,
};

const AHREFS_EXPORT: &str = "\u{feff}Target,Domain Rating,Organic / Traffic,Ref. domains / All,Backlinks / All,Ref. IPs / IPs,Ref. IPs / Subnets,Domain Age,Brand Anchors,Authority TLDs,URL Rating\n\
example.com,65,\"80,000\",3000,9000,500,200,2015-01-01,45,2,55\n\
pbn-candidate.net,55,200,50,2000,10,1,0.3,0.02,,\n\
https://www.notion.so/templates,28,N/A,12,40,,,2019,-,,\n";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn engine(level: u8) -> VettingEngine {
    VettingEngine::with_today(FlexibilityLevel::new(level).expect("valid level"), today())
}

#[test]
fn csv_batch_scores_every_row_in_order() {
    let records = MetricsImporter::new(100)
        .from_reader(AHREFS_EXPORT.as_bytes())
        .expect("export imports");

    let assessments = engine(6).evaluate(&records).expect("batch evaluates");
    assert_eq!(assessments.len(), 3);

    let established = &assessments[0];
    assert_eq!(established.score.trust_score, 75);
    assert_eq!(established.score.trust_label, TrustLabel::Excellent);
    assert_eq!(established.pbn.risk_level, RiskLevel::Low);
    assert_eq!(established.pbn.action, RecommendedAction::Confiable);

    let brand = &assessments[2];
    assert_eq!(brand.target, "https://www.notion.so/templates");
    assert!(brand.pbn.is_verified_brand);
    assert_eq!(brand.score.trust_score, 75);
    assert_eq!(brand.pbn.risk_level, RiskLevel::LowWhitelist);
    assert_eq!(brand.record.domain_age_months, 84.0);
}

#[test]
fn network_member_is_avoided_at_strictest_level() {
    let records = MetricsImporter::new(100)
        .from_reader(AHREFS_EXPORT.as_bytes())
        .expect("export imports");

    let assessments = engine(1).evaluate(&records).expect("batch evaluates");
    let network = &assessments[1];

    assert_eq!(network.pbn.risk_level, RiskLevel::High);
    assert_eq!(network.pbn.action, RecommendedAction::Evitar);
    assert_eq!(network.pbn.risk_percent, 100);
    for alert in [
        "High backlink density",
        "Very low IP diversity",
        "Very young domain",
        "Low branded anchor share",
    ] {
        assert!(network.pbn.alerts.iter().any(|a| a.starts_with(alert)));
    }
}

#[test]
fn batch_limit_caps_rows_before_scoring() {
    let records = MetricsImporter::new(2)
        .from_reader(AHREFS_EXPORT.as_bytes())
        .expect("export imports");

    let assessments = engine(5).evaluate(&records).expect("batch evaluates");
    assert_eq!(assessments.len(), 2);
    assert_eq!(assessments[1].target, "pbn-candidate.net");
}

#[test]
fn assessments_serialize_with_flat_verdict_fields() {
    let records = MetricsImporter::new(100)
        .from_reader(AHREFS_EXPORT.as_bytes())
        .expect("export imports");
    let assessments = engine(6).evaluate(&records).expect("batch evaluates");

    let json = serde_json::to_value(&assessments[0]).expect("serializes");
    assert_eq!(json["row"], 0);
    assert_eq!(json["trust_score"], 75);
    assert_eq!(json["trust_label"], "excellent");
    assert_eq!(json["risk_level"], "low");
    assert_eq!(json["action"], "confiable");
    assert_eq!(json["record"]["dr"], 65.0);

    let mut csv = Vec::new();
    write_csv(&mut csv, &assessments).expect("csv export");
    let text = String::from_utf8(csv).expect("utf-8 output");
    assert!(text.starts_with("Dominio,Domain Rating,Organic / Traffic"));
}
