use super::pbn::RiskLevel;
use super::DomainAssessment;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::io::Write;

/// Column headers of the downloadable report, matching the spreadsheet link builders already use.
pub const EXPORT_COLUMNS: [&str; 16] = [
    "Dominio",
    "Domain Rating",
    "Organic / Traffic",
    "Domain Age (años)",
    "Ref. domains / All",
    "Backlinks / All",
    "URL Rating",
    "Organic / Total Keywords",
    "Trust Score (0-100)",
    "Trust Score - Nivel",
    "Trust Score - Factores",
    "PBN - Puntos Sospecha",
    "PBN - Nivel de Riesgo",
    "PBN - Alertas",
    "PBN - Recomendaciones",
    "Es Marca (Whitelist/Metricas)",
];

const HIGH_RISK_POINTS: u32 = 8;
const EXCELLENT_SCORE: u8 = 75;

/// Headline counts for a scored batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub high_risk: usize,
    pub excellent: usize,
    pub verified_brands: usize,
    pub insufficient_data: usize,
}

impl BatchSummary {
    pub fn from_assessments(assessments: &[DomainAssessment]) -> Self {
        assessments
            .iter()
            .fold(Self::default(), |mut summary, assessment| {
                summary.analyzed += 1;
                if assessment.pbn.risk_points >= HIGH_RISK_POINTS {
                    summary.high_risk += 1;
                }
                if assessment.score.trust_score >= EXCELLENT_SCORE {
                    summary.excellent += 1;
                }
                if assessment.pbn.is_verified_brand {
                    summary.verified_brands += 1;
                }
                if assessment.pbn.risk_level == RiskLevel::Insufficient {
                    summary.insufficient_data += 1;
                }
                summary
            })
    }
}

/// Best candidates first: highest trust score, then most risk points among equals.
pub fn sort_for_display(assessments: &mut [DomainAssessment]) {
    assessments.sort_by_key(|assessment| {
        (
            Reverse(assessment.score.trust_score),
            Reverse(assessment.pbn.risk_points),
        )
    });
}

/// Writes one CSV row per assessment and returns how many were written.
pub fn write_csv<W: Write>(writer: W, assessments: &[DomainAssessment]) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;

    for assessment in assessments {
        let record = &assessment.record;
        csv_writer.write_record([
            assessment.target.clone(),
            format!("{:.0}", record.dr),
            format!("{:.0}", record.organic_traffic),
            format!("{:.1}", record.domain_age_years()),
            format!("{:.0}", record.refdomains_all),
            format!("{:.0}", record.backlinks_all),
            format!("{:.0}", record.url_rating),
            format!("{:.0}", record.organic_keywords),
            assessment.score.trust_score.to_string(),
            assessment.score.trust_label.label().to_string(),
            assessment.score.trust_reason.join("\n"),
            assessment.pbn.risk_points.to_string(),
            assessment.pbn.risk_level.label().to_string(),
            assessment.pbn.alerts.join("\n"),
            assessment.pbn.recommendations.join("\n"),
            if assessment.pbn.is_verified_brand { "Yes" } else { "No" }.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(assessments.len())
}
