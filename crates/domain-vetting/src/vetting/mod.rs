pub mod brand;
pub mod export;
pub mod import;
pub mod mapping;
pub mod normalizer;
pub mod pbn;
pub mod record;
pub mod table;
pub mod trust;

pub use export::{sort_for_display, write_csv, BatchSummary};
pub use import::{ImportError, MetricsImporter};
pub use mapping::{CanonicalField, ColumnMapping};
pub use pbn::{
    DetectionConfig, FlexibilityLevel, PbnDetector, PbnResult, RecommendedAction, RiskLevel,
    MAX_RISK_POINTS,
};
pub use record::{DerivedMetrics, DomainRecord};
pub use table::{CellValue, RecordSet, RecordSetError};
pub use trust::{score_trust, ScoreResult, TrustLabel};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

/// Everything known about one input row after scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainAssessment {
    /// Position of the source row; results are joined back by this, never by domain name.
    pub row: usize,
    pub target: String,
    pub record: DomainRecord,
    pub metrics: DerivedMetrics,
    #[serde(flatten)]
    pub score: ScoreResult,
    #[serde(flatten)]
    pub pbn: PbnResult,
}

/// Scores whole batches with one detection configuration.
#[derive(Debug, Clone)]
pub struct VettingEngine {
    detector: PbnDetector,
    today: NaiveDate,
}

impl VettingEngine {
    pub fn new(level: FlexibilityLevel) -> Self {
        Self::with_today(level, Local::now().date_naive())
    }

    /// Pins the date domain ages are measured against.
    pub fn with_today(level: FlexibilityLevel, today: NaiveDate) -> Self {
        Self {
            detector: PbnDetector::for_level(level),
            today,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        self.detector.config()
    }

    pub fn assess(&self, record: DomainRecord, row: usize) -> DomainAssessment {
        let metrics = record.derived();
        let verified_brand = brand::is_verified_brand(&record, &self.config().brand_allow_list);

        let mut score = score_trust(&record, &metrics);
        let mut pbn = self.detector.detect(&record, &metrics, verified_brand);
        if verified_brand {
            brand::apply_override(&mut score, &mut pbn);
        }

        debug!(
            row,
            domain = %record.target,
            trust_score = score.trust_score,
            risk_points = pbn.risk_points,
            verified_brand,
            "domain assessed"
        );

        DomainAssessment {
            row,
            target: record.target.clone(),
            record,
            metrics,
            score,
            pbn,
        }
    }

    /// One assessment per row, in input order.
    pub fn evaluate(&self, records: &RecordSet) -> Result<Vec<DomainAssessment>, RecordSetError> {
        if records.columns().is_empty() {
            return Err(RecordSetError::NoColumns);
        }

        let mapping = ColumnMapping::resolve(records.columns());
        let unresolved = mapping.unresolved();
        if !unresolved.is_empty() {
            debug!(
                missing = ?unresolved.iter().map(|field| field.key()).collect::<Vec<_>>(),
                "columns not found; fields default to zero"
            );
        }

        let assessments: Vec<DomainAssessment> = (0..records.len())
            .map(|row| self.assess(DomainRecord::from_row(records, &mapping, row, self.today), row))
            .collect();

        let summary = BatchSummary::from_assessments(&assessments);
        info!(
            level = self.config().flexibility_level.get(),
            analyzed = summary.analyzed,
            high_risk = summary.high_risk,
            excellent = summary.excellent,
            "batch evaluated"
        );

        Ok(assessments)
    }
}

/// Scores every row of `records` at the given strictness.
pub fn evaluate(
    records: &RecordSet,
    level: FlexibilityLevel,
) -> Result<Vec<DomainAssessment>, RecordSetError> {
    VettingEngine::new(level).evaluate(records)
}

#[cfg(test)]
mod tests;
