use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use domain_vetting::config::AppConfig;
use domain_vetting::error::AppError;
use domain_vetting::telemetry;
use domain_vetting::vetting::{
    sort_for_display, write_csv, BatchSummary, DomainAssessment, FlexibilityLevel,
    MetricsImporter, VettingEngine,
};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Csv,
    #[default]
    Table,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// CSV export with one domain per row (Ahrefs, Semrush, Moz or hand-made)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Flexibility level, 1 strictest to 10 most lenient (defaults to APP_FLEXIBILITY_LEVEL)
    #[arg(long, value_parser = crate::infra::parse_flexibility)]
    pub(crate) flexibility: Option<u8>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Write results to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Order by trust score, then risk points, instead of input order
    #[arg(long)]
    pub(crate) sort: bool,
    /// Date domain ages are measured against (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        flexibility,
        format,
        output,
        sort,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let level = flexibility
        .and_then(FlexibilityLevel::new)
        .unwrap_or(config.vetting.flexibility_level);
    let engine = match today {
        Some(today) => VettingEngine::with_today(level, today),
        None => VettingEngine::new(level),
    };

    let records = MetricsImporter::new(config.vetting.batch_limit).from_path(&input)?;
    let mut assessments = engine.evaluate(&records)?;
    if sort {
        sort_for_display(&mut assessments);
    }

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    render(&mut writer, format, level, &assessments)?;
    writer.flush()?;
    Ok(())
}

fn render<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    level: FlexibilityLevel,
    assessments: &[DomainAssessment],
) -> Result<(), AppError> {
    let summary = BatchSummary::from_assessments(assessments);
    match format {
        OutputFormat::Json => {
            let body = json!({
                "flexibility_level": level,
                "summary": summary,
                "assessments": assessments,
            });
            serde_json::to_writer_pretty(&mut *writer, &body).map_err(io::Error::from)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            write_csv(&mut *writer, assessments)?;
        }
        OutputFormat::Table => render_table(writer, level, &summary, assessments)?,
    }
    Ok(())
}

fn render_table<W: Write>(
    writer: &mut W,
    level: FlexibilityLevel,
    summary: &BatchSummary,
    assessments: &[DomainAssessment],
) -> io::Result<()> {
    writeln!(writer, "Domain vetting (flexibility {})", level.get())?;
    writeln!(
        writer,
        "- {} analyzed | {} high risk | {} excellent | {} verified brands | {} insufficient data",
        summary.analyzed,
        summary.high_risk,
        summary.excellent,
        summary.verified_brands,
        summary.insufficient_data
    )?;
    writeln!(
        writer,
        "\n{:>4}  {:<36} {:>5}  {:<40} {:>6}  {}",
        "row", "domain", "trust", "label", "points", "risk"
    )?;
    for assessment in assessments {
        writeln!(
            writer,
            "{:>4}  {:<36} {:>5}  {:<40} {:>6}  {} ({})",
            assessment.row,
            truncate(&assessment.target, 36),
            assessment.score.trust_score,
            assessment.score.trust_label.label(),
            assessment.pbn.risk_points,
            assessment.pbn.risk_level.label(),
            assessment.pbn.action.label()
        )?;
        for alert in &assessment.pbn.alerts {
            writeln!(writer, "        - {alert}")?;
        }
    }
    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
