use super::table::CellValue;
use chrono::{Datelike, NaiveDate};

/// Mean Gregorian month length used to turn elapsed days into months.
pub const DAYS_PER_MONTH: f64 = 30.437;

/// Bare numbers below this are read as an age in years.
const YEARS_MODE_CEILING: f64 = 50.0;
/// Bare numbers from this year up to next year are read as a creation year.
const EARLIEST_CREATION_YEAR: f64 = 1970.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y.%m.%d"];
const PLACEHOLDERS: &[&str] = &["", "n/a", "na", "-", "nan", "inf", "-inf", "none", "null"];

pub(crate) fn strip_invisible(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "")
}

/// Header form used for alias matching: invisible marks removed, trimmed, lower-cased.
pub(crate) fn normalize_header(value: &str) -> String {
    strip_invisible(value).trim().to_lowercase()
}

/// Reads a metric cell as a non-negative number; anything unreadable becomes zero.
pub(crate) fn numeric_value(cell: &CellValue) -> f64 {
    let raw = match cell {
        CellValue::Empty => return 0.0,
        CellValue::Number(value) => *value,
        CellValue::Text(text) => parse_metric_text(text).unwrap_or(0.0),
    };
    sanitize(raw)
}

/// Percent columns arrive on a 0–100 scale and leave as a 0–1 fraction.
pub(crate) fn percentage_fraction(cell: &CellValue) -> f64 {
    numeric_value(cell).clamp(0.0, 100.0) / 100.0
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_metric_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "").replace('%', "");
    let cleaned = cleaned.trim();
    if PLACEHOLDERS.contains(&cleaned.to_ascii_lowercase().as_str()) {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok()
}

/// Converts whatever the export put in the age column into months.
///
/// The column mixes ages in years, creation years, month counts and calendar dates, so
/// bare numbers are disambiguated by range: `0 < x < 50` is years, `1970..=next year`
/// is a creation year, everything else is already months. Text that is not a number is
/// tried as a date.
pub fn domain_age_months(cell: &CellValue, today: NaiveDate) -> f64 {
    match cell {
        CellValue::Empty => 0.0,
        CellValue::Number(value) => months_from_number(*value, today),
        CellValue::Text(text) => match parse_metric_text(text) {
            Some(value) => months_from_number(value, today),
            None => parse_creation_date(text)
                .map(|created| months_since(created, today))
                .unwrap_or(0.0),
        },
    }
}

fn months_from_number(value: f64, today: NaiveDate) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    let current_year = f64::from(today.year());
    if value < YEARS_MODE_CEILING {
        value * 12.0
    } else if (EARLIEST_CREATION_YEAR..=current_year + 1.0).contains(&value) {
        ((current_year - value) * 12.0).max(0.0)
    } else {
        value
    }
}

fn parse_creation_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let try_formats = |candidate: &str| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
    };

    // Spreadsheet exports often append a midnight time to dates.
    try_formats(trimmed).or_else(|| {
        trimmed
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .filter(|date_part| date_part.len() < trimmed.len())
            .and_then(try_formats)
    })
}

fn months_since(created: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - created).num_days();
    (days as f64 / DAYS_PER_MONTH).max(0.0)
}
