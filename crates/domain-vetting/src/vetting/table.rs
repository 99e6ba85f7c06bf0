use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One cell of an uploaded metrics sheet.
///
/// Spreadsheet exports hand over typed numbers while CSV exports only carry text,
/// so both shapes are kept until the normalizer decides how to read them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Renders the cell the way it would read in the source sheet.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                format!("{}", *value as i64)
            }
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(value) => value.trim().to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordSetError {
    #[error("record set has no columns, so no domain identifier can be resolved")]
    NoColumns,
    #[error("row {row} has {found} cells but the header declares {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Header plus rows of cells, the shape every upload is reduced to before scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RecordSet {
    /// Builds a record set, padding short rows with empty cells.
    ///
    /// Rows wider than the header cannot be attributed to a column and are rejected.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, RecordSetError> {
        if columns.is_empty() && rows.iter().any(|row| !row.is_empty()) {
            return Err(RecordSetError::NoColumns);
        }

        let expected = columns.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() > expected {
                return Err(RecordSetError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            row.resize(expected, CellValue::Empty);
            padded.push(row);
        }

        Ok(Self {
            columns,
            rows: padded,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps the first `limit` rows and reports how many were dropped.
    pub fn truncate(&mut self, limit: usize) -> usize {
        let dropped = self.rows.len().saturating_sub(limit);
        self.rows.truncate(limit);
        dropped
    }

    pub(crate) fn cell(&self, row: usize, column: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let set = RecordSet::new(
            vec!["Target".to_string(), "DR".to_string()],
            vec![vec![CellValue::from("example.com")]],
        )
        .expect("valid set");

        assert_eq!(set.cell(0, 1), &CellValue::Empty);
        assert_eq!(set.cell(5, 5), &CellValue::Empty);
    }

    #[test]
    fn wide_rows_are_rejected() {
        let error = RecordSet::new(
            vec!["Target".to_string()],
            vec![vec![CellValue::from("a.com"), CellValue::from(12.0)]],
        )
        .expect_err("row wider than header");

        assert_eq!(
            error,
            RecordSetError::RaggedRow {
                row: 0,
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn cells_deserialize_from_mixed_json() {
        let cells: Vec<CellValue> =
            serde_json::from_str(r#"["example.com", 42, null, "1,200"]"#).expect("valid json");
        assert_eq!(
            cells,
            vec![
                CellValue::Text("example.com".to_string()),
                CellValue::Number(42.0),
                CellValue::Empty,
                CellValue::Text("1,200".to_string()),
            ]
        );
    }

    #[test]
    fn truncate_reports_dropped_rows() {
        let mut set = RecordSet::new(
            vec!["Target".to_string()],
            (0..5).map(|i| vec![CellValue::from(format!("d{i}.com"))]).collect(),
        )
        .expect("valid set");
        assert_eq!(set.truncate(3), 2);
        assert_eq!(set.len(), 3);
        assert_eq!(set.truncate(10), 0);
    }
}
