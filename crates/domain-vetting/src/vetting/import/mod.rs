mod parser;

use super::table::{RecordSet, RecordSetError};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Shape(RecordSetError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read metrics export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid metrics CSV data: {}", err),
            ImportError::Shape(err) => write!(f, "metrics export has an unusable layout: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Shape(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RecordSetError> for ImportError {
    fn from(err: RecordSetError) -> Self {
        Self::Shape(err)
    }
}

/// Loads SEO tool exports (Ahrefs, Semrush, Moz, hand-made sheets) into a [`RecordSet`].
pub struct MetricsImporter {
    batch_limit: usize,
}

impl MetricsImporter {
    pub fn new(batch_limit: usize) -> Self {
        Self {
            batch_limit: batch_limit.max(1),
        }
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<RecordSet, ImportError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(file)
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<RecordSet, ImportError> {
        let sheet = parser::parse_sheet(reader)?;
        let mut records = RecordSet::new(sheet.columns, sheet.rows)?;

        let dropped = records.truncate(self.batch_limit);
        if dropped > 0 {
            warn!(
                limit = self.batch_limit,
                dropped, "metrics export exceeds the batch limit; extra rows ignored"
            );
        }
        debug!(rows = records.len(), columns = records.columns().len(), "metrics export loaded");

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vetting::table::CellValue;
    use std::io::Cursor;

    #[test]
    fn headers_are_trimmed_and_bom_free() {
        let csv = "\u{feff}Target , Domain Rating\nexample.com,55\n";
        let records = MetricsImporter::new(100)
            .from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(records.columns(), ["Target", "Domain Rating"]);
        assert_eq!(
            records.rows()[0],
            vec![
                CellValue::Text("example.com".to_string()),
                CellValue::Text("55".to_string())
            ]
        );
    }

    #[test]
    fn blank_lines_and_short_rows_are_tolerated() {
        let csv = "Target,DR,Traffic\na.com,40\n,,\nb.com,50,1200\n";
        let records = MetricsImporter::new(100)
            .from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(records.len(), 2);
        assert_eq!(records.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn batch_limit_truncates_rows() {
        let mut csv = String::from("Target,DR\n");
        for i in 0..12 {
            csv.push_str(&format!("site{i}.com,{}\n", 30 + i));
        }
        let records = MetricsImporter::new(5)
            .from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(records.len(), 5);
        assert_eq!(records.rows()[4][0], CellValue::Text("site4.com".to_string()));
    }

    #[test]
    fn rows_wider_than_header_are_rejected() {
        let csv = "Target\na.com,55\n";
        let error = MetricsImporter::new(100)
            .from_reader(Cursor::new(csv))
            .expect_err("ragged export");
        assert!(matches!(error, ImportError::Shape(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = MetricsImporter::new(100)
            .from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
