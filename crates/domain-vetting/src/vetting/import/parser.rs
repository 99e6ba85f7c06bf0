use super::super::normalizer::strip_invisible;
use super::super::table::CellValue;
use std::io::Read;

pub(crate) struct ParsedSheet {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<CellValue>>,
}

pub(crate) fn parse_sheet<R: Read>(reader: R) -> Result<ParsedSheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = csv_reader
        .headers()?
        .iter()
        .map(|header| strip_invisible(header).trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(CellValue::from).collect());
    }

    Ok(ParsedSheet { columns, rows })
}
