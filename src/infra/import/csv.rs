use crate::domain::entities::cell::CellValue;
use crate::domain::entities::table::Row;
use crate::infra::import::header::rows_from_records;
use crate::usecase::ports::decoder::{IngestError, SheetDecoder};

/// Numeric-looking fields become numbers, blank fields become empty cells.
pub fn field_value(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => CellValue::Number(number),
        _ => CellValue::Text(field.to_string()),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDecoder;

impl SheetDecoder for CsvDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| IngestError::Csv(err.to_string()))?;
            records.push(record.iter().map(field_value).collect::<Vec<_>>());
        }

        Ok(rows_from_records(records))
    }
}
