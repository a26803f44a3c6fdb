use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::table::Row;
use crate::infra::import::header::rows_from_records;
use crate::usecase::ports::decoder::{IngestError, SheetDecoder};

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) if v.is_empty() => CellValue::Empty,
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Text(v.to_string()),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.clone()),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
        Data::Error(v) => CellValue::Text(v.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// Reads xls, xlsx, xlsm, xlsb and ods workbooks; the format is detected
/// from the content.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineDecoder;

impl SheetDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, IngestError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|err| IngestError::Unrecognized(err.to_string()))?;

        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(IngestError::NoSheets)?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|err| IngestError::Sheet {
                sheet: sheet.clone(),
                reason: err.to_string(),
            })?;

        Ok(rows_from_records(
            range.rows().map(|r| r.iter().map(cell_value).collect()),
        ))
    }
}
