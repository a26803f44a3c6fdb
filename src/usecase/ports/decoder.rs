use crate::domain::entities::table::Row;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("not a recognized spreadsheet: {0}")]
    Unrecognized(String),
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("failed to read sheet `{sheet}`: {reason}")]
    Sheet { sheet: String, reason: String },
    #[error("failed to parse csv: {0}")]
    Csv(String),
}

/// Turns the raw bytes of an uploaded file into header-keyed rows taken from
/// its first sheet.
pub trait SheetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, IngestError>;
}
