use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::selection::Selection;
use crate::domain::entities::table::{Table, TableId};
use crate::usecase::ports::decoder::{IngestError, SheetDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IngestTicket(pub u64);

/// Hands out one ticket per file pick so that only the most recently started
/// read may replace the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSequence {
    latest: u64,
}

impl IngestSequence {
    pub fn begin(&mut self) -> IngestTicket {
        self.latest += 1;
        IngestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: IngestTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Loaded(Table),
    Empty,
    ParseFailed(IngestError),
}

impl IngestOutcome {
    pub fn status_message(&self, file_name: &str) -> String {
        match self {
            IngestOutcome::Loaded(table) => format!(
                "Loaded {file_name}: {} rows, {} columns",
                table.len(),
                table.columns().len()
            ),
            IngestOutcome::Empty => {
                format!("{file_name} has no data rows; keeping the current table")
            }
            IngestOutcome::ParseFailed(err) => format!("Could not read {file_name}: {err}"),
        }
    }
}

/// What happened to the loaded table when an ingestion finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The table was replaced and the old selection dropped.
    Replaced,
    /// The sheet was empty or unreadable; the previous table stays.
    Kept,
    /// A newer upload started after this one; its result was ignored.
    Discarded,
}

/// Applies an ingestion result to the loaded table.
///
/// Results carrying an outdated `ticket` are discarded. Otherwise only
/// `Loaded` replaces the table, which also drops any selection made on the
/// previous one.
pub fn apply_outcome(
    sequence: &IngestSequence,
    ticket: IngestTicket,
    outcome: IngestOutcome,
    table: &mut Option<Table>,
    selection: &mut Option<Selection>,
) -> Applied {
    if !sequence.is_current(ticket) {
        debug!(ticket = ticket.0, "discarding superseded upload");
        return Applied::Discarded;
    }
    match outcome {
        IngestOutcome::Loaded(next) => {
            *table = Some(next);
            *selection = None;
            Applied::Replaced
        }
        IngestOutcome::Empty | IngestOutcome::ParseFailed(_) => Applied::Kept,
    }
}

pub struct ImportService {
    spreadsheet: Arc<dyn SheetDecoder>,
    csv: Arc<dyn SheetDecoder>,
}

impl ImportService {
    pub fn new(spreadsheet: Arc<dyn SheetDecoder>, csv: Arc<dyn SheetDecoder>) -> Self {
        Self { spreadsheet, csv }
    }

    fn decoder_for(&self, file_name: &str) -> &dyn SheetDecoder {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        if ext == "csv" {
            self.csv.as_ref()
        } else {
            self.spreadsheet.as_ref()
        }
    }

    /// Decodes the first sheet of `bytes` into a table identified by `ticket`.
    pub fn ingest(&self, ticket: IngestTicket, file_name: &str, bytes: &[u8]) -> IngestOutcome {
        let rows = match self.decoder_for(file_name).decode(bytes) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(file = file_name, error = %err, "failed to decode upload");
                return IngestOutcome::ParseFailed(err);
            }
        };

        match Table::from_rows(TableId(ticket.0), rows) {
            Some(table) => {
                info!(
                    file = file_name,
                    rows = table.len(),
                    columns = table.columns().len(),
                    "loaded table"
                );
                IngestOutcome::Loaded(table)
            }
            None => {
                warn!(file = file_name, "first sheet has no data rows");
                IngestOutcome::Empty
            }
        }
    }
}
