use tracing::debug;

use crate::domain::entities::document::{PrintDocument, PrintLine};
use crate::domain::entities::selection::Selection;
use crate::domain::entities::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("no row selected")]
    NothingSelected,
    #[error("the selected row belongs to a table that is no longer loaded")]
    StaleSelection,
    #[error("the print window could not be opened")]
    SurfaceUnavailable,
    #[error("printing failed: {0}")]
    Surface(String),
}

pub struct ExportService {
    empty_cell_placeholder: String,
    document_title: String,
}

impl ExportService {
    pub fn new(empty_cell_placeholder: impl Into<String>, document_title: impl Into<String>) -> Self {
        Self {
            empty_cell_placeholder: empty_cell_placeholder.into(),
            document_title: document_title.into(),
        }
    }

    /// Selects row `index` of `table` with all of its fields included.
    pub fn select(&self, table: &Table, index: usize) -> Option<Selection> {
        let origin = table.row_ref(index)?;
        let row = table.row(index)?.clone();
        debug!(row = index, fields = row.len(), "selected row for printing");
        Some(Selection::new(origin, row))
    }

    pub fn toggle_field(&self, selection: &mut Option<Selection>, field: &str) -> bool {
        let Some(selection) = selection.as_mut() else {
            return false;
        };
        let toggled = selection.toggle(field);
        debug!(field, toggled, "toggled print field");
        toggled
    }

    /// Builds the printout for the active selection.
    ///
    /// The selection must come from `current`, the table on screen.
    pub fn build_document(
        &self,
        selection: Option<&Selection>,
        current: Option<&Table>,
    ) -> Result<PrintDocument, ExportError> {
        let selection = selection.ok_or(ExportError::NothingSelected)?;
        if current.map(Table::id) != Some(selection.origin().table) {
            return Err(ExportError::StaleSelection);
        }

        let row = selection.row();
        let lines = selection
            .included()
            .iter()
            .map(|field| PrintLine {
                label: field.clone(),
                value: row.get(field).render(&self.empty_cell_placeholder).into_owned(),
            })
            .collect();

        Ok(PrintDocument {
            title: self.document_title.clone(),
            lines,
        })
    }
}
