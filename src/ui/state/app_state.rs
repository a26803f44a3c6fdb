use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::selection::Selection;
use crate::domain::entities::table::Table;
use crate::usecase::services::import_service::IngestSequence;

/// Signals owned by the root component and handed to child components.
#[derive(Clone, Copy, PartialEq)]
pub struct AppState {
    /// Rows and columns of the current upload, replaced together.
    pub table: Signal<Option<Table>>,
    pub search_query: Signal<String>,
    pub selection: Signal<Option<Selection>>,
    pub show_print_dialog: Signal<bool>,
    pub ingest_sequence: Signal<IngestSequence>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            table: use_signal(|| None::<Table>),
            search_query: use_signal(String::new),
            selection: use_signal(|| None::<Selection>),
            show_print_dialog: use_signal(|| false),
            ingest_sequence: use_signal(IngestSequence::default),
            busy: use_signal(|| false),
            status: use_signal(|| "Upload an Excel file to display data.".to_string()),
        }
    }
}
