use std::sync::Arc;

use dioxus::prelude::*;
use rfd::AsyncFileDialog;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::infra::import::csv::CsvDecoder;
use crate::infra::import::xlsx::CalamineDecoder;
use crate::infra::print::html::render_html;
use crate::infra::print::webview::print_html;
use crate::ui::state::app_state::AppState;
use crate::usecase::services::export_service::{ExportError, ExportService};
use crate::usecase::services::import_service::{apply_outcome, Applied, ImportService};
use crate::usecase::services::query_service::QueryService;

const OVERLAY_STYLE: &str = "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1200;";
const DIALOG_STYLE: &str = "background: #fff; padding: 16px; border: 1px solid #999; min-width: 360px; max-width: 720px; max-height: 80vh; overflow: auto;";
const HEADER_CELL_STYLE: &str = "text-align: left; padding: 6px 10px; border-bottom: 1px solid #ccc; background: #f6f7f9; position: sticky; top: 0;";
const BODY_CELL_STYLE: &str = "padding: 6px 10px; border-bottom: 1px solid #eee; white-space: nowrap;";

/// Services shared through the component tree as context.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<AppConfig>,
    pub import: Arc<ImportService>,
    pub query: Arc<QueryService>,
    pub export: Arc<ExportService>,
}

impl Services {
    pub fn new(config: AppConfig) -> Self {
        let import = ImportService::new(Arc::new(CalamineDecoder), Arc::new(CsvDecoder));
        let query = QueryService::new(config.empty_cell_placeholder.clone());
        let export = ExportService::new(
            config.empty_cell_placeholder.clone(),
            config.document_title.clone(),
        );
        Self {
            config: Arc::new(config),
            import: Arc::new(import),
            query: Arc::new(query),
            export: Arc::new(export),
        }
    }
}

#[component]
pub fn App() -> Element {
    let services = use_context_provider(|| Services::new(AppConfig::default()));
    let state = AppState::new();
    let AppState {
        mut table,
        mut search_query,
        mut selection,
        mut show_print_dialog,
        mut ingest_sequence,
        mut busy,
        mut status,
    } = state;

    let import_service = services.import.clone();
    let file_filters = services.config.file_filters.clone();
    let handle_upload = move |_: MouseEvent| {
        let import_service = import_service.clone();
        let file_filters = file_filters.clone();
        spawn(async move {
            let mut dialog = AsyncFileDialog::new();
            for filter in &file_filters {
                dialog = dialog.add_filter(filter.name, filter.extensions);
            }
            let Some(handle) = dialog.pick_file().await else {
                debug!("file pick cancelled");
                return;
            };

            let ticket = ingest_sequence.write().begin();
            let file_name = handle.file_name();
            *busy.write() = true;
            *status.write() = format!("Reading {file_name}");

            let bytes = handle.read().await;
            let outcome = import_service.ingest(ticket, &file_name, &bytes);

            let message = outcome.status_message(&file_name);
            let applied = {
                let sequence = ingest_sequence.peek();
                let mut table = table.write();
                let mut selection = selection.write();
                apply_outcome(&sequence, ticket, outcome, &mut table, &mut selection)
            };
            match applied {
                Applied::Discarded => {
                    debug!(file = %file_name, "ignoring result of an older upload");
                    return;
                }
                Applied::Replaced => show_print_dialog.set(false),
                Applied::Kept => {}
            }
            *status.write() = message;
            *busy.write() = false;
        });
    };

    let has_table = table.read().is_some();
    let title = services.config.window_title.clone();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh;",

            h2 { style: "text-align: center;", "{title}" }

            div {
                style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0;",
                button {
                    onclick: handle_upload,
                    "Open spreadsheet"
                }
                input {
                    r#type: "search",
                    placeholder: "Search table...",
                    value: "{search_query}",
                    oninput: move |event| search_query.set(event.value()),
                }
                if busy() {
                    span { style: "color: #666;", "Working..." }
                }
                span { " {status}" }
            }

            if has_table {
                DataTable { state }
            } else {
                div { style: "text-align: center; color: #666;", "Upload an Excel file to display data." }
            }

            if show_print_dialog() {
                PrintDialog { state }
            }
        }
    }
}

#[component]
fn DataTable(state: AppState) -> Element {
    let services = use_context::<Services>();
    let AppState {
        table,
        search_query,
        mut selection,
        mut show_print_dialog,
        ..
    } = state;

    let placeholder = services.config.empty_cell_placeholder.clone();
    let query = search_query();
    let (columns, visible_rows, total_rows) = {
        let current = table.read();
        let Some(current) = current.as_ref() else {
            return rsx! {};
        };
        let columns = current.columns().to_vec();
        let visible_rows: Vec<(usize, Vec<String>)> = services
            .query
            .filter(current, &query)
            .into_iter()
            .filter_map(|idx| {
                let row = current.row(idx)?;
                let cells = columns
                    .iter()
                    .map(|column| row.get(column).render(&placeholder).into_owned())
                    .collect();
                Some((idx, cells))
            })
            .collect();
        (columns, visible_rows, current.len())
    };
    let shown_rows = visible_rows.len();

    rsx! {
        div { style: "overflow-x: auto; border: 1px solid #ddd; border-radius: 8px;",
            table { style: "border-collapse: collapse; width: 100%;",
                caption { style: "caption-side: bottom; padding: 8px; color: #666;",
                    "Showing {shown_rows} of {total_rows} rows."
                }
                thead {
                    tr {
                        {columns.iter().map(|column| rsx!(
                            th { key: "{column}", style: HEADER_CELL_STYLE, "{column}" }
                        ))}
                        th { style: HEADER_CELL_STYLE, "Action" }
                    }
                }
                tbody {
                    {visible_rows.into_iter().map(|(row_idx, cells)| {
                        let export = services.export.clone();
                        rsx!(
                            tr { key: "{row_idx}",
                                {cells.into_iter().enumerate().map(|(col_idx, cell)| rsx!(
                                    td { key: "{col_idx}", style: BODY_CELL_STYLE, "{cell}" }
                                ))}
                                td { style: BODY_CELL_STYLE,
                                    button {
                                        style: "color: #2f9e44;",
                                        onclick: move |_| {
                                            let next = table
                                                .read()
                                                .as_ref()
                                                .and_then(|current| export.select(current, row_idx));
                                            if let Some(next) = next {
                                                selection.set(Some(next));
                                                show_print_dialog.set(true);
                                            }
                                        },
                                        "Print"
                                    }
                                }
                            }
                        )
                    })}
                }
            }
        }
    }
}

#[component]
fn PrintDialog(state: AppState) -> Element {
    let services = use_context::<Services>();
    let AppState {
        table,
        mut selection,
        mut show_print_dialog,
        mut status,
        ..
    } = state;

    let Some(current) = selection() else {
        return rsx! {};
    };
    let fields = current.row().key_list();
    let export_for_print = services.export.clone();
    let print_surface = services.config.print_surface;

    rsx! {
        div { style: OVERLAY_STYLE,
            div { style: DIALOG_STYLE,
                div { style: "margin-bottom: 4px; font-weight: 600;", "Print Selection" }
                div { style: "margin-bottom: 12px; color: #666;",
                    "Select which fields to include in the billing printout."
                }
                {fields.into_iter().map(|field| {
                    let checked = current.is_included(&field);
                    let input_id = format!("print-field-{field}");
                    let field_name = field.clone();
                    let export = services.export.clone();
                    rsx!(
                        div { key: "{field_name}", style: "display: flex; align-items: center; gap: 8px; margin-bottom: 6px;",
                            input {
                                r#type: "checkbox",
                                id: "{input_id}",
                                checked: checked,
                                onclick: move |_| {
                                    export.toggle_field(&mut selection.write(), &field);
                                }
                            }
                            label { r#for: "{input_id}", "{field_name}" }
                        }
                    )
                })}
                div { style: "display: flex; justify-content: flex-end; gap: 8px; margin-top: 12px;",
                    button {
                        onclick: move |_| show_print_dialog.set(false),
                        "Close"
                    }
                    button {
                        onclick: move |_| {
                            let printout = export_for_print
                                .build_document(selection.read().as_ref(), table.read().as_ref());
                            match printout {
                                Ok(printout) => {
                                    debug!(lines = ?printout.text_lines(), "printing selection");
                                    let html = render_html(&printout);
                                    spawn(async move {
                                        match print_html(html, print_surface).await {
                                            Ok(()) => {
                                                *status.write() = "Sent the printout to the print dialog".to_string();
                                                show_print_dialog.set(false);
                                            }
                                            Err(err) => {
                                                *status.write() = format!("Print failed: {err}");
                                            }
                                        }
                                    });
                                }
                                Err(ExportError::NothingSelected) => {}
                                Err(err) => {
                                    warn!(error = %err, "refusing to print");
                                    *status.write() = format!("Print failed: {err}");
                                }
                            }
                        },
                        "Print"
                    }
                }
            }
        }
    }
}
