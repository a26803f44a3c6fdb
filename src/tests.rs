use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use proptest::prelude::*;
use rust_xlsxwriter::Workbook;

use crate::config::{ensure_webview_data_dir, AppConfig};
use crate::domain::entities::cell::CellValue;
use crate::domain::entities::selection::Selection;
use crate::domain::entities::table::{Row, Table, TableId};
use crate::infra::import::csv::CsvDecoder;
use crate::infra::import::xlsx::CalamineDecoder;
use crate::infra::print::html::render_html;
use crate::usecase::ports::decoder::IngestError;
use crate::usecase::services::export_service::{ExportError, ExportService};
use crate::usecase::services::import_service::{
    apply_outcome, Applied, ImportService, IngestOutcome, IngestSequence, IngestTicket,
};
use crate::usecase::services::query_service::QueryService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("excelbill-{prefix}-{nanos}"))
}

fn import_service() -> ImportService {
    ImportService::new(Arc::new(CalamineDecoder), Arc::new(CsvDecoder))
}

fn query_service() -> QueryService {
    QueryService::new(AppConfig::default().empty_cell_placeholder)
}

fn export_service() -> ExportService {
    let config = AppConfig::default();
    ExportService::new(config.empty_cell_placeholder, config.document_title)
}

fn billing_xlsx() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").expect("should write header");
    sheet.write_string(0, 1, "Amount").expect("should write header");
    sheet.write_string(1, 0, "Alice").expect("should write cell");
    sheet.write_number(1, 1, 10).expect("should write cell");
    workbook.save_to_buffer().expect("should build xlsx fixture")
}

fn loaded(outcome: IngestOutcome) -> Table {
    match outcome {
        IngestOutcome::Loaded(table) => table,
        other => panic!("expected a loaded table, got {other:?}"),
    }
}

fn sample_table() -> Table {
    Table::from_rows(
        TableId(1),
        vec![
            Row::new().with("Name", "Alice").with("City", "Paris"),
            Row::new().with("Name", "Bob").with("City", "ABCville"),
            Row::new().with("Name", "Carol"),
            Row::new().with("Name", "dave").with("City", "abc"),
        ],
    )
    .expect("sample table should build")
}

#[test]
fn ingest_two_row_sheet_keeps_order_and_columns() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Invoice", "Customer", "Total"].iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .expect("should write header");
    }
    sheet.write_string(1, 0, "INV-1").expect("should write cell");
    sheet.write_string(1, 1, "Acme").expect("should write cell");
    sheet.write_number(1, 2, 120.5).expect("should write cell");
    sheet.write_string(2, 0, "INV-2").expect("should write cell");
    sheet.write_string(2, 1, "Globex").expect("should write cell");
    sheet.write_number(2, 2, 80).expect("should write cell");
    let bytes = workbook.save_to_buffer().expect("should build xlsx fixture");

    let table = loaded(import_service().ingest(IngestTicket(1), "bills.xlsx", &bytes));

    assert_eq!(table.columns(), ["Invoice", "Customer", "Total"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].get("Invoice"), &CellValue::from("INV-1"));
    assert_eq!(table.rows()[0].get("Total"), &CellValue::Number(120.5));
    assert_eq!(table.rows()[1].get("Customer"), &CellValue::from("Globex"));
    assert_eq!(table.id(), TableId(1));
}

#[test]
fn ingest_reads_first_sheet_only() {
    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.set_name("Bills").expect("should name sheet");
    first.write_string(0, 0, "Name").expect("should write header");
    first.write_string(1, 0, "Alice").expect("should write cell");
    let second = workbook.add_worksheet();
    second.set_name("Other").expect("should name sheet");
    second.write_string(0, 0, "Code").expect("should write header");
    second.write_string(1, 0, "X-1").expect("should write cell");
    let bytes = workbook.save_to_buffer().expect("should build xlsx fixture");

    let table = loaded(import_service().ingest(IngestTicket(1), "bills.xlsx", &bytes));

    assert_eq!(table.columns(), ["Name"]);
    assert_eq!(table.rows()[0].get("Name"), &CellValue::from("Alice"));
}

#[test]
fn ingest_decodes_booleans_as_text() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").expect("should write header");
    sheet.write_string(0, 1, "Paid").expect("should write header");
    sheet.write_string(1, 0, "Alice").expect("should write cell");
    sheet.write_boolean(1, 1, true).expect("should write cell");
    let bytes = workbook.save_to_buffer().expect("should build xlsx fixture");

    let table = loaded(import_service().ingest(IngestTicket(1), "bills.xlsx", &bytes));

    assert_eq!(table.rows()[0].get("Paid"), &CellValue::from("true"));
}

#[test]
fn billing_scenario_from_upload_to_printout() {
    let table = loaded(import_service().ingest(IngestTicket(1), "bills.xlsx", &billing_xlsx()));

    assert_eq!(table.columns(), ["Name", "Amount"]);
    assert_eq!(
        table.rows(),
        [Row::new().with("Name", "Alice").with("Amount", 10.0)]
    );

    let query = query_service();
    assert_eq!(query.filter(&table, "ali"), vec![0]);
    assert!(query.filter(&table, "bob").is_empty());

    let export = export_service();
    let mut selection = export.select(&table, 0);
    assert!(export.toggle_field(&mut selection, "Amount"));

    let document = export
        .build_document(selection.as_ref(), Some(&table))
        .expect("should build printout");
    assert_eq!(document.title, "Billing Printout");
    assert_eq!(document.text_lines(), ["Name: Alice"]);

    let html = render_html(&document);
    assert!(html.contains("<strong>Name:</strong> Alice"));
    assert!(!html.contains("Amount"));
}

#[test]
fn header_only_sheet_leaves_previous_table() {
    let service = import_service();
    let mut sequence = IngestSequence::default();
    let first = sequence.begin();
    let mut table = Some(loaded(service.ingest(first, "bills.xlsx", &billing_xlsx())));
    let mut selection = None;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").expect("should write header");
    sheet.write_string(0, 1, "Amount").expect("should write header");
    let bytes = workbook.save_to_buffer().expect("should build xlsx fixture");

    let second = sequence.begin();
    let outcome = service.ingest(second, "empty.xlsx", &bytes);
    assert_eq!(outcome, IngestOutcome::Empty);
    assert!(outcome.status_message("empty.xlsx").contains("no data rows"));

    let before = table.clone();
    assert_eq!(
        apply_outcome(&sequence, second, outcome, &mut table, &mut selection),
        Applied::Kept
    );
    assert_eq!(table, before);
}

#[test]
fn unreadable_bytes_report_parse_failure() {
    let service = import_service();
    let mut sequence = IngestSequence::default();
    let mut table = Some(sample_table());
    let mut selection = None;

    let ticket = sequence.begin();
    let outcome = service.ingest(ticket, "notes.xlsx", b"definitely not a workbook");

    assert!(matches!(
        outcome,
        IngestOutcome::ParseFailed(IngestError::Unrecognized(_))
    ));
    assert!(outcome.status_message("notes.xlsx").starts_with("Could not read notes.xlsx"));
    assert_eq!(
        apply_outcome(&sequence, ticket, outcome, &mut table, &mut selection),
        Applied::Kept
    );
    assert_eq!(table.map(|t| t.id()), Some(TableId(1)));
}

#[test]
fn csv_upload_uses_header_convention() {
    let bytes = b"Name,Amount,Name\nAlice,10,A.\n,,\nBob,,B.\n";

    let table = loaded(import_service().ingest(IngestTicket(3), "Bills.CSV", bytes));

    assert_eq!(table.columns(), ["Name", "Amount", "Name_1"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].get("Amount"), &CellValue::Number(10.0));
    assert_eq!(table.rows()[1].key_list(), ["Name", "Name_1"]);
}

#[test]
fn loading_new_table_clears_selection() {
    let service = import_service();
    let export = export_service();
    let mut table = Some(sample_table());
    let mut selection = table.as_ref().and_then(|t| export.select(t, 0));
    assert!(selection.is_some());

    let mut sequence = IngestSequence::default();
    sequence.begin();
    let ticket = sequence.begin();
    let outcome = service.ingest(ticket, "bills.xlsx", &billing_xlsx());
    assert_eq!(
        apply_outcome(&sequence, ticket, outcome, &mut table, &mut selection),
        Applied::Replaced
    );

    assert!(selection.is_none());
    assert_eq!(table.map(|t| t.id()), Some(TableId(2)));
}

#[test]
fn older_upload_finishing_late_is_discarded() {
    let service = import_service();
    let export = export_service();
    let mut sequence = IngestSequence::default();
    let older = sequence.begin();
    let newer = sequence.begin();

    let mut table = Some(loaded(service.ingest(newer, "current.xlsx", &billing_xlsx())));
    let mut selection = table.as_ref().and_then(|t| export.select(t, 0));
    assert!(export.toggle_field(&mut selection, "Amount"));
    let (table_before, selection_before) = (table.clone(), selection.clone());

    let late = service.ingest(older, "Bills.csv", b"Name,Amount\nCarol,7\n");
    assert!(matches!(late, IngestOutcome::Loaded(_)));
    assert_eq!(
        apply_outcome(&sequence, older, late, &mut table, &mut selection),
        Applied::Discarded
    );

    assert_eq!(table, table_before);
    assert_eq!(selection, selection_before);
}

#[test]
fn filter_is_order_preserving_subsequence() {
    let table = sample_table();
    let query = query_service();

    for needle in ["", "a", "ABC", "o", "zzz", "-"] {
        let matched = query.filter(&table, needle);
        assert!(
            matched.windows(2).all(|pair| pair[0] < pair[1]),
            "indices should be strictly increasing for {needle:?}"
        );
        assert!(matched.iter().all(|idx| *idx < table.len()));
    }
}

#[test]
fn empty_query_returns_all_rows() {
    let table = sample_table();
    assert_eq!(query_service().filter(&table, ""), vec![0, 1, 2, 3]);
}

#[test]
fn filter_ignores_case() {
    let table = sample_table();
    let query = query_service();

    assert_eq!(query.filter(&table, "ABC"), query.filter(&table, "abc"));
    assert_eq!(query.filter(&table, "abc"), vec![1, 3]);
    assert_eq!(query.filter(&table, "DAVE"), vec![3]);
}

#[test]
fn absent_cells_match_as_placeholder() {
    let table = sample_table();

    assert_eq!(query_service().filter(&table, "-"), vec![2]);
    assert_eq!(QueryService::new("n/a").filter(&table, "n/a"), vec![2]);
}

#[test]
fn select_resets_included_fields() {
    let table = Table::from_rows(
        TableId(4),
        vec![
            Row::new().with("Name", "Alice").with("Amount", 10.0),
            Row::new()
                .with("Name", "Bob")
                .with("Amount", 4.0)
                .with("Note", "late"),
        ],
    )
    .expect("table should build");
    let export = export_service();

    let mut selection = export.select(&table, 0);
    export.toggle_field(&mut selection, "Name");
    export.toggle_field(&mut selection, "Amount");
    assert!(selection.as_ref().map(Selection::included).unwrap_or_default().is_empty());

    let selection = export.select(&table, 1).expect("row should exist");
    assert_eq!(selection.included(), ["Name", "Amount", "Note"]);
    assert!(export.select(&table, 2).is_none());
}

#[test]
fn toggling_twice_is_identity() {
    let table = sample_table();
    let export = export_service();
    let mut selection = export.select(&table, 1);
    let before = selection.clone();

    for field in ["Name", "City"] {
        export.toggle_field(&mut selection, field);
        assert_ne!(selection, before);
        export.toggle_field(&mut selection, field);
        assert_eq!(selection, before);
    }
}

#[test]
fn toggle_without_selection_is_noop() {
    let mut selection = None;
    assert!(!export_service().toggle_field(&mut selection, "Name"));
    assert!(selection.is_none());
}

#[test]
fn export_without_selection_is_noop() {
    let table = sample_table();
    assert_eq!(
        export_service().build_document(None, Some(&table)),
        Err(ExportError::NothingSelected)
    );
}

#[test]
fn export_rejects_selection_from_replaced_table() {
    let export = export_service();
    let old_table = sample_table();
    let selection = export.select(&old_table, 0);
    let new_table = Table::from_rows(TableId(2), vec![Row::new().with("Name", "Alice")])
        .expect("table should build");

    assert_eq!(
        export.build_document(selection.as_ref(), Some(&new_table)),
        Err(ExportError::StaleSelection)
    );
    assert_eq!(
        export.build_document(selection.as_ref(), None),
        Err(ExportError::StaleSelection)
    );
}

#[test]
fn export_lists_included_fields_in_row_order() {
    let table = Table::from_rows(
        TableId(9),
        vec![Row::new().with("Name", "Alice").with("Amount", 10.0)],
    )
    .expect("table should build");
    let export = export_service();
    let selection = export.select(&table, 0);

    let document = export
        .build_document(selection.as_ref(), Some(&table))
        .expect("should build printout");

    assert_eq!(document.text_lines(), ["Name: Alice", "Amount: 10"]);
}

#[test]
fn stale_ingest_ticket_is_not_current() {
    let mut sequence = IngestSequence::default();
    let first = sequence.begin();
    let second = sequence.begin();

    assert!(!sequence.is_current(first));
    assert!(sequence.is_current(second));
    assert!(first < second);
}

#[test]
fn ensure_webview_data_dir_creates_webview_subdir() {
    let temp_dir = unique_test_dir("webview-dir");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let webview_dir = ensure_webview_data_dir(&temp_dir).expect("should create webview dir");

    assert_eq!(webview_dir, temp_dir.join("webview"));
    assert!(webview_dir.is_dir(), "webview dir should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

const FIELD_POOL: [&str; 5] = ["Name", "Amount", "City", "Note", "__EMPTY"];

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        "[A-Za-z0-9 -]{0,6}".prop_map(CellValue::from),
        (-1000i32..1000).prop_map(|n| CellValue::Number(f64::from(n) / 4.0)),
        Just(CellValue::Empty),
    ]
}

fn row_strategy() -> impl Strategy<Value = Row> {
    prop::collection::vec((prop::sample::select(FIELD_POOL.to_vec()), cell_strategy()), 1..6)
        .prop_map(|fields| {
            let mut row = Row::new();
            for (name, value) in fields {
                row.push(name, value);
            }
            row
        })
}

fn table_strategy() -> impl Strategy<Value = Table> {
    prop::collection::vec(row_strategy(), 1..12).prop_map(|rows| {
        Table::from_rows(TableId(7), rows).expect("non-empty rows always build a table")
    })
}

fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(FIELD_POOL.to_vec()).prop_map(str::to_string),
        "[A-Za-z_]{1,8}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn filter_returns_increasing_indices_into_table(
        table in table_strategy(),
        needle in "[A-Za-z0-9 -]{0,3}",
    ) {
        let matched = query_service().filter(&table, &needle);

        prop_assert!(matched.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(matched.iter().all(|idx| *idx < table.len()));
        if needle.is_empty() {
            prop_assert_eq!(matched, (0..table.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn filter_treats_ascii_case_alike(
        table in table_strategy(),
        needle in "[A-Za-z0-9 -]{0,3}",
    ) {
        let query = query_service();

        prop_assert_eq!(
            query.filter(&table, &needle.to_uppercase()),
            query.filter(&table, &needle.to_lowercase())
        );
    }

    #[test]
    fn toggling_a_field_twice_restores_selection(
        table in table_strategy(),
        row in any::<prop::sample::Index>(),
        field in field_strategy(),
    ) {
        let export = export_service();
        let mut selection = export.select(&table, row.index(table.len()));
        prop_assert!(selection.is_some());
        let before = selection.clone();

        let first = export.toggle_field(&mut selection, &field);
        let second = export.toggle_field(&mut selection, &field);

        prop_assert_eq!(first, second);
        prop_assert_eq!(selection, before);
    }
}
