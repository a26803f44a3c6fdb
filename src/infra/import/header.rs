use std::collections::HashMap;

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::table::Row;

const EMPTY_HEADER: &str = "__EMPTY";

/// Names the columns of a header record.
///
/// Blank header cells become `__EMPTY`, `__EMPTY_1`, ... and repeated names
/// get a numeric suffix (`Name`, `Name_1`, ...), so every name is unique.
/// Header text is kept as written, surrounding whitespace included.
pub fn header_names(header: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for cell in header {
        let text = cell.render("").into_owned();
        let base = if text.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            text
        };

        let name = match seen.get(&base).copied() {
            None => {
                seen.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let mut candidate = format!("{base}_{counter}");
                while seen.contains_key(&candidate) {
                    counter += 1;
                    candidate = format!("{base}_{counter}");
                }
                seen.insert(base, counter + 1);
                seen.insert(candidate.clone(), 1);
                candidate
            }
        };
        names.push(name);
    }

    names
}

/// Converts header-first records into rows. Empty cells are left out and
/// records without any value are skipped.
///
/// Records wider than the header get blank header cells for the extra
/// columns, which are then named like any other blank header.
pub fn rows_from_records<I>(records: I) -> Vec<Row>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut records = records.into_iter();
    let Some(mut header) = records.next() else {
        return Vec::new();
    };
    let records: Vec<Vec<CellValue>> = records.collect();
    let width = records.iter().map(Vec::len).max().unwrap_or(0);
    if header.len() < width {
        header.resize(width, CellValue::Empty);
    }
    let names = header_names(&header);

    records
        .into_iter()
        .filter_map(|record| {
            let mut row = Row::new();
            for (name, value) in names.iter().zip(record) {
                if !value.is_empty() {
                    row.push(name.clone(), value);
                }
            }
            (!row.is_empty()).then_some(row)
        })
        .collect()
}
