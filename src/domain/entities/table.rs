use super::cell::CellValue;

static ABSENT: CellValue = CellValue::Empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u64);

/// Position of a row inside a specific loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRef {
    pub table: TableId,
    pub index: usize,
}

/// One spreadsheet record, keyed by header name in sheet order.
///
/// Empty cells are not stored, so `keys()` can be shorter than the table's
/// column list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, overwriting any earlier value under the same key.
    pub fn push(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> &CellValue {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
            .unwrap_or(&ABSENT)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn key_list(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: TableId,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table whose columns are the keys of the first row.
    ///
    /// Returns `None` when there are no rows; later rows with other keys do not
    /// extend the column list.
    pub fn from_rows(id: TableId, rows: Vec<Row>) -> Option<Self> {
        let columns = rows.first()?.key_list();
        Some(Self { id, columns, rows })
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_ref(&self, index: usize) -> Option<RowRef> {
        (index < self.rows.len()).then_some(RowRef {
            table: self.id,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
