use crate::domain::entities::table::Table;

pub struct QueryService {
    empty_cell_placeholder: String,
}

impl QueryService {
    pub fn new(empty_cell_placeholder: impl Into<String>) -> Self {
        Self {
            empty_cell_placeholder: empty_cell_placeholder.into(),
        }
    }

    /// Indices of the rows where some table column contains `query`,
    /// ignoring case. An empty query keeps every row.
    pub fn filter(&self, table: &Table, query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                table.columns().iter().any(|column| {
                    row.get(column)
                        .render(&self.empty_cell_placeholder)
                        .to_lowercase()
                        .contains(&needle)
                })
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}
