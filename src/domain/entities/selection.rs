use super::table::{Row, RowRef};

/// The row chosen for printing and the fields ticked for inclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    origin: RowRef,
    row: Row,
    included: Vec<String>,
}

impl Selection {
    /// Selects `row` with every one of its fields included.
    pub fn new(origin: RowRef, row: Row) -> Self {
        let included = row.key_list();
        Self {
            origin,
            row,
            included,
        }
    }

    pub fn origin(&self) -> RowRef {
        self.origin
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Included field names, always in the row's own key order.
    pub fn included(&self) -> &[String] {
        &self.included
    }

    pub fn is_included(&self, field: &str) -> bool {
        self.included.iter().any(|name| name == field)
    }

    /// Flips inclusion of `field`. Returns `false` when the row has no such
    /// field, in which case nothing changes.
    pub fn toggle(&mut self, field: &str) -> bool {
        if !self.row.contains_key(field) {
            return false;
        }
        if self.is_included(field) {
            self.included.retain(|name| name != field);
        } else {
            let included = std::mem::take(&mut self.included);
            self.included = self
                .row
                .keys()
                .filter(|key| *key == field || included.iter().any(|name| name == *key))
                .map(str::to_string)
                .collect();
        }
        true
    }
}
