#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintLine {
    pub label: String,
    pub value: String,
}

/// The billing printout for one row: a title and `label: value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub title: String,
    pub lines: Vec<PrintLine>,
}

impl PrintDocument {
    pub fn text_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| format!("{}: {}", line.label, line.value))
            .collect()
    }
}
