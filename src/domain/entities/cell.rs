use std::borrow::Cow;

/// A single decoded spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Textual form used for display, matching and printing.
    ///
    /// `placeholder` stands in for empty or absent cells so they take part in
    /// search the same way they are shown.
    pub fn render<'a>(&'a self, placeholder: &'a str) -> Cow<'a, str> {
        match self {
            CellValue::Text(text) => Cow::Borrowed(text.as_str()),
            CellValue::Number(number) => Cow::Owned(number.to_string()),
            CellValue::Empty => Cow::Borrowed(placeholder),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}
