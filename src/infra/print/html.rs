use std::fmt::Write as _;

use crate::domain::entities::document::PrintDocument;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders the printout as a standalone HTML page, one line per field.
pub fn render_html(document: &PrintDocument) -> String {
    let mut body = String::new();
    for line in &document.lines {
        let _ = write!(
            body,
            "<div style=\"margin-bottom: 8px;\"><strong>{}:</strong> {}</div>",
            escape_html(&line.label),
            escape_html(&line.value)
        );
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\nbody {{ font-family: sans-serif; }}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(&document.title),
        body
    )
}
