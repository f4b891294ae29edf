// HTML view of the computed table.

use std::fmt::Write;

use pay_calc::format::display_table;

use crate::paysheet::*;

/// Escape HTML special characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A striped table of the display form of `table`.
pub fn render_html(table: &Table) -> String {
    let display = display_table(table);
    let mut out = String::new();
    out.push_str("<table class=\"table table-striped\">\n  <thead>\n    <tr>");
    for c in display.columns() {
        let _ = write!(out, "<th>{}</th>", escape_html(c));
    }
    out.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in display.rows() {
        out.push_str("    <tr>");
        for v in row {
            let _ = write!(out, "<td>{}</td>", escape_html(&format::display_value(v)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}

/// A standalone page around `render_html`.
pub fn render_page(title: &str, table: &Table) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
<div class="container-fluid">
<h1>{title}</h1>
{table}</div>
</body>
</html>
"#,
        title = escape_html(title),
        table = render_html(table)
    )
}
