//! Pipe table conversion
//!
//! ```text
//! | Crop | Yield |
//! |------|------:|
//! | Oyster | **12 kg** |
//! ```
//!
//! becomes one `<table>` with a header row and one body row per line.
//! Emphasis markers inside cells are dropped: cells show literal text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Header line, separator line, then any number of body lines.
static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\|(.+)\|[ \t]*\n\|[-| :]+\|[ \t]*\n((?:\|.+\|[ \t]*(?:\n|\z))*)")
        .expect("Invalid table regex")
});

static CELL_BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid cell bold regex"));

static CELL_ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+?)\*").expect("Invalid cell italic regex"));

/// Replace every pipe table in `text` with table markup.
pub(crate) fn convert_tables(text: &str) -> String {
    TABLE_RE
        .replace_all(text, |caps: &Captures| {
            let header = split_cells(&caps[1]);
            let rows: Vec<Vec<String>> = caps[2]
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| split_cells(strip_outer_pipes(line.trim())))
                .collect();
            table_markup(&header, &rows)
        })
        .into_owned()
}

fn strip_outer_pipes(line: &str) -> &str {
    let line = line.strip_prefix('|').unwrap_or(line);
    line.strip_suffix('|').unwrap_or(line)
}

/// Split the inside of a row (outer pipes already removed) into cell texts.
fn split_cells(inner: &str) -> Vec<String> {
    inner.split('|').map(clean_cell).collect()
}

fn clean_cell(cell: &str) -> String {
    let cell = CELL_BOLD_RE.replace_all(cell, "${1}");
    let cell = CELL_ITALIC_RE.replace_all(&cell, "${1}");
    cell.trim().to_string()
}

fn table_markup(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table><thead><tr>");
    for cell in header {
        out.push_str("<th>");
        out.push_str(cell);
        out.push_str("</th>");
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        assert_eq!(
            convert_tables("|A|B|\n|-|-|\n|1|2|\n"),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_cells_trimmed_and_alignment_separator() {
        let out = convert_tables("| Crop | Yield |\n|:-----|------:|\n| Oyster | 12 kg |\n| Shiitake | 8 kg |");
        assert_eq!(
            out,
            "<table><thead><tr><th>Crop</th><th>Yield</th></tr></thead><tbody>\
             <tr><td>Oyster</td><td>12 kg</td></tr>\
             <tr><td>Shiitake</td><td>8 kg</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_emphasis_stripped_from_cells() {
        let out = convert_tables("|**Metric**|Value|\n|---|---|\n|*Margin*|**42%**|\n");
        assert!(out.contains("<th>Metric</th>"));
        assert!(out.contains("<td>Margin</td><td>42%</td>"));
        assert!(!out.contains('*'));
    }

    #[test]
    fn test_header_without_rows() {
        let out = convert_tables("|A|B|\n|-|-|\n");
        assert_eq!(
            out,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_surrounding_text_kept() {
        let out = convert_tables("Summary:\n|A|\n|-|\n|1|\nDone");
        assert!(out.starts_with("Summary:\n<table>"));
        assert!(out.ends_with("</table>Done"));
    }

    #[test]
    fn test_pipe_line_without_separator_untouched() {
        let text = "|not|a table|\nplain";
        assert_eq!(convert_tables(text), text);
    }

    #[test]
    fn test_empty_cells_kept() {
        let out = convert_tables("|A|B|\n|-|-|\n||x|\n");
        assert!(out.contains("<tr><td></td><td>x</td></tr>"));
    }
}
