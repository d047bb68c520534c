//! Spreadsheet content plugin.
//!
//! A grid lives in a frame body as table markup. The first row is the header
//! row. Structural edits never leave the grid without a row or a column.
//! Cells hold their inner markup, and edits rewrite only the table: whatever
//! surrounds it in the body is kept as written.

use std::ops::Range;

use scraper::{ElementRef, Html, Selector};

/// Structural edit requested from the grid toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOp {
    AddRow,
    RemoveRow,
    AddColumn,
    RemoveColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    rows: Vec<Vec<String>>,
}

impl Default for Spreadsheet {
    /// Grid placed in a freshly added frame: two header cells and one empty row.
    fn default() -> Self {
        Self {
            rows: vec![
                vec!["Header 1".to_string(), "Header 2".to_string()],
                vec![String::new(), String::new()],
            ],
        }
    }
}

impl Spreadsheet {
    /// Build from explicit rows; ragged rows are padded to the widest one.
    /// Returns `None` for a grid with no cells.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Option<Self> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Some(Self { rows })
    }

    /// Parse the first table in a frame body. Anything outside the table
    /// (stale toolbar markup, text) is ignored.
    pub fn parse(markup: &str) -> Option<Self> {
        Self::locate(markup).map(|(grid, _)| grid)
    }

    /// Parse the first table and return it with its byte range in `body`.
    pub fn locate(body: &str) -> Option<(Self, Range<usize>)> {
        let span = table_span(body)?;
        let grid = Self::parse_table(&body[span.clone()])?;
        Some((grid, span))
    }

    /// `body` with the table at `span` replaced by this grid's markup.
    pub fn splice_into(&self, body: &str, span: Range<usize>) -> String {
        let mut out = String::with_capacity(body.len() + 64);
        out.push_str(&body[..span.start]);
        out.push_str(&self.to_markup());
        out.push_str(&body[span.end..]);
        out
    }

    fn parse_table(markup: &str) -> Option<Self> {
        let table_sel = Selector::parse("table").unwrap_or_else(|_| unreachable!());
        let row_sel = Selector::parse("tr").unwrap_or_else(|_| unreachable!());
        let cell_sel = Selector::parse("th, td").unwrap_or_else(|_| unreachable!());

        let fragment = Html::parse_fragment(markup);
        let table = fragment.select(&table_sel).next()?;
        let rows = table
            .select(&row_sel)
            .map(|row: ElementRef<'_>| {
                row.select(&cell_sel)
                    .map(|cell| cell.inner_html().trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Apply a structural edit. Returns `false` when the edit was refused
    /// (removing the last row or column), leaving the grid untouched.
    pub fn apply(&mut self, op: GridOp) -> bool {
        match op {
            GridOp::AddRow => {
                let cols = self.column_count();
                self.rows.push(vec![String::new(); cols]);
                true
            }
            GridOp::RemoveRow => {
                if self.rows.len() <= 1 {
                    return false;
                }
                self.rows.pop();
                true
            }
            GridOp::AddColumn => {
                for row in &mut self.rows {
                    row.push(String::new());
                }
                true
            }
            GridOp::RemoveColumn => {
                if self.column_count() <= 1 {
                    return false;
                }
                for row in &mut self.rows {
                    row.pop();
                }
                true
            }
        }
    }

    /// Store an edited cell's markup as reported by the editable cell.
    /// Returns `false` for an out-of-range cell.
    pub fn set_cell(&mut self, row: usize, col: usize, markup: impl Into<String>) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = markup.into();
                true
            }
            None => false,
        }
    }

    /// Table markup stored in the frame body.
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<table>");
        let mut rows = self.rows.iter();
        if let Some(header) = rows.next() {
            out.push_str("<thead><tr>");
            for text in header {
                push_cell(&mut out, "th", text);
            }
            out.push_str("</tr></thead>");
        }
        out.push_str("<tbody>");
        for row in rows {
            out.push_str("<tr>");
            for text in row {
                push_cell(&mut out, "td", text);
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table>");
        out
    }
}

fn push_cell(out: &mut String, tag: &str, markup: &str) {
    out.push('<');
    out.push_str(tag);
    out.push_str(r#" contenteditable="true">"#);
    out.push_str(markup);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Byte range of the first `<table>` element, nested tables included.
/// An unclosed table runs to the end of the body.
fn table_span(body: &str) -> Option<Range<usize>> {
    let lower = body.to_ascii_lowercase();
    let start = find_tag(&lower, "<table", 0)?;
    let mut depth = 0usize;
    let mut at = start;
    loop {
        let open = find_tag(&lower, "<table", at);
        let close = find_tag(&lower, "</table", at);
        match (open, close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                at = o + 1;
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    let end = lower[c..].find('>').map_or(body.len(), |i| c + i + 1);
                    return Some(start..end);
                }
                at = c + 1;
            }
            (_, None) => return Some(start..body.len()),
        }
    }
}

/// Next `tag` (e.g. `<table`) at or after `from` that is a whole tag name.
fn find_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let mut at = from;
    while let Some(i) = lower[at..].find(tag) {
        let pos = at + i;
        match lower.as_bytes().get(pos + tag.len()) {
            Some(b) if *b == b'>' || *b == b'/' || b.is_ascii_whitespace() => return Some(pos),
            None => return Some(pos),
            _ => at = pos + 1,
        }
    }
    None
}
