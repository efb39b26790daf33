//! Table types.

use serde::{Deserialize, Serialize};

/// Table role, assigned by position within a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Approval signature block (first table)
    Approval,
    /// Key/value report information (second table)
    Metadata,
    /// Any later data table
    #[default]
    Generic,
}

impl TableKind {
    /// Kind for the table at `ordinal` (0-based) among the document's tables.
    pub fn from_ordinal(ordinal: usize) -> Self {
        match ordinal {
            0 => TableKind::Approval,
            1 => TableKind::Metadata,
            _ => TableKind::Generic,
        }
    }

    /// Lowercase name used in CSS classes and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Approval => "approval",
            TableKind::Metadata => "metadata",
            TableKind::Generic => "generic",
        }
    }
}

/// A table structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Positional kind
    pub kind: TableKind,

    /// Header row, if the table has one
    pub header: Option<TableRow>,

    /// Body rows
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table of the given kind.
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            header: None,
            rows: Vec::new(),
        }
    }

    /// Set the header row and return self.
    pub fn with_header(mut self, header: TableRow) -> Self {
        self.header = Some(header);
        self
    }

    /// Add a body row.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    /// Number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.rows.iter())
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(0)
    }

    /// Check if the table has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.rows.is_empty()
    }

    /// Iterate over all rows, header first.
    pub fn all_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.header.iter().chain(self.rows.iter())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.all_rows()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Look up a value in a key/value table by its label.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.cells.first().map(|c| c.content.trim()) == Some(key))
            .and_then(|r| r.cells.get(1))
            .map(|c| c.content.trim())
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::new).collect())
    }

    /// Check if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(TableCell::is_blank)
    }

    /// Get plain text representation, cells separated by tabs.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell holding raw text.
///
/// The content may contain `<br>` line-break markers; no other inline
/// markup is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Raw cell content
    pub content: String,
}

impl TableCell {
    /// Create a cell with content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Visual lines of the cell, split on line-break markers.
    pub fn lines(&self) -> Vec<&str> {
        split_line_breaks(&self.content)
    }

    /// Check if the cell renders as blank space.
    pub fn is_blank(&self) -> bool {
        self.lines().iter().all(|l| l.trim().is_empty())
    }

    /// Get plain text content with line breaks turned into spaces.
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split text on `<br>`, `<br/>` and `<br />` markers (ASCII case-insensitive).
pub fn split_line_breaks(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 3 <= bytes.len() {
        if bytes[i] == b'<' && bytes[i + 1..i + 3].eq_ignore_ascii_case(b"br") {
            if let Some(end) = line_break_end(bytes, i + 3) {
                parts.push(&text[start..i]);
                start = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    parts.push(&text[start..]);
    parts
}

/// Position just past the closing `>` of a `<br` marker starting its tail at `pos`.
fn line_break_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while pos < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'/' {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'>') => Some(pos + 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_ordinal() {
        assert_eq!(TableKind::from_ordinal(0), TableKind::Approval);
        assert_eq!(TableKind::from_ordinal(1), TableKind::Metadata);
        assert_eq!(TableKind::from_ordinal(2), TableKind::Generic);
        assert_eq!(TableKind::from_ordinal(17), TableKind::Generic);
    }

    #[test]
    fn test_table_with_data() {
        let mut table =
            Table::new(TableKind::Generic).with_header(TableRow::from_strings(["구분", "내용"]));
        table.add_row(TableRow::from_strings(["예산", "100"]));
        table.add_row(TableRow::from_strings(["인력", "3", "비고"]));

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_lookup() {
        let mut table = Table::new(TableKind::Metadata);
        table.add_row(TableRow::from_strings(["팀명", "기획팀"]));
        table.add_row(TableRow::from_strings(["일시", "2024. 01. 01."]));
        assert_eq!(table.lookup("팀명"), Some("기획팀"));
        assert_eq!(table.lookup("작성자"), None);
    }

    #[test]
    fn test_split_line_breaks() {
        assert_eq!(split_line_breaks("a<br>b"), vec!["a", "b"]);
        assert_eq!(split_line_breaks("a<BR/>b<br />c"), vec!["a", "b", "c"]);
        assert_eq!(split_line_breaks("no break"), vec!["no break"]);
        assert_eq!(split_line_breaks("<bridge>"), vec!["<bridge>"]);
        assert_eq!(split_line_breaks("끝<br>"), vec!["끝", ""]);
    }

    #[test]
    fn test_cell_blank() {
        assert!(TableCell::empty().is_blank());
        assert!(TableCell::new(" <br> ").is_blank());
        assert!(!TableCell::new("서명").is_blank());
        assert_eq!(TableCell::new("1층<br>회의실").plain_text(), "1층 회의실");
    }
}
