//! Table segmentation over line-oriented report text.
//!
//! Contiguous pipe-delimited lines are grouped into [`RawTable`] blocks;
//! every other line passes through unchanged. Classification and
//! validation happen later, in the assembler.

/// One pipe-delimited input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Trimmed original line
    pub text: String,
    /// Trimmed cell contents
    pub cells: Vec<String>,
    /// Whether this is a `|---|:---:|` separator row
    pub divider: bool,
}

impl RawLine {
    /// Parse a table line into cells.
    pub fn parse(line: &str) -> Self {
        let text = line.trim().to_string();
        let cells = split_cells(&text);
        let divider = is_divider(&cells);
        Self {
            text,
            cells,
            divider,
        }
    }

    /// Check if every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A contiguous block of table lines, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// All lines in input order, dividers included
    pub lines: Vec<RawLine>,
}

impl RawTable {
    /// Create a raw table from lines.
    pub fn new(lines: Vec<RawLine>) -> Self {
        Self { lines }
    }

    /// Number of input lines, dividers included.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Data rows (dividers excluded), in order.
    pub fn data_rows(&self) -> impl Iterator<Item = &RawLine> {
        self.lines.iter().filter(|l| !l.divider)
    }

    /// Number of data rows.
    pub fn data_row_count(&self) -> usize {
        self.data_rows().count()
    }

    /// Whether any divider row was seen.
    pub fn has_divider(&self) -> bool {
        self.lines.iter().any(|l| l.divider)
    }

    /// Whether the block opens with a header row followed by a divider.
    pub fn has_header_divider(&self) -> bool {
        self.lines.len() >= 2 && !self.lines[0].divider && self.lines[1].divider
    }

    /// A table needs at least two lines and at least one data row.
    pub fn is_valid(&self) -> bool {
        self.line_count() >= 2 && self.data_row_count() > 0
    }

    /// Split off the lines from `at` onwards into a new raw table.
    pub fn split_off(&mut self, at: usize) -> RawTable {
        RawTable::new(self.lines.split_off(at))
    }
}

/// Output of the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A non-table line, untouched
    Line(&'a str),
    /// A contiguous table block
    Table(RawTable),
}

/// Groups pipe-delimited lines into table blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableSegmenter;

impl TableSegmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self
    }

    /// Segment `text` into lines and table blocks, preserving order.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut current: Vec<RawLine> = Vec::new();

        for line in text.lines() {
            if is_table_line(line) {
                current.push(RawLine::parse(line));
                continue;
            }

            if !current.is_empty() {
                segments.push(Segment::Table(RawTable::new(std::mem::take(&mut current))));
            }
            segments.push(Segment::Line(line));
        }

        // Trailing table at end of input
        if !current.is_empty() {
            segments.push(Segment::Table(RawTable::new(current)));
        }

        log::debug!(
            "TableSegmenter: {} segments, {} table blocks",
            segments.len(),
            segments
                .iter()
                .filter(|s| matches!(s, Segment::Table(_)))
                .count()
        );

        segments
    }
}

/// A line belongs to a table iff its trimmed form starts and ends with `|`.
pub fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Strip the outer pipes and split a table line into trimmed cells.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix('|')
        .and_then(|s| s.strip_suffix('|'))
        .unwrap_or(trimmed);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// A divider row has only `---`, `:---`, `---:` or `:---:` cells.
pub fn is_divider<S: AsRef<str>>(cells: &[S]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| is_divider_cell(c.as_ref()))
}

fn is_divider_cell(cell: &str) -> bool {
    let cell = cell.trim();
    let body = cell.strip_prefix(':').unwrap_or(cell);
    let body = body.strip_suffix(':').unwrap_or(body);
    !body.is_empty() && body.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_table_line() {
        assert!(is_table_line("| a | b |"));
        assert!(is_table_line("   |a|   "));
        assert!(!is_table_line("| a | b"));
        assert!(!is_table_line("a | b |"));
        assert!(!is_table_line("|"));
        assert!(!is_table_line(""));
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| 직위 | 성명 |"), vec!["직위", "성명"]);
        assert_eq!(split_cells("|  |  |"), vec!["", ""]);
        assert_eq!(split_cells("||"), vec![""]);
    }

    #[test]
    fn test_is_divider() {
        assert!(is_divider(&["---", ":---", "---:", ":---:"]));
        assert!(!is_divider(&["---", "값"]));
        assert!(!is_divider(&["", ""]));
        assert!(!is_divider(&[":"]));
        assert!(!is_divider::<&str>(&[]));
    }

    #[test]
    fn test_segment_groups_contiguous_lines() {
        let text = "머리말\n| a | b |\n|---|---|\n| 1 | 2 |\n본문\n| c |\n";
        let segments = TableSegmenter::new().segment(text);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::Line("머리말"));
        match &segments[1] {
            Segment::Table(raw) => {
                assert_eq!(raw.line_count(), 3);
                assert_eq!(raw.data_row_count(), 2);
                assert!(raw.has_header_divider());
                assert!(raw.is_valid());
            }
            other => panic!("expected table, got {:?}", other),
        }
        assert_eq!(segments[2], Segment::Line("본문"));
        match &segments[3] {
            Segment::Table(raw) => assert!(!raw.is_valid()),
            other => panic!("expected trailing table, got {:?}", other),
        }
    }

    #[test]
    fn test_header_and_divider_only_is_valid() {
        let raw = RawTable::new(vec![RawLine::parse("| a |"), RawLine::parse("|---|")]);
        assert!(raw.is_valid());
        assert_eq!(raw.data_row_count(), 1);
    }

    #[test]
    fn test_divider_only_block_is_invalid() {
        let raw = RawTable::new(vec![RawLine::parse("|---|"), RawLine::parse("|:-:|")]);
        assert!(!raw.is_valid());
    }

    #[test]
    fn test_split_off() {
        let mut raw = RawTable::new(vec![
            RawLine::parse("| a |"),
            RawLine::parse("|---|"),
            RawLine::parse("| b |"),
        ]);
        let rest = raw.split_off(2);
        assert_eq!(raw.line_count(), 2);
        assert_eq!(rest.line_count(), 1);
        assert_eq!(rest.lines[0].cells, vec!["b"]);
    }
}
