//! Table classification by position.
//!
//! The first valid table in a report is the approval signature block, the
//! second is the report information table, and every later table is a
//! plain data table. The ordinal is passed in explicitly so the whole
//! conversion stays a pure function of its inputs.

use super::segmenter::{RawLine, RawTable};
use crate::model::{Block, Table, TableCell, TableKind, TableRow};

/// Build a typed table from a valid raw block at the given ordinal.
pub fn build_table(raw: &RawTable, ordinal: usize) -> Table {
    let kind = TableKind::from_ordinal(ordinal);
    let mut rows = raw.data_rows().map(to_row);

    let mut table = Table::new(kind);
    let has_header = match kind {
        // Key/value rows have no header unless the block declares one.
        TableKind::Metadata => raw.has_header_divider(),
        TableKind::Approval | TableKind::Generic => true,
    };

    if has_header {
        table.header = rows.next();
    }
    table.rows = rows.collect();

    pad_rows(&mut table);
    table
}

/// Turn an invalid table block into one plain paragraph per input line.
pub fn degrade(raw: &RawTable) -> Vec<Block> {
    log::warn!(
        "Malformed table block with {} line(s) rendered as text",
        raw.line_count()
    );
    raw.lines.iter().map(|l| Block::text(l.text.clone())).collect()
}

/// Find where an approval block's signature rows end.
///
/// An approval block is a header, a divider and blank signature rows. If a
/// row with text follows at least one blank signature row, the returned
/// index is the line where the next table begins.
pub fn signature_split_point(raw: &RawTable) -> Option<usize> {
    if !raw.has_header_divider() {
        return None;
    }

    let mut seen_blank = false;
    for (i, line) in raw.lines.iter().enumerate().skip(2) {
        if line.divider {
            continue;
        }
        if line.is_blank() {
            seen_blank = true;
        } else if seen_blank {
            return Some(i);
        } else {
            return None;
        }
    }
    None
}

fn to_row(line: &RawLine) -> TableRow {
    TableRow::new(line.cells.iter().map(TableCell::new).collect())
}

/// Pad short rows with empty cells so every row has the table's width.
fn pad_rows(table: &mut Table) {
    let width = table.column_count();
    for row in table.header.iter_mut().chain(table.rows.iter_mut()) {
        while row.cells.len() < width {
            row.cells.push(TableCell::empty());
        }
    }
}
