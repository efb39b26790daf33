//! Document-level types.

use super::{Block, Table, TableKind};
use serde::{Deserialize, Serialize};

/// A parsed report document.
///
/// Documents are immutable once built: a refinement produces a new
/// document rather than editing this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document from an ordered block list.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Blocks in display order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    /// First table of the given kind.
    pub fn table_of_kind(&self, kind: TableKind) -> Option<&Table> {
        self.tables().find(|t| t.kind == kind)
    }

    /// First title text, if any.
    pub fn title(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Title { text, marker: false } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Report information read from the metadata table and title.
    pub fn info(&self) -> ReportInfo {
        let metadata = self.table_of_kind(TableKind::Metadata);
        let field = |key: &str| metadata.and_then(|t| t.lookup(key)).map(str::to_string);

        ReportInfo {
            title: self.title().map(str::to_string),
            team: field("팀명"),
            date: field("일시"),
            author: field("작성자"),
            approvers: self
                .table_of_kind(TableKind::Approval)
                .and_then(|t| t.header.as_ref())
                .map(|h| h.cells.iter().map(|c| c.plain_text()).collect())
                .unwrap_or_default(),
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Report information derived from a document's structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInfo {
    /// Report title
    pub title: Option<String>,

    /// Team name (팀명)
    pub team: Option<String>,

    /// Report date (일시)
    pub date: Option<String>,

    /// Author (작성자)
    pub author: Option<String>,

    /// Approval chain titles, in signing order
    pub approvers: Vec<String>,
}
