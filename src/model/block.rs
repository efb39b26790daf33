//! Block-level types.

use super::Table;
use serde::{Deserialize, Serialize};

/// One structural unit of a rendered report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Document title.
    ///
    /// `marker` is set when the title came from the fixed title marker
    /// phrase; such titles are rendered centered and letter-spaced.
    Title {
        /// Heading text
        text: String,
        /// Whether the line was the fixed title marker
        marker: bool,
    },

    /// Left-aligned section heading (`## ` line). Never the document title.
    Heading {
        /// Heading text
        text: String,
    },

    /// A numbered outline line (Korean legal-style numbering).
    OutlineLine {
        /// Nesting level derived from the numbering pattern
        level: OutlineLevel,
        /// Numbering marker as written, e.g. `"가."` or `"1)"`
        marker: String,
        /// Text after the marker
        text: String,
    },

    /// A table, tagged with its positional kind.
    Table(Table),

    /// Explicit vertical space produced by a blank input line.
    Spacer,

    /// Unindented paragraph.
    PlainText {
        /// Paragraph text
        text: String,
    },

    /// Bullet list item (`- ` or `* ` prefix).
    ListItem {
        /// Item text without the bullet
        text: String,
    },
}

impl Block {
    /// Create a plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Block::PlainText { text: text.into() }
    }

    /// Create a title block.
    pub fn title(text: impl Into<String>, marker: bool) -> Self {
        Block::Title {
            text: text.into(),
            marker,
        }
    }

    /// Create a section heading.
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading { text: text.into() }
    }

    /// Create an outline line.
    pub fn outline(level: OutlineLevel, marker: impl Into<String>, text: impl Into<String>) -> Self {
        Block::OutlineLine {
            level,
            marker: marker.into(),
            text: text.into(),
        }
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Get the table if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Title { text, .. } => text.clone(),
            Block::Heading { text } => text.clone(),
            Block::OutlineLine { marker, text, .. } => format!("{} {}", marker, text),
            Block::Table(t) => t.plain_text(),
            Block::Spacer => String::new(),
            Block::PlainText { text } => text.clone(),
            Block::ListItem { text } => format!("- {}", text),
        }
    }
}

/// Outline nesting level, one per Korean numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineLevel {
    /// `1.` style, no indent
    Decimal,
    /// `가.` style, one step in
    Syllable,
    /// `1)` style, two steps in
    DecimalParen,
    /// `가)` style, three steps in
    SyllableParen,
}

impl OutlineLevel {
    /// All levels in classification priority order.
    pub const ALL: [OutlineLevel; 4] = [
        OutlineLevel::Decimal,
        OutlineLevel::Syllable,
        OutlineLevel::DecimalParen,
        OutlineLevel::SyllableParen,
    ];

    /// Indentation depth (0-3).
    pub fn depth(self) -> u8 {
        match self {
            OutlineLevel::Decimal => 0,
            OutlineLevel::Syllable => 1,
            OutlineLevel::DecimalParen => 2,
            OutlineLevel::SyllableParen => 3,
        }
    }

    /// Level for a given depth, if in range.
    pub fn from_depth(depth: u8) -> Option<Self> {
        Self::ALL.get(depth as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_depths() {
        for (i, level) in OutlineLevel::ALL.iter().enumerate() {
            assert_eq!(level.depth() as usize, i);
            assert_eq!(OutlineLevel::from_depth(i as u8), Some(*level));
        }
        assert_eq!(OutlineLevel::from_depth(4), None);
    }

    #[test]
    fn test_block_plain_text() {
        let block = Block::outline(OutlineLevel::Syllable, "가.", "세부 내용");
        assert_eq!(block.plain_text(), "가. 세부 내용");
        assert_eq!(Block::Spacer.plain_text(), "");
        assert!(!Block::text("x").is_table());
    }

    #[test]
    fn test_block_serde_tag() {
        let json = serde_json::to_string(&Block::title("보 고 서", true)).unwrap();
        assert!(json.contains("\"type\":\"title\""));
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Block::title("보 고 서", true));
    }
}
