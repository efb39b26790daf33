//! Visitor pattern for walking a document through a serializer.
//!
//! Every output format implements [`BlockWriter`], one method per block
//! variant. [`walk`] drives a writer over a document, consulting a
//! [`DocumentVisitor`] before each block so callers can replace or skip
//! elements without touching the serializer.
//!
//! # Example
//!
//! ```
//! use kreport::render::visitor::{DocumentVisitor, VisitorAction};
//! use kreport::model::Table;
//!
//! struct HideTables;
//!
//! impl DocumentVisitor for HideTables {
//!     fn visit_table(&mut self, _table: &Table) -> VisitorAction {
//!         VisitorAction::Skip
//!     }
//! }
//! ```

use crate::error::Result;
use crate::model::{Block, Document, OutlineLevel, Table};

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the element with custom output.
    Replace(String),

    /// Skip this element entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the element should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting document blocks during rendering.
///
/// All methods return `VisitorAction::Continue` by default.
pub trait DocumentVisitor {
    /// Called before rendering a title.
    fn visit_title(&mut self, text: &str, marker: bool) -> VisitorAction {
        let _ = (text, marker);
        VisitorAction::Continue
    }

    /// Called before rendering a section heading.
    fn visit_heading(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }

    /// Called before rendering an outline line.
    fn visit_outline(&mut self, level: OutlineLevel, marker: &str, text: &str) -> VisitorAction {
        let _ = (level, marker, text);
        VisitorAction::Continue
    }

    /// Called before rendering a table.
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called before rendering a spacer.
    fn visit_spacer(&mut self) -> VisitorAction {
        VisitorAction::Continue
    }

    /// Called before rendering a plain paragraph.
    fn visit_text(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }

    /// Called before rendering a list item.
    fn visit_list_item(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }
}

/// A serializer for the block variant set.
pub trait BlockWriter {
    /// Write a title.
    fn write_title(&mut self, text: &str, marker: bool) -> Result<()>;

    /// Write a section heading.
    fn write_heading(&mut self, text: &str) -> Result<()>;

    /// Write an outline line.
    fn write_outline(&mut self, level: OutlineLevel, marker: &str, text: &str) -> Result<()>;

    /// Write a table.
    fn write_table(&mut self, table: &Table) -> Result<()>;

    /// Write vertical space.
    fn write_spacer(&mut self) -> Result<()>;

    /// Write a plain paragraph.
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Write a list item.
    fn write_list_item(&mut self, text: &str) -> Result<()>;

    /// Write visitor replacement content verbatim.
    fn write_raw(&mut self, content: &str) -> Result<()>;
}

/// Drive `writer` over every block of `doc`, consulting `visitor` first.
pub fn walk<V, W>(doc: &Document, visitor: &mut V, writer: &mut W) -> Result<()>
where
    V: DocumentVisitor + ?Sized,
    W: BlockWriter + ?Sized,
{
    for block in doc.blocks() {
        let action = match block {
            Block::Title { text, marker } => visitor.visit_title(text, *marker),
            Block::Heading { text } => visitor.visit_heading(text),
            Block::OutlineLine {
                level,
                marker,
                text,
            } => visitor.visit_outline(*level, marker, text),
            Block::Table(table) => visitor.visit_table(table),
            Block::Spacer => visitor.visit_spacer(),
            Block::PlainText { text } => visitor.visit_text(text),
            Block::ListItem { text } => visitor.visit_list_item(text),
        };

        match action {
            VisitorAction::Skip => continue,
            VisitorAction::Replace(content) => writer.write_raw(&content)?,
            VisitorAction::Continue => write_block(writer, block)?,
        }
    }
    Ok(())
}

fn write_block<W: BlockWriter + ?Sized>(writer: &mut W, block: &Block) -> Result<()> {
    match block {
        Block::Title { text, marker } => writer.write_title(text, *marker),
        Block::Heading { text } => writer.write_heading(text),
        Block::OutlineLine {
            level,
            marker,
            text,
        } => writer.write_outline(*level, marker, text),
        Block::Table(table) => writer.write_table(table),
        Block::Spacer => writer.write_spacer(),
        Block::PlainText { text } => writer.write_text(text),
        Block::ListItem { text } => writer.write_list_item(text),
    }
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentVisitor for DefaultVisitor {}

/// Visitor that drops spacer blocks.
#[derive(Debug, Clone, Default)]
pub struct SkipSpacersVisitor;

impl DocumentVisitor for SkipSpacersVisitor {
    fn visit_spacer(&mut self) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn DocumentVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    fn first_action(
        &mut self,
        mut f: impl FnMut(&mut Box<dyn DocumentVisitor>) -> VisitorAction,
    ) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = f(visitor);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentVisitor for CompositeVisitor {
    fn visit_title(&mut self, text: &str, marker: bool) -> VisitorAction {
        self.first_action(|v| v.visit_title(text, marker))
    }

    fn visit_heading(&mut self, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_heading(text))
    }

    fn visit_outline(&mut self, level: OutlineLevel, marker: &str, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_outline(level, marker, text))
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        self.first_action(|v| v.visit_table(table))
    }

    fn visit_spacer(&mut self) -> VisitorAction {
        self.first_action(|v| v.visit_spacer())
    }

    fn visit_text(&mut self, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_text(text))
    }

    fn visit_list_item(&mut self, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_list_item(text))
    }
}
