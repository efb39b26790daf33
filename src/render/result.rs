//! Rendered report snapshot with statistics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, OutlineLevel, Table, TableKind};
use crate::parser::ReportParser;

use super::html::HtmlRenderer;
use super::visitor::{DocumentVisitor, VisitorAction};
use super::RenderOptions;

/// A report rendered once from its source text.
///
/// Screen display and every export read from this snapshot; nothing
/// downstream parses the source text again.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    source: Arc<str>,
    document: Arc<Document>,
    fragment: Arc<str>,
    stats: RenderStats,
}

impl RenderedReport {
    /// Parse and render `source` in one step.
    pub fn render(source: &str, parser: &ReportParser, options: &RenderOptions) -> Result<Self> {
        let document = parser.parse(source);
        Self::from_document(source, document, options)
    }

    /// Render an already parsed document.
    pub fn from_document(source: &str, document: Document, options: &RenderOptions) -> Result<Self> {
        let mut stats = StatsVisitor::default();
        let fragment =
            HtmlRenderer::new(options.clone()).render_with_visitor(&document, &mut stats)?;

        log::debug!(
            "Rendered report: {} blocks, {} tables, {} bytes of HTML",
            document.len(),
            stats.stats.table_count,
            fragment.len()
        );

        Ok(Self {
            source: Arc::from(source),
            document: Arc::new(document),
            fragment: Arc::from(fragment),
            stats: stats.stats,
        })
    }

    /// Source markdown the report was rendered from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle to the parsed document.
    pub fn document_arc(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    /// The HTML fragment.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Block statistics gathered while rendering.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }
}

/// Statistics collected while rendering a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of title blocks
    pub title_count: u32,

    /// Outline lines per level, indexed by depth
    pub outline_counts: [u32; 4],

    /// Number of tables
    pub table_count: u32,

    /// Whether an approval table is present
    pub has_approval: bool,

    /// Whether a metadata table is present
    pub has_metadata: bool,

    /// Number of plain paragraphs
    pub paragraph_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Total outline lines across all levels.
    pub fn outline_count(&self) -> u32 {
        self.outline_counts.iter().sum()
    }

    fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

/// Visitor that counts blocks without altering output.
#[derive(Debug, Default)]
struct StatsVisitor {
    stats: RenderStats,
}

impl DocumentVisitor for StatsVisitor {
    fn visit_title(&mut self, text: &str, _marker: bool) -> VisitorAction {
        self.stats.title_count += 1;
        self.stats.count_text(text);
        VisitorAction::Continue
    }

    fn visit_outline(&mut self, level: OutlineLevel, _marker: &str, text: &str) -> VisitorAction {
        self.stats.outline_counts[usize::from(level.depth())] += 1;
        self.stats.count_text(text);
        VisitorAction::Continue
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        self.stats.table_count += 1;
        match table.kind {
            TableKind::Approval => self.stats.has_approval = true,
            TableKind::Metadata => self.stats.has_metadata = true,
            TableKind::Generic => {}
        }
        self.stats.count_text(&table.plain_text());
        VisitorAction::Continue
    }

    fn visit_text(&mut self, text: &str) -> VisitorAction {
        self.stats.paragraph_count += 1;
        self.stats.count_text(text);
        VisitorAction::Continue
    }

    fn visit_list_item(&mut self, text: &str) -> VisitorAction {
        self.stats.list_item_count += 1;
        self.stats.count_text(text);
        VisitorAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "| 담당 | 팀장 |\n|---|---|\n|  |  |\n| 팀명 | 기획팀 |\n| 일시 | 2024. 01. 01. |\n\n**업무 보고**\n\n1. 개요\n가. 세부 내용 설명\n- 항목";

    #[test]
    fn test_render_stats() {
        let report =
            RenderedReport::render(REPORT, &ReportParser::new(), &RenderOptions::default()).unwrap();
        let stats = report.stats();
        assert_eq!(stats.table_count, 2);
        assert!(stats.has_approval);
        assert!(stats.has_metadata);
        assert_eq!(stats.title_count, 1);
        assert_eq!(stats.outline_counts, [1, 1, 0, 0]);
        assert_eq!(stats.outline_count(), 2);
        assert_eq!(stats.list_item_count, 1);
        assert!(stats.char_count > 0);
    }

    #[test]
    fn test_snapshot_matches_fresh_render() {
        let parser = ReportParser::new();
        let options = RenderOptions::default();
        let first = RenderedReport::render(REPORT, &parser, &options).unwrap();
        let second = RenderedReport::render(REPORT, &parser, &options).unwrap();
        assert_eq!(first.fragment(), second.fragment());
        assert_eq!(first.document(), second.document());
        assert_eq!(first.source(), REPORT);
    }
}
