//! Integration tests for the visitor pattern.

use kreport::model::{Block, Document, OutlineLevel, Table, TableKind, TableRow};
use kreport::render::visitor::{
    walk, BlockWriter, CompositeVisitor, DefaultVisitor, DocumentVisitor, SkipSpacersVisitor,
    VisitorAction,
};
use kreport::render::{HtmlRenderer, RenderOptions, TextRenderer};
use kreport::ReportParser;

/// Custom visitor that tracks visit counts.
#[derive(Default)]
struct CountingVisitor {
    title_count: usize,
    outline_count: usize,
    table_count: usize,
    text_count: usize,
    spacer_count: usize,
}

impl DocumentVisitor for CountingVisitor {
    fn visit_title(&mut self, _text: &str, _marker: bool) -> VisitorAction {
        self.title_count += 1;
        VisitorAction::Continue
    }

    fn visit_outline(&mut self, _level: OutlineLevel, _marker: &str, _text: &str) -> VisitorAction {
        self.outline_count += 1;
        VisitorAction::Continue
    }

    fn visit_table(&mut self, _table: &Table) -> VisitorAction {
        self.table_count += 1;
        VisitorAction::Continue
    }

    fn visit_spacer(&mut self) -> VisitorAction {
        self.spacer_count += 1;
        VisitorAction::Continue
    }

    fn visit_text(&mut self, _text: &str) -> VisitorAction {
        self.text_count += 1;
        VisitorAction::Continue
    }
}

/// Replaces the approval table with a placeholder line.
struct RedactApproval;

impl DocumentVisitor for RedactApproval {
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        if table.kind == TableKind::Approval {
            VisitorAction::Replace("[결재란]".to_string())
        } else {
            VisitorAction::Continue
        }
    }
}

/// Drops every outline line below the first level.
struct TopLevelOnly;

impl DocumentVisitor for TopLevelOnly {
    fn visit_outline(&mut self, level: OutlineLevel, _marker: &str, _text: &str) -> VisitorAction {
        if level == OutlineLevel::Decimal {
            VisitorAction::Continue
        } else {
            VisitorAction::Skip
        }
    }
}

const REPORT: &str = "\
| 담당 | 팀장 |
|---|---|
|  |  |
| 팀명 | 기획팀 |
| 일시 | 2024. 01. 05. |

**업무 보고**

1. 개요
가. 세부 내용 설명
참고 사항";

fn document() -> Document {
    ReportParser::new().parse(REPORT)
}

fn text_with<V: DocumentVisitor>(doc: &Document, visitor: &mut V) -> String {
    let mut writer = TextRenderer::default();
    walk(doc, visitor, &mut writer).unwrap();
    writer.finish()
}

#[test]
fn test_default_visitor_all_continue() {
    let mut visitor = DefaultVisitor::new();
    let table = Table::new(TableKind::Generic);

    assert!(matches!(visitor.visit_title("제목", false), VisitorAction::Continue));
    assert!(matches!(visitor.visit_table(&table), VisitorAction::Continue));
    assert!(matches!(visitor.visit_spacer(), VisitorAction::Continue));
    assert!(matches!(
        visitor.visit_outline(OutlineLevel::Syllable, "가.", "내용"),
        VisitorAction::Continue
    ));
}

#[test]
fn test_counting_visitor_walk() {
    let doc = document();
    let mut visitor = CountingVisitor::default();
    let mut writer = TextRenderer::default();
    walk(&doc, &mut visitor, &mut writer).unwrap();

    assert_eq!(visitor.title_count, 1);
    assert_eq!(visitor.outline_count, 2);
    assert_eq!(visitor.table_count, 2);
    assert_eq!(visitor.text_count, 1);
    assert_eq!(visitor.spacer_count, 2);
}

#[test]
fn test_skip_spacers_visitor() {
    let doc = document();
    let text = text_with(&doc, &mut SkipSpacersVisitor);
    assert!(!text.contains("\n\n"));
    assert!(text.contains("업무 보고\n1. 개요"));
}

#[test]
fn test_replace_in_text_output() {
    let doc = document();
    let text = text_with(&doc, &mut RedactApproval);
    assert!(text.starts_with("[결재란]"));
    assert!(text.contains("팀명 | 기획팀"));
    assert!(!text.contains("담당 | 팀장"));
}

#[test]
fn test_replace_in_html_output() {
    let doc = document();
    let html = HtmlRenderer::new(RenderOptions::default())
        .render_with_visitor(&doc, &mut RedactApproval)
        .unwrap();
    assert!(html.contains("[결재란]"));
    assert!(!html.contains("report-table approval"));
    assert!(html.contains("report-table metadata"));
}

#[test]
fn test_composite_visitor_chaining() {
    let doc = document();
    let mut composite = CompositeVisitor::new()
        .with_visitor(RedactApproval)
        .with_visitor(TopLevelOnly)
        .with_visitor(SkipSpacersVisitor)
        .with_visitor(DefaultVisitor);

    let text = text_with(&doc, &mut composite);
    assert!(text.starts_with("[결재란]"));
    assert!(text.contains("1. 개요"));
    assert!(!text.contains("가. 세부"));
    assert!(!text.contains("\n\n"));

    // Paragraphs continue through every visitor
    assert!(matches!(composite.visit_text("문단"), VisitorAction::Continue));
}

#[test]
fn test_visitor_action_methods() {
    let continue_action = VisitorAction::Continue;
    assert!(!continue_action.should_skip());
    assert!(!continue_action.is_replace());
    assert!(continue_action.replacement().is_none());

    let skip_action = VisitorAction::Skip;
    assert!(skip_action.should_skip());
    assert!(!skip_action.is_replace());

    let replace_action = VisitorAction::Replace("replaced".to_string());
    assert!(!replace_action.should_skip());
    assert!(replace_action.is_replace());
    assert_eq!(replace_action.replacement(), Some("replaced"));
}

/// Writer that only counts table rows.
#[derive(Default)]
struct RowCounter(usize);

impl BlockWriter for RowCounter {
    fn write_title(&mut self, _: &str, _: bool) -> kreport::Result<()> {
        Ok(())
    }
    fn write_heading(&mut self, _: &str) -> kreport::Result<()> {
        Ok(())
    }
    fn write_outline(&mut self, _: OutlineLevel, _: &str, _: &str) -> kreport::Result<()> {
        Ok(())
    }
    fn write_table(&mut self, table: &Table) -> kreport::Result<()> {
        self.0 += table.row_count();
        Ok(())
    }
    fn write_spacer(&mut self) -> kreport::Result<()> {
        Ok(())
    }
    fn write_text(&mut self, _: &str) -> kreport::Result<()> {
        Ok(())
    }
    fn write_list_item(&mut self, _: &str) -> kreport::Result<()> {
        Ok(())
    }
    fn write_raw(&mut self, _: &str) -> kreport::Result<()> {
        Ok(())
    }
}

#[test]
fn test_custom_block_writer() {
    let mut table = Table::new(TableKind::Generic).with_header(TableRow::from_strings(["항목", "값"]));
    table.add_row(TableRow::from_strings(["예산", "100"]));
    let doc = Document::from_blocks(vec![Block::title("제목", false), Block::Table(table)]);

    let mut writer = RowCounter::default();
    walk(&doc, &mut DefaultVisitor::new(), &mut writer).unwrap();
    assert_eq!(writer.0, 2);
}
