//! Plain text rendering of report documents.

use crate::error::Result;
use crate::model::{Document, OutlineLevel, Table, TableKind};

use super::visitor::{walk, BlockWriter, DefaultVisitor, SkipSpacersVisitor};
use super::RenderOptions;

/// Convert a document to plain text.
///
/// Outline lines are indented two spaces per level and table cells are
/// separated by ` | `.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut writer = TextRenderer::default();
    if options.collapse_spacers {
        walk(doc, &mut SkipSpacersVisitor, &mut writer)?;
    } else {
        walk(doc, &mut DefaultVisitor::new(), &mut writer)?;
    }
    Ok(writer.finish())
}

/// Line-oriented plain text writer.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    /// Consume the writer and return the text.
    pub fn finish(self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

impl BlockWriter for TextRenderer {
    fn write_title(&mut self, text: &str, _marker: bool) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn write_heading(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn write_outline(&mut self, level: OutlineLevel, marker: &str, text: &str) -> Result<()> {
        let indent = "  ".repeat(usize::from(level.depth()));
        self.lines.push(format!("{}{} {}", indent, marker, text));
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        for row in table.all_rows() {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.lines().join(" / "))
                .collect();
            let line = cells.join(" | ");
            // Blank signature rows still occupy a line.
            if table.kind == TableKind::Approval || !line.trim().is_empty() {
                self.lines.push(line.trim_end().to_string());
            }
        }
        Ok(())
    }

    fn write_spacer(&mut self) -> Result<()> {
        self.lines.push(String::new());
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn write_list_item(&mut self, text: &str) -> Result<()> {
        self.lines.push(format!("- {}", text));
        Ok(())
    }

    fn write_raw(&mut self, content: &str) -> Result<()> {
        self.lines.push(content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ReportParser;

    #[test]
    fn test_to_text() {
        let doc = ReportParser::new().parse("**제목**\n\n1. 개요\n가. 세부\n- 항목");
        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(text, "제목\n\n1. 개요\n  가. 세부\n- 항목");
    }

    #[test]
    fn test_collapse_spacers() {
        let doc = ReportParser::new().parse("첫째\n\n\n둘째");
        let options = RenderOptions::default().with_collapsed_spacers(true);
        assert_eq!(to_text(&doc, &options).unwrap(), "첫째\n둘째");
    }

    #[test]
    fn test_table_cells() {
        let doc = ReportParser::new()
            .parse("| 담당 | 팀장 |\n|---|---|\n|  |  |\n| 팀명 | 기획팀 |\n| 비고 | 가<br>나 |");
        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert!(text.contains("담당 | 팀장"));
        assert!(text.contains("비고 | 가 / 나"));
    }
}
