//! HTML rendering of report documents.
//!
//! The fragment produced here is the single rendered form of a report:
//! the screen page, the Word envelope and the print document all embed it
//! unchanged. Layout is carried in inline styles so the fragment looks the
//! same whichever host renders it.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{Document, OutlineLevel, Table, TableCell, TableKind, TableRow};

use super::visitor::{walk, BlockWriter, DefaultVisitor, DocumentVisitor};
use super::RenderOptions;

/// Border used by every table cell.
const CELL_BORDER: &str = "border:1px solid #000";

/// Convert a document to an HTML fragment.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    HtmlRenderer::new(options.clone()).render(doc)
}

/// HTML fragment renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
    output: String,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    /// Render a document to an HTML fragment.
    pub fn render(self, doc: &Document) -> Result<String> {
        self.render_with_visitor(doc, &mut DefaultVisitor::new())
    }

    /// Render a document, letting `visitor` replace or skip blocks.
    pub fn render_with_visitor<V: DocumentVisitor + ?Sized>(
        mut self,
        doc: &Document,
        visitor: &mut V,
    ) -> Result<String> {
        walk(doc, visitor, &mut self)?;
        Ok(self.output)
    }

    fn push(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.output
            .write_fmt(args)
            .map_err(|e| Error::Render(format!("HTML write error: {}", e)))
    }

    fn render_approval(&mut self, table: &Table) -> Result<()> {
        let width = self.options.signature_cell_width_mm;
        let height = self.options.signature_cell_height_mm;

        self.push(format_args!(
            "<table class=\"report-table approval\" align=\"right\" \
             style=\"border-collapse:collapse;margin:1em 0 1em auto\">\n"
        ))?;
        if let Some(header) = &table.header {
            let style = format!(
                "{};padding:2pt 6pt;text-align:center;font-weight:normal;width:{}mm",
                CELL_BORDER, width
            );
            self.push(format_args!("<thead>\n"))?;
            self.render_row(header, "th", &style, &style)?;
            self.push(format_args!("</thead>\n"))?;
        }

        let style = format!(
            "{};text-align:center;vertical-align:middle;width:{}mm;height:{}mm",
            CELL_BORDER, width, height
        );
        self.render_body(table, &style, &style)?;
        self.push(format_args!("</table>\n<div style=\"clear:both\"></div>\n"))
    }

    fn render_metadata(&mut self, table: &Table) -> Result<()> {
        let label = format!(
            "{};padding:4pt 8pt;text-align:left;font-weight:bold;background:#f1f5f9;width:{}%",
            CELL_BORDER, self.options.label_column_percent
        );
        let value = format!("{};padding:4pt 8pt;text-align:left", CELL_BORDER);

        self.push(format_args!(
            "<table class=\"report-table metadata\" \
             style=\"border-collapse:collapse;width:100%;margin:0 0 1em 0\">\n"
        ))?;
        if let Some(header) = &table.header {
            self.push(format_args!("<thead>\n"))?;
            self.render_row(header, "th", &label, &label)?;
            self.push(format_args!("</thead>\n"))?;
        }
        self.push(format_args!("<tbody>\n"))?;
        for row in &table.rows {
            self.render_key_value_row(row, &label, &value)?;
        }
        self.push(format_args!("</tbody>\n</table>\n"))
    }

    fn render_generic(&mut self, table: &Table) -> Result<()> {
        let head = format!("{};padding:4pt 8pt;text-align:left;font-weight:bold", CELL_BORDER);
        let cell = format!("{};padding:4pt 8pt;text-align:left", CELL_BORDER);

        self.push(format_args!(
            "<table class=\"report-table generic\" \
             style=\"border-collapse:collapse;width:100%;table-layout:fixed;margin:1em 0\">\n"
        ))?;
        if let Some(header) = &table.header {
            self.push(format_args!("<thead>\n"))?;
            self.render_row(header, "th", &head, &head)?;
            self.push(format_args!("</thead>\n"))?;
        }
        self.render_body(table, &cell, &cell)?;
        self.push(format_args!("</table>\n"))
    }

    fn render_body(&mut self, table: &Table, first: &str, rest: &str) -> Result<()> {
        self.push(format_args!("<tbody>\n"))?;
        for row in &table.rows {
            self.render_row(row, "td", first, rest)?;
        }
        self.push(format_args!("</tbody>\n"))
    }

    fn render_key_value_row(&mut self, row: &TableRow, label: &str, value: &str) -> Result<()> {
        self.push(format_args!("<tr>"))?;
        for (i, cell) in row.cells.iter().enumerate() {
            if i == 0 {
                self.push(format_args!(
                    "<th scope=\"row\" style=\"{}\">{}</th>",
                    label,
                    cell_html(cell)
                ))?;
            } else {
                self.push(format_args!("<td style=\"{}\">{}</td>", value, cell_html(cell)))?;
            }
        }
        self.push(format_args!("</tr>\n"))
    }

    fn render_row(&mut self, row: &TableRow, tag: &str, first: &str, rest: &str) -> Result<()> {
        self.push(format_args!("<tr>"))?;
        for (i, cell) in row.cells.iter().enumerate() {
            let style = if i == 0 { first } else { rest };
            self.push(format_args!(
                "<{tag} style=\"{style}\">{}</{tag}>",
                cell_html(cell)
            ))?;
        }
        self.push(format_args!("</tr>\n"))
    }
}

impl BlockWriter for HtmlRenderer {
    fn write_title(&mut self, text: &str, marker: bool) -> Result<()> {
        if marker {
            let spacing = self.options.title_letter_spacing_em;
            self.push(format_args!(
                "<h1 class=\"report-title marker\" \
                 style=\"text-align:center;letter-spacing:{}em;font-size:20pt;margin:0.75em 0 1em 0\">{}</h1>\n",
                spacing,
                escape_html(text)
            ))
        } else {
            self.push(format_args!(
                "<h1 class=\"report-title\" \
                 style=\"text-align:center;font-size:18pt;font-weight:bold;margin:0.75em 0 1em 0\">{}</h1>\n",
                escape_html(text)
            ))
        }
    }

    fn write_heading(&mut self, text: &str) -> Result<()> {
        self.push(format_args!(
            "<h2 class=\"report-heading\" \
             style=\"font-size:15pt;font-weight:bold;margin:1.2em 0 0.6em 0;\
             padding-bottom:0.3em;border-bottom:1px solid #cbd5e1\">{}</h2>\n",
            escape_html(text)
        ))
    }

    fn write_outline(&mut self, level: OutlineLevel, marker: &str, text: &str) -> Result<()> {
        let indent = self.options.indent_step_em * f32::from(level.depth());
        let weight = if level == OutlineLevel::Decimal {
            ";font-weight:bold"
        } else {
            ""
        };
        self.push(format_args!(
            "<p class=\"outline level-{}\" style=\"margin:0 0 0.3em {}em{}\">{} {}</p>\n",
            level.depth(),
            indent,
            weight,
            escape_html(marker),
            escape_html(text)
        ))
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        if table.is_empty() {
            return Ok(());
        }
        match table.kind {
            TableKind::Approval => self.render_approval(table),
            TableKind::Metadata => self.render_metadata(table),
            TableKind::Generic => self.render_generic(table),
        }
    }

    fn write_spacer(&mut self) -> Result<()> {
        self.push(format_args!(
            "<p class=\"spacer\" style=\"margin:0;line-height:1em\">&nbsp;</p>\n"
        ))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.push(format_args!(
            "<p class=\"text\" style=\"margin:0 0 0.3em 0\">{}</p>\n",
            escape_html(text)
        ))
    }

    fn write_list_item(&mut self, text: &str) -> Result<()> {
        self.push(format_args!(
            "<p class=\"list-item\" style=\"margin:0 0 0.3em 1em\">&bull; {}</p>\n",
            escape_html(text)
        ))
    }

    fn write_raw(&mut self, content: &str) -> Result<()> {
        self.output.push_str(content);
        Ok(())
    }
}

/// Cell body: escaped lines joined by `<br>`, blank cells as `&nbsp;`.
fn cell_html(cell: &TableCell) -> String {
    if cell.is_blank() {
        return "&nbsp;".to_string();
    }
    cell.lines()
        .iter()
        .map(|line| escape_html(line.trim()))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::parser::ReportParser;

    fn render(text: &str) -> String {
        let doc = ReportParser::new().parse(text);
        to_html(&doc, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
        assert_eq!(escape_html("보고서"), "보고서");
    }

    #[test]
    fn test_approval_blank_cells_are_nbsp() {
        let html = render("| 담당 | 팀장 |\n|---|---|\n|  |  |");
        assert!(html.contains("class=\"report-table approval\""));
        assert!(html.contains("align=\"right\""));
        assert_eq!(html.matches(">&nbsp;</td>").count(), 2);
        assert!(!html.contains("></td>"));
        assert!(html.contains("height:20mm"));
    }

    #[test]
    fn test_metadata_labels() {
        let html = render("| a |\n|---|\n|  |\n| 팀명 | 기획팀 |\n| 일시 | 2024. 01. 01. |");
        assert!(html.contains("class=\"report-table metadata\""));
        assert_eq!(html.matches("<th scope=\"row\"").count(), 2);
        assert!(html.contains(">기획팀</td>"));
    }

    #[test]
    fn test_cell_line_breaks_and_literal_markup() {
        let doc = Document::from_blocks(vec![Block::Table({
            let mut t = Table::new(TableKind::Generic)
                .with_header(TableRow::from_strings(["항목", "비고"]));
            t.add_row(TableRow::from_strings(["**굵게**", "첫줄<br>둘째줄"]));
            t
        })]);
        let html = to_html(&doc, &RenderOptions::default()).unwrap();
        assert!(html.contains(">**굵게**</td>"));
        assert!(html.contains(">첫줄<br>둘째줄</td>"));
        assert!(!html.contains("&lt;br&gt;"));
    }

    #[test]
    fn test_outline_indentation() {
        let html = render("1. 개요\n가. 세부 내용 설명\n1) 배경\n가) 상세");
        assert!(html.contains("class=\"outline level-0\" style=\"margin:0 0 0.3em 0em;font-weight:bold\""));
        assert!(html.contains("class=\"outline level-1\" style=\"margin:0 0 0.3em 2em\">가. 세부 내용 설명</p>"));
        assert!(html.contains("class=\"outline level-3\" style=\"margin:0 0 0.3em 6em\""));
    }

    #[test]
    fn test_title_marker_letter_spaced() {
        let html = render("보 고 서");
        assert!(html.contains("letter-spacing:0.5em"));
        assert!(html.contains(">보 고 서</h1>"));
    }

    #[test]
    fn test_section_heading_left_aligned() {
        let html = render("## 추진 배경");
        assert!(html.starts_with("<h2 class=\"report-heading\""));
        assert!(html.contains("border-bottom:1px solid"));
        assert!(html.contains(">추진 배경</h2>"));
        assert!(!html.contains("text-align:center"));
    }

    #[test]
    fn test_spacer_and_text_escaped() {
        let html = render("a < b\n\n끝");
        assert!(html.contains(">a &lt; b</p>"));
        assert!(html.contains("class=\"spacer\""));
    }
}
