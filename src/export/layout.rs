//! Page layout for paginated output.
//!
//! Lays a document out on fixed-size pages as a flat list of drawing
//! operations per page. Coordinates are PDF points with the origin at the
//! bottom-left corner. Nothing here knows about the PDF file format.

use crate::model::{Block, Document, OutlineLevel, Table, TableCell, TableKind, TableRow};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Gray level used to shade metadata label cells.
const LABEL_SHADE: f32 = 0.94;

/// Inner padding of table cells, in points.
const CELL_PADDING: f32 = 4.0;

/// Page size, margins and type sizes.
#[derive(Debug, Clone)]
pub struct PageSetup {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Margin on every side in points
    pub margin: f32,
    /// Body font size in points
    pub body_size: f32,
    /// Title font size in points
    pub title_size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Outline indentation per level, in multiples of the body size
    pub indent_step: f32,
    /// Approval signature cell width in millimetres
    pub signature_width_mm: f32,
    /// Approval signature cell height in millimetres
    pub signature_height_mm: f32,
    /// Metadata label column width as a fraction of the content width
    pub label_fraction: f32,
}

impl PageSetup {
    /// A4 portrait with 2 cm margins.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 20.0 * PT_PER_MM,
            body_size: 11.0,
            title_size: 20.0,
            line_height: 1.6,
            indent_step: 2.0,
            signature_width_mm: 24.0,
            signature_height_mm: 20.0,
            label_fraction: 0.25,
        }
    }

    /// Width available between the margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn line(&self, size: f32) -> f32 {
        size * self.line_height
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text with its baseline starting at (x, y).
    Text {
        /// Left edge of the run
        x: f32,
        /// Baseline
        y: f32,
        /// Font size in points
        size: f32,
        /// Extra space between characters in points
        char_spacing: f32,
        /// Simulated bold
        bold: bool,
        /// Text content
        text: String,
    },
    /// A rectangle with its lower-left corner at (x, y).
    Rect {
        /// Left edge
        x: f32,
        /// Bottom edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Gray fill level, if filled
        fill: Option<f32>,
    },
}

/// A laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPage {
    /// Drawing operations in paint order
    pub ops: Vec<DrawOp>,
}

/// Approximate advance width of a character in em.
///
/// Printable ASCII is half width in the Korean CID fonts; everything else
/// is full width.
pub fn char_width(c: char) -> f32 {
    if (' '..='~').contains(&c) {
        0.5
    } else {
        1.0
    }
}

/// Width of a string in points at the given size.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size
}

/// Greedy word wrap. Words longer than a line are broken between characters.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;
    let space = char_width(' ') * size;

    for word in text.split_whitespace() {
        let width = text_width(word, size);
        let needed = if current.is_empty() { width } else { current_width + space + width };

        if needed <= max_width {
            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(word);
            current_width += width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if width <= max_width {
            current.push_str(word);
            current_width = width;
        } else {
            for c in word.chars() {
                let w = char_width(c) * size;
                if current_width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay a document out on pages.
pub fn layout_document(doc: &Document, setup: &PageSetup) -> Vec<LayoutPage> {
    let mut engine = LayoutEngine::new(setup.clone());
    for block in doc.blocks() {
        engine.block(block);
    }
    let pages = engine.finish();
    log::debug!("Laid out {} block(s) on {} page(s)", doc.len(), pages.len());
    pages
}

struct LayoutEngine {
    setup: PageSetup,
    pages: Vec<LayoutPage>,
    current: LayoutPage,
    /// Top of the next free line.
    cursor: f32,
}

impl LayoutEngine {
    fn new(setup: PageSetup) -> Self {
        let cursor = setup.height - setup.margin;
        Self {
            setup,
            pages: Vec::new(),
            current: LayoutPage::default(),
            cursor,
        }
    }

    fn finish(mut self) -> Vec<LayoutPage> {
        self.pages.push(self.current);
        self.pages
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.cursor = self.setup.height - self.setup.margin;
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.setup.height - self.setup.margin
    }

    /// Break the page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.cursor - height < self.setup.margin && !self.at_page_top() {
            self.new_page();
        }
    }

    fn baseline(&self, top: f32, size: f32) -> f32 {
        top - (self.setup.line(size) + size * 0.7) / 2.0
    }

    fn text_line(&mut self, x: f32, size: f32, bold: bool, char_spacing: f32, text: String) {
        let line = self.setup.line(size);
        self.reserve(line);
        let y = self.baseline(self.cursor, size);
        self.current.ops.push(DrawOp::Text {
            x,
            y,
            size,
            char_spacing,
            bold,
            text,
        });
        self.cursor -= line;
    }

    fn paragraph(&mut self, indent: f32, size: f32, bold: bool, text: &str) {
        let x = self.setup.margin + indent;
        let width = self.setup.content_width() - indent;
        for line in wrap_text(text, width, size) {
            self.text_line(x, size, bold, 0.0, line);
        }
    }

    fn centered(&mut self, size: f32, bold: bool, char_spacing: f32, text: &str) {
        let width = self.setup.content_width();
        for line in wrap_text(text, width, size) {
            let count = line.chars().count() as f32;
            let w = text_width(&line, size) + char_spacing * (count - 1.0).max(0.0);
            let x = self.setup.margin + ((width - w) / 2.0).max(0.0);
            self.text_line(x, size, bold, char_spacing, line);
        }
    }

    /// Left-aligned bold heading with a rule underneath.
    fn heading(&mut self, text: &str) {
        let body = self.setup.body_size;
        let size = (body * 1.3).round();
        self.cursor -= body * 0.5;
        self.paragraph(0.0, size, true, text);
        self.current.ops.push(DrawOp::Rect {
            x: self.setup.margin,
            y: self.cursor - 1.0,
            width: self.setup.content_width(),
            height: 0.5,
            fill: Some(0.8),
        });
        self.cursor -= body * 0.4;
    }

    fn block(&mut self, block: &Block) {
        let body = self.setup.body_size;
        match block {
            Block::Title { text, marker: true } => {
                let size = self.setup.title_size;
                self.centered(size, true, size * 0.5, text);
                self.cursor -= body * 0.5;
            }
            Block::Title { text, marker: false } => {
                let size = (self.setup.title_size * 0.9).max(body);
                self.centered(size, true, 0.0, text);
                self.cursor -= body * 0.5;
            }
            Block::Heading { text } => self.heading(text),
            Block::OutlineLine {
                level,
                marker,
                text,
            } => {
                let indent = f32::from(level.depth()) * self.setup.indent_step * body;
                let bold = *level == OutlineLevel::Decimal;
                self.paragraph(indent, body, bold, &format!("{} {}", marker, text));
            }
            Block::Table(table) => self.table(table),
            Block::Spacer => {
                let line = self.setup.line(body);
                if self.cursor - line < self.setup.margin {
                    self.new_page();
                } else {
                    self.cursor -= line;
                }
            }
            Block::PlainText { text } => self.paragraph(0.0, body, false, text),
            Block::ListItem { text } => self.paragraph(body, body, false, &format!("- {}", text)),
        }
    }

    fn table(&mut self, table: &Table) {
        if table.is_empty() {
            return;
        }
        let columns = table.column_count();
        let body = self.setup.body_size;
        let content = self.setup.content_width();

        let (left, widths) = match table.kind {
            TableKind::Approval => {
                let cell = self.setup.signature_width_mm * PT_PER_MM;
                let total = (cell * columns as f32).min(content);
                let cell = total / columns as f32;
                (self.setup.margin + content - total, vec![cell; columns])
            }
            TableKind::Metadata if columns > 1 => {
                let label = content * self.setup.label_fraction;
                let rest = (content - label) / (columns - 1) as f32;
                let mut widths = vec![label];
                widths.extend(std::iter::repeat(rest).take(columns - 1));
                (self.setup.margin, widths)
            }
            _ => (self.setup.margin, vec![content / columns as f32; columns]),
        };

        self.cursor -= body * 0.5;

        if let Some(header) = &table.header {
            let shade = match table.kind {
                TableKind::Metadata => RowStyle::Label,
                TableKind::Approval => RowStyle::CenteredPlain,
                TableKind::Generic => RowStyle::Bold,
            };
            self.row(header, left, &widths, shade, 0.0);
        }

        let min_height = match table.kind {
            TableKind::Approval => self.setup.signature_height_mm * PT_PER_MM,
            _ => 0.0,
        };
        let style = match table.kind {
            TableKind::Approval => RowStyle::CenteredPlain,
            TableKind::Metadata => RowStyle::KeyValue,
            TableKind::Generic => RowStyle::Plain,
        };
        for row in &table.rows {
            self.row(row, left, &widths, style, min_height);
        }

        self.cursor -= body * 0.5;
    }

    fn row(&mut self, row: &TableRow, left: f32, widths: &[f32], style: RowStyle, min_height: f32) {
        let size = self.setup.body_size;
        let line = self.setup.line(size);

        let wrapped: Vec<Vec<String>> = row
            .cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| cell_lines(cell, width - 2.0 * CELL_PADDING, size))
            .collect();
        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = (max_lines as f32 * line + 2.0 * CELL_PADDING).max(min_height);

        let usable = self.setup.height - 2.0 * self.setup.margin;
        if height <= usable {
            // Rows that fit on a page never split.
            self.reserve(height);
            self.draw_row(&wrapped, left, widths, style, height);
            return;
        }

        // A row taller than a page continues its lines on the next pages.
        let capacity = (((usable - 2.0 * CELL_PADDING) / line).floor() as usize).max(1);
        let mut start = 0;
        while start < max_lines {
            let end = (start + capacity).min(max_lines);
            let slice: Vec<Vec<String>> = wrapped
                .iter()
                .map(|lines| lines.get(start..end.min(lines.len())).unwrap_or(&[]).to_vec())
                .collect();
            let slice_height = (end - start) as f32 * line + 2.0 * CELL_PADDING;
            self.reserve(slice_height);
            self.draw_row(&slice, left, widths, style, slice_height);
            start = end;
        }
    }

    /// Draw one row of pre-wrapped cells with its top at the cursor.
    fn draw_row(
        &mut self,
        wrapped: &[Vec<String>],
        left: f32,
        widths: &[f32],
        style: RowStyle,
        height: f32,
    ) {
        let size = self.setup.body_size;
        let line = self.setup.line(size);
        let top = self.cursor;
        let bottom = top - height;

        let mut x = left;
        for (col, (lines, width)) in wrapped.iter().zip(widths).enumerate() {
            let label = style.is_label(col);
            self.current.ops.push(DrawOp::Rect {
                x,
                y: bottom,
                width: *width,
                height,
                fill: label.then_some(LABEL_SHADE),
            });

            let text_height = lines.len() as f32 * line;
            let mut line_top = if style.centered() {
                top - (height - text_height) / 2.0
            } else {
                top - CELL_PADDING
            };
            for text in lines {
                if text.is_empty() {
                    line_top -= line;
                    continue;
                }
                let tx = if style.centered() {
                    x + ((width - text_width(text, size)) / 2.0).max(CELL_PADDING)
                } else {
                    x + CELL_PADDING
                };
                let y = self.baseline(line_top, size);
                self.current.ops.push(DrawOp::Text {
                    x: tx,
                    y,
                    size,
                    char_spacing: 0.0,
                    bold: label || style == RowStyle::Bold,
                    text: text.clone(),
                });
                line_top -= line;
            }
            x += width;
        }

        self.cursor = bottom;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStyle {
    Plain,
    Bold,
    CenteredPlain,
    Label,
    KeyValue,
}

impl RowStyle {
    fn centered(self) -> bool {
        self == RowStyle::CenteredPlain
    }

    fn is_label(self, col: usize) -> bool {
        match self {
            RowStyle::Label => true,
            RowStyle::KeyValue => col == 0,
            _ => false,
        }
    }
}

/// Visual lines of a cell after wrapping; a blank cell keeps one empty line.
fn cell_lines(cell: &TableCell, width: f32, size: f32) -> Vec<String> {
    if cell.is_blank() {
        return vec![String::new()];
    }
    cell.lines()
        .iter()
        .flat_map(|line| wrap_text(line.trim(), width.max(size), size))
        .collect()
}
