//! PDF writing with lopdf.
//!
//! Text is set in a predefined Korean CID font so no font program has to be
//! embedded; viewers substitute a local Gothic face. Strings are written as
//! UCS-2 big-endian hex strings to match the `UniKS-UCS2-H` CMap.

use std::io::Write;

use chrono::{DateTime, Local};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};

use super::layout::{layout_document, DrawOp, LayoutPage, PageSetup};
use crate::error::Result;
use crate::model::Document;

/// Predefined Adobe-Korea1 Gothic font.
pub const KOREAN_FONT: &str = "HYGoThic-Medium";

/// Horizontal Unicode CMap for Adobe-Korea1.
pub const KOREAN_ENCODING: &str = "UniKS-UCS2-H";

const FONT_RESOURCE: &str = "F1";

/// Options for PDF output.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Page geometry and type sizes
    pub page: PageSetup,

    /// Document title written to the info dictionary
    pub title: Option<String>,

    /// Author written to the info dictionary
    pub author: Option<String>,

    /// Creation time; `None` uses the current time
    pub created: Option<DateTime<Local>>,

    /// Compress page content streams
    pub compress: bool,
}

impl PdfOptions {
    /// Create PDF options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page setup.
    pub fn with_page(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Fix the creation time.
    pub fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = Some(created);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page: PageSetup::a4(),
            title: None,
            author: None,
            created: None,
            compress: true,
        }
    }
}

/// Writes report documents as paginated PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: PdfOptions,
}

impl PdfWriter {
    /// Create a writer with the given options.
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }

    /// Lay out and serialize a document.
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        let pages = layout_document(doc, &self.options.page);
        self.write_pages(&pages, doc)
    }

    fn write_pages(&self, pages: &[LayoutPage], doc: &Document) -> Result<Vec<u8>> {
        let setup = &self.options.page;
        let mut pdf = PdfDocument::with_version("1.5");

        let pages_id = pdf.new_object_id();
        let font_id = add_korean_font(&mut pdf);
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_RESOURCE => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = self.encode_page(page)?;
            let content_id = pdf.add_object(content);
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), setup.width.into(), setup.height.into()],
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let info_id = self.add_info(&mut pdf, doc);
        pdf.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)?;
        log::debug!("Wrote PDF: {} page(s), {} bytes", pages.len(), bytes.len());
        Ok(bytes)
    }

    fn encode_page(&self, page: &LayoutPage) -> Result<Stream> {
        let mut operations = Vec::new();
        for op in &page.ops {
            match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    operations.push(Operation::new("q", vec![]));
                    operations.push(Operation::new("w", vec![0.75f32.into()]));
                    operations.push(Operation::new("G", vec![0.into()]));
                    operations.push(Operation::new(
                        "re",
                        vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                    ));
                    match fill {
                        Some(gray) => {
                            operations.push(Operation::new("g", vec![(*gray).into()]));
                            operations.push(Operation::new("B", vec![]));
                        }
                        None => operations.push(Operation::new("S", vec![])),
                    }
                    operations.push(Operation::new("Q", vec![]));
                }
                DrawOp::Text {
                    x,
                    y,
                    size,
                    char_spacing,
                    bold,
                    text,
                } => {
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new(
                        "Tf",
                        vec![FONT_RESOURCE.into(), (*size).into()],
                    ));
                    operations.push(Operation::new("g", vec![0.into()]));
                    if *bold {
                        // Fill and stroke thickens the glyphs.
                        operations.push(Operation::new("Tr", vec![2.into()]));
                        operations.push(Operation::new("w", vec![(*size * 0.03).into()]));
                    } else {
                        operations.push(Operation::new("Tr", vec![0.into()]));
                    }
                    operations.push(Operation::new("Tc", vec![(*char_spacing).into()]));
                    operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_ucs2(text), StringFormat::Hexadecimal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
            }
        }

        let content = Content { operations }.encode()?;
        if self.options.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&content)?;
            let compressed = encoder.finish()?;
            Ok(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                compressed,
            ))
        } else {
            Ok(Stream::new(dictionary! {}, content))
        }
    }

    fn add_info(&self, pdf: &mut PdfDocument, doc: &Document) -> ObjectId {
        let created = self.options.created.unwrap_or_else(Local::now);
        let stamp = created.format("D:%Y%m%d%H%M%S").to_string();

        let mut info = dictionary! {
            "Producer" => Object::string_literal(format!("kreport {}", crate::VERSION)),
            "CreationDate" => Object::string_literal(stamp),
        };
        if let Some(title) = self.options.title.as_deref().or_else(|| doc.title()) {
            info.set("Title", text_string(title));
        }
        let author = self.options.author.clone().or_else(|| doc.info().author);
        if let Some(author) = author {
            info.set("Author", text_string(&author));
        }
        pdf.add_object(info)
    }
}

/// Register the Type0 font and its descendant CID font.
fn add_korean_font(pdf: &mut PdfDocument) -> ObjectId {
    let descriptor_id = pdf.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => KOREAN_FONT,
        "Flags" => 6,
        "FontBBox" => vec![(-6).into(), (-145).into(), 1003.into(), 880.into()],
        "ItalicAngle" => 0,
        "Ascent" => 880,
        "Descent" => -120,
        "CapHeight" => 880,
        "StemV" => 93,
    });

    let cid_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => KOREAN_FONT,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Korea1"),
            "Supplement" => 1,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        // CIDs 1-95 are the half-width ASCII glyphs.
        "W" => vec![1.into(), 95.into(), 500.into()],
    });

    pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => KOREAN_FONT,
        "Encoding" => KOREAN_ENCODING,
        "DescendantFonts" => vec![cid_font_id.into()],
    })
}

/// UCS-2 big-endian bytes; characters outside the BMP become `?`.
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let code = u16::try_from(u32::from(c)).unwrap_or(u16::from(b'?'));
        bytes.extend_from_slice(&code.to_be_bytes());
    }
    bytes
}

/// PDF text string in UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ReportParser;
    use chrono::TimeZone;

    const REPORT: &str = "| 담당 | 팀장 |\n|---|---|\n|  |  |\n| 팀명 | 기획팀 |\n| 작성자 | 홍길동 |\n\n**주간 업무 보고**\n\n1. 개요\n가. 세부 내용 설명";

    fn fixed_options() -> PdfOptions {
        let created = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        PdfOptions::new().with_created(created)
    }

    #[test]
    fn test_encode_ucs2() {
        assert_eq!(encode_ucs2("A가"), vec![0x00, 0x41, 0xAC, 0x00]);
        assert_eq!(encode_ucs2("😀"), vec![0x00, b'?']);
    }

    #[test]
    fn test_write_pdf_structure() {
        let doc = ReportParser::new().parse(REPORT);
        let bytes = PdfWriter::new(fixed_options()).write(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("HYGoThic-Medium"));
        assert!(text.contains("UniKS-UCS2-H"));
        assert!(text.contains("FlateDecode"));
    }

    #[test]
    fn test_uncompressed_content_has_hex_text() {
        let doc = ReportParser::new().parse("가. 세부");
        let bytes = PdfWriter::new(fixed_options().with_compression(false))
            .write(&doc)
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        // "가" is U+AC00
        assert!(text.to_ascii_uppercase().contains("<AC00"));
        assert!(!text.contains("FlateDecode"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let doc = ReportParser::new().parse(REPORT);
        let writer = PdfWriter::new(fixed_options());
        assert_eq!(writer.write(&doc).unwrap(), writer.write(&doc).unwrap());
    }

    #[test]
    fn test_long_report_paginates() {
        let text = (0..200).map(|i| format!("{}. 항목", i + 1)).collect::<Vec<_>>().join("\n");
        let doc = ReportParser::new().parse(&text);
        let bytes = PdfWriter::new(fixed_options()).write(&doc).unwrap();
        let loaded = PdfDocument::load_mem(&bytes).unwrap();
        assert!(loaded.get_pages().len() > 1);
    }
}
