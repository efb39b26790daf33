//! Print export.
//!
//! Either a standalone HTML document carrying only the report and an A4
//! print stylesheet, or the paginated PDF, depending on the configured
//! strategy. Both paths render light regardless of the screen theme.

use super::pdf::PdfWriter;
use super::{ExportArtifact, ExportFormat, ExportOptions, Exporter, PrintStrategy};
use crate::error::Result;
use crate::render::page::FONT_STACK;
use crate::render::{escape_html, RenderedReport};

/// Title of the print document window.
pub const PRINT_TITLE: &str = "AI 분석 보고서";

fn print_stylesheet() -> String {
    format!(
        "body{{font-family:{};font-size:11pt;line-height:1.6;color:#000;background:#fff;margin:0}}\
         @page{{size:A4;margin:2cm}}\
         table{{page-break-inside:auto}}\
         tr{{page-break-inside:avoid}}\
         h1{{page-break-after:avoid}}",
        FONT_STACK
    )
}

/// Standalone print document around a rendered fragment.
pub fn print_document(fragment: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n\
         <div id=\"report-content\" class=\"report light\">\n{}</div>\n</body>\n</html>\n",
        escape_html(title),
        print_stylesheet(),
        fragment
    )
}

/// Exports the report for printing.
#[derive(Debug, Clone, Default)]
pub struct PrintExporter;

impl PrintExporter {
    /// Create a new print exporter.
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PrintExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Print
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        match options.print_strategy {
            PrintStrategy::Stylesheet => {
                let html = print_document(report.fragment(), PRINT_TITLE);
                Ok(ExportArtifact::new(
                    options.print_filename.clone(),
                    "text/html",
                    html.into_bytes(),
                ))
            }
            PrintStrategy::Pdf => {
                let bytes = PdfWriter::new(options.pdf.clone()).write(report.document())?;
                Ok(ExportArtifact::new(
                    options.pdf_filename.clone(),
                    "application/pdf",
                    bytes,
                ))
            }
        }
    }
}
