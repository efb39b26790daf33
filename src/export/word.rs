//! Word-compatible export.
//!
//! Word opens HTML carrying the Office namespaces as a native document, so
//! the export is the rendered fragment wrapped in that envelope and nothing
//! else.

use super::{ExportArtifact, ExportFormat, ExportOptions, Exporter};
use crate::error::Result;
use crate::render::{escape_html, RenderedReport};

const ENVELOPE_OPEN: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns='http://www.w3.org/TR/REC-html40'>";

/// Wrap an HTML fragment in the Office HTML envelope.
pub fn word_document(fragment: &str, title: &str) -> String {
    format!(
        "{}<head><meta charset='utf-8'><title>{}</title></head><body>{}</body></html>",
        ENVELOPE_OPEN,
        escape_html(title),
        fragment
    )
}

/// Exports the rendered report as a Word document.
#[derive(Debug, Clone, Default)]
pub struct WordExporter;

impl WordExporter {
    /// Create a new Word exporter.
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for WordExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Word
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        let title = report.document().title().unwrap_or(&options.document_title);
        let html = word_document(report.fragment(), title);
        Ok(ExportArtifact::new(
            options.word_filename.clone(),
            options.word_mime_type.clone(),
            html.into_bytes(),
        ))
    }
}
