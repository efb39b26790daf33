//! Export module with a registry of output formats.
//!
//! Every exporter consumes a [`RenderedReport`] snapshot. Exporters never
//! see the source text and never modify the document, so exporting the
//! same snapshot twice yields identical bytes.
//!
//! # Example
//!
//! ```no_run
//! use kreport::export::{ExportOptions, ExporterRegistry};
//! use kreport::render::{RenderOptions, RenderedReport};
//! use kreport::ReportParser;
//!
//! fn main() -> kreport::Result<()> {
//!     let report = RenderedReport::render("보 고 서", &ReportParser::new(), &RenderOptions::default())?;
//!     let registry = ExporterRegistry::with_defaults();
//!     let artifact = registry.export("word", &report, &ExportOptions::default())?;
//!     artifact.write_to(".")?;
//!     Ok(())
//! }
//! ```

pub mod layout;
pub mod pdf;
mod print;
pub mod spool;
mod word;

pub use pdf::{PdfOptions, PdfWriter};
pub use print::{print_document, PrintExporter, PRINT_TITLE};
pub use spool::{PrintSpooler, SpoolOutcome};
pub use word::{word_document, WordExporter};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::render::{screen_page, to_json, to_text, JsonFormat, RenderOptions, RenderedReport, Theme};

/// How the print action produces its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrintStrategy {
    /// Standalone HTML with an A4 print stylesheet
    #[default]
    Stylesheet,
    /// Paginated PDF
    Pdf,
}

/// Export format identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Word-compatible HTML document
    Word,
    /// Print document (HTML or PDF per strategy)
    Print,
    /// Paginated PDF
    Pdf,
    /// Standalone screen page
    Html,
    /// Plain text
    Text,
    /// JSON document structure
    Json,
}

impl ExportFormat {
    /// All formats.
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Word,
        ExportFormat::Print,
        ExportFormat::Pdf,
        ExportFormat::Html,
        ExportFormat::Text,
        ExportFormat::Json,
    ];

    /// Registry name of the format.
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Word => "word",
            ExportFormat::Print => "print",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
        }
    }

    /// Whether the format is a document or print artifact that always
    /// renders light, whatever theme the screen shows.
    pub fn forces_light(self) -> bool {
        matches!(self, ExportFormat::Word | ExportFormat::Print | ExportFormat::Pdf)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let lower = match lower.as_str() {
            "doc" | "docx" => "word",
            "txt" => "text",
            other => other,
        };
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| Error::Export(format!("Unknown export format: {}", s)))
    }
}

/// Options for exporting.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Word download filename
    pub word_filename: String,

    /// Word MIME type
    pub word_mime_type: String,

    /// PDF download filename
    pub pdf_filename: String,

    /// Print document filename
    pub print_filename: String,

    /// Print strategy
    pub print_strategy: PrintStrategy,

    /// PDF writer options
    pub pdf: PdfOptions,

    /// JSON output format
    pub json_format: JsonFormat,

    /// Render options for text output
    pub render: RenderOptions,

    /// Theme of the standalone screen page
    pub theme: Theme,

    /// Title used when the report has none
    pub document_title: String,
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Word filename and MIME type.
    pub fn with_word_target(mut self, filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.word_filename = filename.into();
        self.word_mime_type = mime_type.into();
        self
    }

    /// Set the print strategy.
    pub fn with_print_strategy(mut self, strategy: PrintStrategy) -> Self {
        self.print_strategy = strategy;
        self
    }

    /// Set PDF writer options.
    pub fn with_pdf_options(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the screen page theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            word_filename: "ai-report.doc".to_string(),
            word_mime_type: "application/msword".to_string(),
            pdf_filename: "ai-report.pdf".to_string(),
            print_filename: "ai-report.html".to_string(),
            print_strategy: PrintStrategy::default(),
            pdf: PdfOptions::default(),
            json_format: JsonFormat::default(),
            render: RenderOptions::default(),
            theme: Theme::default(),
            document_title: "Report".to_string(),
        }
    }
}

/// A produced export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested filename
    pub filename: String,

    /// MIME type of the content
    pub mime_type: String,

    /// File content
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Create a new artifact.
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Content size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the artifact has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension of the suggested filename.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename).extension().and_then(|e| e.to_str())
    }

    /// Write the artifact into `dir` under its filename.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Trait for export formats.
///
/// Implement this trait to add a new output format.
pub trait Exporter: Send + Sync {
    /// Format produced by this exporter.
    fn format(&self) -> ExportFormat;

    /// Registry name of this exporter.
    fn name(&self) -> &str {
        self.format().name()
    }

    /// Produce the artifact for a rendered report.
    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact>;
}

/// Paginated PDF exporter.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        let bytes = PdfWriter::new(options.pdf.clone()).write(report.document())?;
        Ok(ExportArtifact::new(
            options.pdf_filename.clone(),
            "application/pdf",
            bytes,
        ))
    }
}

/// Standalone screen page exporter.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter;

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        let page = screen_page(report, options.theme);
        Ok(ExportArtifact::new("report.html", "text/html", page.into_bytes()))
    }
}

/// Plain text exporter.
#[derive(Debug, Clone, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        let text = to_text(report.document(), &options.render)?;
        Ok(ExportArtifact::new("report.txt", "text/plain", text.into_bytes()))
    }
}

/// JSON structure exporter.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(&self, report: &RenderedReport, options: &ExportOptions) -> Result<ExportArtifact> {
        let json = to_json(report.document(), options.json_format)?;
        Ok(ExportArtifact::new("report.json", "application/json", json.into_bytes()))
    }
}

/// Registry of exporters keyed by format name.
pub struct ExporterRegistry {
    exporters: HashMap<String, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            exporters: HashMap::new(),
        }
    }

    /// Create a registry with every built-in exporter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WordExporter::new()));
        registry.register(Arc::new(PrintExporter::new()));
        registry.register(Arc::new(PdfExporter));
        registry.register(Arc::new(HtmlExporter));
        registry.register(Arc::new(TextExporter));
        registry.register(Arc::new(JsonExporter));
        registry
    }

    /// Register an exporter under its name, replacing any previous one.
    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        self.exporters.insert(exporter.name().to_lowercase(), exporter);
    }

    /// Get an exporter by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Exporter>> {
        let key = name
            .parse::<ExportFormat>()
            .map(|f| f.name().to_string())
            .unwrap_or_else(|_| name.to_lowercase());
        self.exporters.get(&key).cloned()
    }

    /// Check if a format is registered.
    pub fn supports(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exporters.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Export a report in the named format.
    pub fn export(
        &self,
        name: &str,
        report: &RenderedReport,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let exporter = self
            .get(name)
            .ok_or_else(|| Error::Export(format!("No exporter for format: {}", name)))?;
        let artifact = exporter.export(report, options)?;
        log::info!(
            "Exported {} ({}, {} bytes)",
            artifact.filename,
            artifact.mime_type,
            artifact.len()
        );
        Ok(artifact)
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
