//! # kreport
//!
//! Korean official report rendering and export library for Rust.
//!
//! This library turns the constrained markdown produced by a text generation
//! service into a structured report document (approval signature table,
//! report information table, legal-style outline levels, data tables) and
//! exports it as Word-compatible HTML, a print document or a paginated PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kreport::export::{ExportOptions, ExporterRegistry};
//! use kreport::render_report;
//!
//! fn main() -> kreport::Result<()> {
//!     let markdown = std::fs::read_to_string("report.md")?;
//!
//!     // Parse and render once
//!     let report = render_report(&markdown)?;
//!     println!("{}", report.fragment());
//!
//!     // Every export reads the same snapshot
//!     let registry = ExporterRegistry::with_defaults();
//!     let pdf = registry.export("pdf", &report, &ExportOptions::default())?;
//!     pdf.write_to(".")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Positional tables**: approval, report information and generic tables
//! - **Outline levels**: `1.`, `가.`, `1)`, `가)` numbering with indentation
//! - **Exports**: Word HTML, A4 print document, PDF with a Korean CID font
//! - **Workflow**: form validation, request gate, refinement and theme state
//! - **Collaborator contract**: pluggable text extraction and generation

pub mod collab;
pub mod date;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use collab::{
    ExtractRequest, GenerateRequest, ReportGenerator, SourceFile, TextExtractor,
};
pub use detect::{detect_media_type, detect_media_type_from_bytes, detect_media_type_from_path, MediaType};
pub use error::{Error, ErrorCategory, Result};
pub use export::{
    ExportArtifact, ExportFormat, ExportOptions, Exporter, ExporterRegistry, PrintStrategy,
};
pub use model::{Block, Document, OutlineLevel, ReportInfo, Table, TableCell, TableKind, TableRow};
pub use parser::{ParseOptions, ReportParser};
pub use render::{JsonFormat, RenderOptions, RenderStats, RenderedReport, Theme};
pub use session::{ReportForm, Step, ThemeStore, Workflow};

use std::path::Path;

/// Library version, also written into PDF metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse report markdown into a document.
///
/// Parsing never fails; malformed tables degrade to plain text.
///
/// # Example
///
/// ```
/// use kreport::{parse_report, TableKind};
///
/// let doc = parse_report("| 담당 | 팀장 |\n|---|---|\n|  |  |\n\n1. 개요");
/// assert!(doc.table_of_kind(TableKind::Approval).is_some());
/// ```
pub fn parse_report(text: &str) -> Document {
    ReportParser::new().parse(text)
}

/// Parse and render report markdown with default options.
///
/// # Example
///
/// ```
/// use kreport::render_report;
///
/// let report = render_report("보 고 서\n1. 개요").unwrap();
/// assert!(report.fragment().contains("개요"));
/// ```
pub fn render_report(text: &str) -> Result<RenderedReport> {
    RenderedReport::render(text, &ReportParser::new(), &RenderOptions::default())
}

/// Read and parse a markdown file.
///
/// # Example
///
/// ```no_run
/// use kreport::parse_file;
///
/// let doc = parse_file("report.md").unwrap();
/// println!("Blocks: {}", doc.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_report(&text))
}

/// Read and parse a markdown file without blocking the runtime.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_report(&text))
}

/// Builder for parsing and rendering reports.
///
/// # Example
///
/// ```
/// use kreport::Kreport;
///
/// let text = Kreport::new()
///     .with_title_markers(["보 고 서"])
///     .collapse_spacers()
///     .render("보 고 서\n\n1. 개요")?
///     .to_text()?;
/// assert_eq!(text, "보 고 서\n1. 개요");
/// # Ok::<(), kreport::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Kreport {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Kreport {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title marker phrases.
    pub fn with_title_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.parse_options = self.parse_options.with_title_markers(markers);
        self
    }

    /// Only recognise outline patterns (no markdown titles or list items).
    pub fn strict_outline(mut self) -> Self {
        self.parse_options = self.parse_options.strict_outline();
        self
    }

    /// Disable NFC normalization of the input.
    pub fn without_normalization(mut self) -> Self {
        self.parse_options = self.parse_options.with_normalization(false);
        self
    }

    /// Set the indentation per outline level, in em.
    pub fn with_indent_step(mut self, em: f32) -> Self {
        self.render_options = self.render_options.with_indent_step(em);
        self
    }

    /// Drop blank lines from plain text output.
    pub fn collapse_spacers(mut self) -> Self {
        self.render_options = self.render_options.with_collapsed_spacers(true);
        self
    }

    /// Parser configured by this builder.
    pub fn parser(&self) -> ReportParser {
        ReportParser::with_options(self.parse_options.clone())
    }

    /// Workflow configured by this builder.
    pub fn workflow(&self) -> Workflow {
        Workflow::with_parts(self.parser(), self.render_options.clone())
    }

    /// Parse and render report markdown.
    pub fn render(self, text: &str) -> Result<KreportResult> {
        let report = RenderedReport::render(text, &self.parser(), &self.render_options)?;
        Ok(KreportResult {
            report,
            render_options: self.render_options,
        })
    }
}

/// Result of rendering a report through [`Kreport`].
#[derive(Debug, Clone)]
pub struct KreportResult {
    /// The rendered snapshot
    pub report: RenderedReport,
    render_options: RenderOptions,
}

impl KreportResult {
    /// HTML fragment.
    pub fn to_html(&self) -> String {
        self.report.fragment().to_string()
    }

    /// Plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(self.report.document(), &self.render_options)
    }

    /// JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(self.report.document(), format)
    }

    /// The parsed document.
    pub fn document(&self) -> &Document {
        self.report.document()
    }
}
