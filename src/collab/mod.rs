//! Contracts for the external text extraction and generation services.
//!
//! The library never talks to a network service itself. Callers plug in
//! implementations of [`TextExtractor`] and [`ReportGenerator`]; the CLI
//! ships a Gemini client, tests use closures.

pub mod prompt;

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::detect::{detect_media_type, MediaType};
use crate::error::{Error, Result};

/// Turns an uploaded file into plain text.
pub trait TextExtractor {
    /// Transcribe the file content.
    fn extract(&self, request: &ExtractRequest) -> Result<String>;
}

/// Produces report markdown from source text and report information.
pub trait ReportGenerator {
    /// Generate (or regenerate) a report.
    fn generate(&self, request: &GenerateRequest) -> Result<String>;
}

impl<F> TextExtractor for F
where
    F: Fn(&ExtractRequest) -> Result<String>,
{
    fn extract(&self, request: &ExtractRequest) -> Result<String> {
        self(request)
    }
}

impl<F> ReportGenerator for F
where
    F: Fn(&GenerateRequest) -> Result<String>,
{
    fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self(request)
    }
}

/// An uploaded source file, owned once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Original file name
    pub name: String,
    /// Detected media type
    pub media_type: MediaType,
    /// File content
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Wrap bytes, detecting the media type from content or file name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let extension = Path::new(&name).extension().and_then(|e| e.to_str());
        let media_type = detect_media_type(&bytes, extension)?;
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// Read a file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, bytes)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Build the extraction request for this file.
    pub fn to_request(&self) -> ExtractRequest {
        ExtractRequest::new(self.media_type, &self.bytes)
    }
}

/// Request to transcribe a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Media type of the payload
    pub media_type: MediaType,
    /// Base64-encoded file content
    pub data: String,
    /// Instruction for the extraction service
    pub prompt: String,
}

impl ExtractRequest {
    /// Encode raw bytes.
    pub fn new(media_type: MediaType, bytes: &[u8]) -> Self {
        Self {
            media_type,
            data: STANDARD.encode(bytes),
            prompt: prompt::EXTRACTION_PROMPT.to_string(),
        }
    }

    /// MIME type string of the payload.
    pub fn mime_type(&self) -> &'static str {
        self.media_type.mime_type()
    }

    /// Decode the payload back to bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Extraction(format!("invalid base64 payload: {}", e)))
    }
}

/// Request to generate a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Source text (typed or extracted)
    pub source_text: String,
    /// Author name, first in the approval line
    pub author: String,
    /// Approval line after the author, comma separated
    pub approval_line: String,
    /// Additional instructions
    pub instructions: Option<String>,
    /// Team name
    pub team_name: String,
    /// Report date as shown in the report
    pub report_date: String,
    /// Revision comment when regenerating
    pub refinement: Option<String>,
    /// Example document whose structure the report should follow
    pub template: Option<String>,
}

impl GenerateRequest {
    /// Create a request for a first generation.
    pub fn new(
        source_text: impl Into<String>,
        author: impl Into<String>,
        approval_line: impl Into<String>,
        team_name: impl Into<String>,
        report_date: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            author: author.into(),
            approval_line: approval_line.into(),
            team_name: team_name.into(),
            report_date: report_date.into(),
            ..Default::default()
        }
    }

    /// Set additional instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the revision comment.
    pub fn with_refinement(mut self, comment: impl Into<String>) -> Self {
        self.refinement = Some(comment.into());
        self
    }

    /// Set the template text.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Non-blank revision comment, if any.
    pub fn refinement(&self) -> Option<&str> {
        self.refinement.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Check if this request regenerates an existing report.
    pub fn is_refinement(&self) -> bool {
        self.refinement().is_some()
    }

    /// Approval chain in signing order, author first.
    pub fn approvers(&self) -> Vec<String> {
        std::iter::once(self.author.trim())
            .chain(self.approval_line.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// System instruction for the generation service.
    pub fn system_instruction(&self) -> &'static str {
        prompt::SYSTEM_INSTRUCTION
    }

    /// User prompt for the generation service.
    pub fn user_prompt(&self) -> String {
        prompt::user_prompt(self)
    }
}
