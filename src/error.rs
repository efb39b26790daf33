//! Error types for kreport library.

use std::io;
use thiserror::Error;

/// Result type alias for kreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when required report fields are missing.
pub const MSG_MISSING_FIELDS: &str = "보고서 생성을 위한 모든 필수 항목을 입력해주세요.";

/// Message shown when the source content has no text.
pub const MSG_EMPTY_SOURCE: &str =
    "원본 내용에서 텍스트를 찾을 수 없습니다. 다른 파일이나 텍스트를 사용해보세요.";

/// Message shown when a refinement is requested without instructions.
pub const MSG_EMPTY_REFINEMENT: &str = "수정 지시사항을 입력해주세요.";

/// Message shown for files outside the media type allow-list.
pub const MSG_UNSUPPORTED_FILE: &str =
    "지원하지 않는 파일 형식입니다. JPG, PNG, WEBP, PDF 파일만 업로드할 수 있습니다.";

/// Message shown when a request is already in flight.
pub const MSG_BUSY: &str = "이전 요청을 처리하고 있습니다. 잠시 후 다시 시도해주세요.";

/// Fallback message for failures without a usable description.
pub const MSG_UNKNOWN: &str = "알 수 없는 오류가 발생했습니다. 다시 시도해주세요.";

/// Fallback message for refinement failures without a usable description.
pub const MSG_REFINE_UNKNOWN: &str = "보고서 수정 중 알 수 없는 오류가 발생했습니다.";

/// Error types that can occur while generating, rendering or exporting reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required form field or input is missing or invalid.
    #[error("{0}")]
    Validation(String),

    /// The source content (typed or extracted) contains no text.
    #[error("{}", MSG_EMPTY_SOURCE)]
    EmptySource,

    /// The file type is not in the extraction allow-list.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The text extraction collaborator failed.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The report generation collaborator failed.
    #[error("Report generation failed: {0}")]
    Generation(String),

    /// Another request is still outstanding.
    #[error("A request is already in progress")]
    Busy,

    /// A completion arrived for a request that is no longer current.
    #[error("Stale request token {0}")]
    StaleRequest(u64),

    /// The workflow is not in a state that allows the operation.
    #[error("Invalid workflow state: {0}")]
    InvalidState(String),

    /// Error during rendering (HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error while producing an export artifact.
    #[error("Export error: {0}")]
    Export(String),

    /// Error building the PDF document.
    #[error("PDF writing error: {0}")]
    Pdf(String),

    /// The print command could not be started or failed.
    #[error("Print spooling error: {0}")]
    Spool(String),

    /// Invalid report date string.
    #[error("Invalid report date: {0}")]
    InvalidDate(String),

    /// Settings file could not be read or written.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Coarse error taxonomy used to decide where the workflow returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing fields, empty content, unsupported input
    Validation,
    /// Extraction or generation call failed
    Collaborator,
    /// Rendering, export or print failure
    Export,
    /// Filesystem or settings failure
    Io,
    /// A request is already outstanding
    Busy,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_)
            | Error::EmptySource
            | Error::UnsupportedMediaType(_)
            | Error::InvalidDate(_) => ErrorCategory::Validation,
            Error::Extraction(_) | Error::Generation(_) => ErrorCategory::Collaborator,
            Error::Busy | Error::StaleRequest(_) | Error::InvalidState(_) => ErrorCategory::Busy,
            Error::Render(_) | Error::Export(_) | Error::Pdf(_) | Error::Spool(_) => {
                ErrorCategory::Export
            }
            Error::Io(_) | Error::Settings(_) | Error::Other(_) => ErrorCategory::Io,
        }
    }

    /// Korean message suitable for an error banner or alert.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::EmptySource => MSG_EMPTY_SOURCE.to_string(),
            Error::UnsupportedMediaType(_) => MSG_UNSUPPORTED_FILE.to_string(),
            Error::Busy => MSG_BUSY.to_string(),
            Error::Extraction(msg) | Error::Generation(msg) if !msg.trim().is_empty() => {
                msg.clone()
            }
            Error::Extraction(_) | Error::Generation(_) => MSG_UNKNOWN.to_string(),
            Error::InvalidDate(date) => format!("날짜 형식이 올바르지 않습니다: {}", date),
            Error::Spool(msg) => format!("인쇄 작업을 시작할 수 없습니다: {}", msg),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    MSG_UNKNOWN.to_string()
                } else {
                    text
                }
            }
        }
    }

    /// Shorthand for a validation error with the missing-fields message.
    pub fn missing_fields() -> Self {
        Error::Validation(MSG_MISSING_FIELDS.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
