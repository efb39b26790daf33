//! Report input form.

use crate::collab::{GenerateRequest, SourceFile};
use crate::date;
use crate::error::{Error, Result};

/// Where the source content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    /// Uploaded file, transcribed by the extraction service
    File(SourceFile),
    /// Typed text
    Text(String),
}

impl SourceInput {
    /// Check if there is anything to work with.
    pub fn is_present(&self) -> bool {
        match self {
            SourceInput::File(file) => !file.is_empty(),
            SourceInput::Text(text) => !text.trim().is_empty(),
        }
    }
}

/// Fields required to generate a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportForm {
    /// Source content
    pub source: Option<SourceInput>,
    /// Team name (팀명)
    pub team_name: String,
    /// Report date (일시)
    pub report_date: String,
    /// Author (작성자)
    pub author: String,
    /// Approval line after the author (결재라인)
    pub approval_line: String,
    /// Additional instructions (추가 지시사항)
    pub instructions: String,
    /// Optional template text
    pub template: Option<String>,
}

impl ReportForm {
    /// Empty form dated today.
    pub fn new() -> Self {
        Self {
            source: None,
            team_name: String::new(),
            report_date: date::today(),
            author: String::new(),
            approval_line: String::new(),
            instructions: String::new(),
            template: None,
        }
    }

    /// Use typed text as the source.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(SourceInput::Text(text.into()));
        self
    }

    /// Use an uploaded file as the source.
    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.source = Some(SourceInput::File(file));
        self
    }

    /// Set the team name.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team_name = team.into();
        self
    }

    /// Set the report date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.report_date = date.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the approval line.
    pub fn with_approval_line(mut self, line: impl Into<String>) -> Self {
        self.approval_line = line.into();
        self
    }

    /// Set additional instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the template text.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Labels of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.source.as_ref().is_some_and(SourceInput::is_present) {
            missing.push("원본 내용");
        }
        for (label, value) in [
            ("팀명", &self.team_name),
            ("일시", &self.report_date),
            ("작성자", &self.author),
            ("결재라인", &self.approval_line),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        missing
    }

    /// Check that every required field is filled in.
    pub fn validate(&self) -> Result<()> {
        if self.missing_fields().is_empty() {
            Ok(())
        } else {
            Err(Error::missing_fields())
        }
    }

    /// Generation request for the given source text.
    pub fn to_request(&self, source_text: impl Into<String>) -> GenerateRequest {
        let mut request = GenerateRequest::new(
            source_text,
            self.author.trim(),
            self.approval_line.trim(),
            self.team_name.trim(),
            self.report_date.trim(),
        );
        if !self.instructions.trim().is_empty() {
            request = request.with_instructions(self.instructions.trim());
        }
        if let Some(template) = &self.template {
            request = request.with_template(template.clone());
        }
        request
    }

    /// Form holding the report information of an earlier request.
    pub fn from_request(request: &GenerateRequest) -> Self {
        Self {
            source: Some(SourceInput::Text(request.source_text.clone())),
            team_name: request.team_name.clone(),
            report_date: request.report_date.clone(),
            author: request.author.clone(),
            approval_line: request.approval_line.clone(),
            instructions: request.instructions.clone().unwrap_or_default(),
            template: request.template.clone(),
        }
    }

    /// Clear every field except the date.
    pub fn clear(&mut self) {
        let report_date = std::mem::take(&mut self.report_date);
        *self = Self {
            report_date,
            ..Self::new()
        };
    }
}

impl Default for ReportForm {
    fn default() -> Self {
        Self::new()
    }
}
