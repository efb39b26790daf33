//! Report workflow: input, processing and report steps with a request gate.
//!
//! A request is started with [`Workflow::begin_generate`] or
//! [`Workflow::begin_refine`], executed off the workflow through
//! [`PendingRequest::run`], and settled with [`Workflow::complete`]. Only one
//! request may be outstanding; completions carrying an older token are
//! rejected, so a slow response can never overwrite a newer state.

use crate::collab::{ExtractRequest, GenerateRequest, ReportGenerator, TextExtractor};
use crate::error::{Error, Result, MSG_EMPTY_REFINEMENT, MSG_REFINE_UNKNOWN, MSG_UNKNOWN};
use crate::export::{
    ExportArtifact, ExportFormat, ExportOptions, ExporterRegistry, PrintSpooler, SpoolOutcome,
};
use crate::parser::ReportParser;
use crate::render::{RenderOptions, RenderedReport, Theme};

use super::form::{ReportForm, SourceInput};
use super::view::ViewState;

/// Loading message while a file is transcribed and a report generated.
pub const LOADING_EXTRACT: &str = "파일에서 텍스트를 추출하고 있습니다...";

/// Loading message while a report is generated from typed text.
pub const LOADING_GENERATE: &str = "입력된 내용으로 보고서를 생성 중입니다...";

/// Loading message while a report is regenerated.
pub const LOADING_REFINE: &str = "보고서를 수정하고 있습니다...";

/// Workflow step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    /// Filling in the form
    #[default]
    Input,
    /// A request is outstanding
    Processing,
    /// A report is displayed
    Report,
}

/// Kind of outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First generation from the form
    Generate,
    /// Regeneration with a revision comment
    Refine,
}

/// Where a pending request takes its source text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSource {
    /// Transcribe a file first
    Extract(ExtractRequest),
    /// Use text as is
    Text(String),
}

/// Result of running a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    /// Source text the report was generated from
    pub source_text: String,
    /// Generated report markdown
    pub markdown: String,
}

/// A started request, detached from the workflow while it runs.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    token: u64,
    kind: RequestKind,
    source: RequestSource,
    request: GenerateRequest,
}

impl PendingRequest {
    /// Token to pass back to [`Workflow::complete`].
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Request kind.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Source of the request.
    pub fn source(&self) -> &RequestSource {
        &self.source
    }

    /// Generation request, without source text until [`run`](Self::run).
    pub fn request(&self) -> &GenerateRequest {
        &self.request
    }

    /// Extract (when needed) and generate.
    ///
    /// Empty source text is rejected before the generator is called.
    pub fn run<E, G>(&self, extractor: &E, generator: &G) -> Result<GenerationOutput>
    where
        E: TextExtractor + ?Sized,
        G: ReportGenerator + ?Sized,
    {
        let source_text = match &self.source {
            RequestSource::Extract(extract) => {
                log::debug!(
                    "Extracting text from {} ({} base64 bytes)",
                    extract.mime_type(),
                    extract.data.len()
                );
                extractor.extract(extract)?
            }
            RequestSource::Text(text) => text.clone(),
        };

        if source_text.trim().is_empty() {
            log::warn!("Request {} has no source text", self.token);
            return Err(Error::EmptySource);
        }

        let request = GenerateRequest {
            source_text: source_text.clone(),
            ..self.request.clone()
        };
        let markdown = generator.generate(&request)?;
        if markdown.trim().is_empty() {
            return Err(Error::Generation(String::new()));
        }

        Ok(GenerationOutput {
            source_text,
            markdown,
        })
    }
}

/// Report workflow state.
#[derive(Debug, Clone)]
pub struct Workflow {
    parser: ReportParser,
    render_options: RenderOptions,
    form: ReportForm,
    step: Step,
    report: Option<RenderedReport>,
    source_text: Option<String>,
    error: Option<String>,
    loading: Option<&'static str>,
    next_token: u64,
    outstanding: Option<(u64, RequestKind)>,
    view: ViewState,
}

impl Workflow {
    /// Create a workflow with default parser and render options.
    pub fn new() -> Self {
        Self::with_parts(ReportParser::new(), RenderOptions::default())
    }

    /// Create a workflow with a custom parser and render options.
    pub fn with_parts(parser: ReportParser, render_options: RenderOptions) -> Self {
        Self {
            parser,
            render_options,
            form: ReportForm::new(),
            step: Step::Input,
            report: None,
            source_text: None,
            error: None,
            loading: None,
            next_token: 1,
            outstanding: None,
            view: ViewState::default(),
        }
    }

    /// Set the initial theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.view.set_theme(theme);
        self
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// The input form.
    pub fn form(&self) -> &ReportForm {
        &self.form
    }

    /// Mutable access to the input form.
    pub fn form_mut(&mut self) -> &mut ReportForm {
        &mut self.form
    }

    /// The displayed report, if any.
    pub fn report(&self) -> Option<&RenderedReport> {
        self.report.as_ref()
    }

    /// Source text of the displayed report.
    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    /// Error banner text.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hide the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Loading message while a request is outstanding.
    pub fn loading_message(&self) -> Option<&'static str> {
        self.loading
    }

    /// Check if a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    /// View state (theme, busy label).
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.view.theme()
    }

    /// Change the active theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.view.set_theme(theme);
    }

    /// Validate the form and start a generation request.
    pub fn begin_generate(&mut self) -> Result<PendingRequest> {
        if self.outstanding.is_some() {
            return Err(Error::Busy);
        }
        if let Err(e) = self.form.validate() {
            self.fail_input(&e);
            return Err(e);
        }

        let (source, loading) = match &self.form.source {
            Some(SourceInput::File(file)) => (RequestSource::Extract(file.to_request()), LOADING_EXTRACT),
            Some(SourceInput::Text(text)) => (RequestSource::Text(text.clone()), LOADING_GENERATE),
            None => {
                let e = Error::missing_fields();
                self.fail_input(&e);
                return Err(e);
            }
        };

        let request = self.form.to_request(String::new());
        Ok(self.start(RequestKind::Generate, source, request, loading))
    }

    /// Start a refinement of the displayed report.
    pub fn begin_refine(&mut self, comment: &str) -> Result<PendingRequest> {
        if self.outstanding.is_some() {
            return Err(Error::Busy);
        }
        let source_text = match (&self.report, &self.source_text) {
            (Some(_), Some(text)) => text.clone(),
            _ => return Err(Error::InvalidState("no report to refine".to_string())),
        };
        if comment.trim().is_empty() {
            let e = Error::Validation(MSG_EMPTY_REFINEMENT.to_string());
            self.error = Some(e.user_message());
            return Err(e);
        }

        let request = self.form.to_request(String::new()).with_refinement(comment.trim());
        Ok(self.start(
            RequestKind::Refine,
            RequestSource::Text(source_text),
            request,
            LOADING_REFINE,
        ))
    }

    fn start(
        &mut self,
        kind: RequestKind,
        source: RequestSource,
        request: GenerateRequest,
        loading: &'static str,
    ) -> PendingRequest {
        let token = self.next_token;
        self.next_token += 1;
        self.outstanding = Some((token, kind));
        self.step = Step::Processing;
        self.loading = Some(loading);
        self.error = None;
        log::debug!("Started {:?} request {}", kind, token);

        PendingRequest {
            token,
            kind,
            source,
            request,
        }
    }

    /// Settle an outstanding request.
    ///
    /// On success the markdown is rendered once and becomes the displayed
    /// report. On failure the banner is set and the workflow returns to the
    /// input form (generation) or to the previous report (refinement).
    pub fn complete(
        &mut self,
        token: u64,
        result: Result<GenerationOutput>,
    ) -> Result<&RenderedReport> {
        let kind = match self.outstanding {
            Some((current, kind)) if current == token => kind,
            _ => {
                log::warn!("Dropping completion for stale request {}", token);
                return Err(Error::StaleRequest(token));
            }
        };
        self.outstanding = None;
        self.loading = None;

        let rendered = result.and_then(|output| {
            RenderedReport::render(&output.markdown, &self.parser, &self.render_options)
                .map(|report| (report, output.source_text))
        });

        match rendered {
            Ok((report, source_text)) => {
                self.step = Step::Report;
                self.error = None;
                self.source_text = Some(source_text);
                Ok(&*self.report.insert(report))
            }
            Err(e) => {
                match kind {
                    RequestKind::Generate => self.fail_input(&e),
                    RequestKind::Refine => {
                        let message = e.user_message();
                        self.error = Some(if message == MSG_UNKNOWN {
                            MSG_REFINE_UNKNOWN.to_string()
                        } else {
                            message
                        });
                        self.step = if self.report.is_some() {
                            Step::Report
                        } else {
                            Step::Input
                        };
                    }
                }
                Err(e)
            }
        }
    }

    /// Abandon the outstanding request. Its completion will be rejected.
    pub fn cancel(&mut self) -> bool {
        let Some((token, kind)) = self.outstanding.take() else {
            return false;
        };
        log::debug!("Cancelled {:?} request {}", kind, token);
        self.loading = None;
        self.step = match kind {
            RequestKind::Refine if self.report.is_some() => Step::Report,
            _ => Step::Input,
        };
        true
    }

    /// Generate a report from the form, blocking on the collaborators.
    pub fn generate<E, G>(&mut self, extractor: &E, generator: &G) -> Result<&RenderedReport>
    where
        E: TextExtractor + ?Sized,
        G: ReportGenerator + ?Sized,
    {
        let pending = self.begin_generate()?;
        let result = pending.run(extractor, generator);
        self.complete(pending.token(), result)
    }

    /// Refine the displayed report, blocking on the generator.
    pub fn refine<G>(&mut self, comment: &str, generator: &G) -> Result<&RenderedReport>
    where
        G: ReportGenerator + ?Sized,
    {
        let pending = self.begin_refine(comment)?;
        let no_extraction = |_: &ExtractRequest| -> Result<String> {
            Err(Error::InvalidState("refinement never extracts".to_string()))
        };
        let result = pending.run(&no_extraction, generator);
        self.complete(pending.token(), result)
    }

    /// Display a previously generated report without calling the generator.
    pub fn resume(&mut self, source_text: &str, markdown: &str) -> Result<&RenderedReport> {
        if self.outstanding.is_some() {
            return Err(Error::Busy);
        }
        let report = RenderedReport::render(markdown, &self.parser, &self.render_options)?;
        self.source_text = Some(source_text.to_string());
        self.error = None;
        self.step = Step::Report;
        Ok(&*self.report.insert(report))
    }

    /// Start over: clear the form (except the date), the report and errors.
    pub fn reset(&mut self) {
        if let Some((token, _)) = self.outstanding.take() {
            log::debug!("Reset dropped request {}", token);
        }
        self.form.clear();
        self.report = None;
        self.source_text = None;
        self.error = None;
        self.loading = None;
        self.step = Step::Input;
    }

    /// Export the displayed report in the named format.
    ///
    /// Word, print and PDF exports force the light theme for their
    /// duration; the screen page keeps the active theme.
    pub fn export(
        &mut self,
        name: &str,
        registry: &ExporterRegistry,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let report = self
            .report
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no report to export".to_string()))?;
        let label = format!("{} 내보내는 중...", name);
        let forces_light = name
            .parse::<ExportFormat>()
            .map(ExportFormat::forces_light)
            .unwrap_or(true);
        let guard = if forces_light {
            self.view.export_guard(label)
        } else {
            self.view.busy_guard(label)
        };
        let options = options.clone().with_theme(guard.theme());
        registry.export(name, report, &options)
    }

    /// Produce the print document and hand it to a print command.
    pub fn print(
        &mut self,
        spooler: &PrintSpooler,
        registry: &ExporterRegistry,
        options: &ExportOptions,
    ) -> Result<SpoolOutcome> {
        let report = self
            .report
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no report to print".to_string()))?;
        let guard = self.view.export_guard("인쇄 준비 중...");
        let options = options.clone().with_theme(guard.theme());
        let artifact = registry.export("print", report, &options)?;
        spooler.spool(&artifact)
    }

    fn fail_input(&mut self, error: &Error) {
        self.error = Some(error.user_message());
        self.step = Step::Input;
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::SourceFile;
    use crate::error::{MSG_EMPTY_SOURCE, MSG_MISSING_FIELDS};
    use std::cell::Cell;

    const REPORT: &str = "| 담당 | 팀장 |\n|---|---|\n|  |  |\n| 팀명 | 기획팀 |\n\n**주간 보고**\n1. 개요";

    fn filled_workflow() -> Workflow {
        let mut workflow = Workflow::new();
        *workflow.form_mut() = ReportForm::new()
            .with_text("회의 메모")
            .with_team("기획팀")
            .with_date("2024. 01. 05.")
            .with_author("홍길동")
            .with_approval_line("팀장");
        workflow
    }

    fn generator(_: &GenerateRequest) -> Result<String> {
        Ok(REPORT.to_string())
    }

    fn extractor(_: &ExtractRequest) -> Result<String> {
        Ok("추출된 본문".to_string())
    }

    #[test]
    fn test_missing_fields_stay_on_input() {
        let mut workflow = Workflow::new();
        let err = workflow.begin_generate().unwrap_err();
        assert_eq!(err.user_message(), MSG_MISSING_FIELDS);
        assert_eq!(workflow.step(), Step::Input);
        assert_eq!(workflow.error(), Some(MSG_MISSING_FIELDS));
        assert!(!workflow.is_busy());
    }

    #[test]
    fn test_generate_from_text() {
        let mut workflow = filled_workflow();
        let report = workflow.generate(&extractor, &generator).unwrap();
        assert_eq!(report.stats().table_count, 2);
        assert_eq!(workflow.step(), Step::Report);
        assert_eq!(workflow.source_text(), Some("회의 메모"));
        assert!(workflow.error().is_none());
    }

    #[test]
    fn test_loading_messages() {
        let mut workflow = filled_workflow();
        let pending = workflow.begin_generate().unwrap();
        assert_eq!(workflow.step(), Step::Processing);
        assert_eq!(workflow.loading_message(), Some(LOADING_GENERATE));
        workflow.cancel();

        let file = SourceFile::new("memo.png", b"\x89PNG\r\n\x1a\n".to_vec()).unwrap();
        workflow.form_mut().source = Some(SourceInput::File(file));
        let pending_file = workflow.begin_generate().unwrap();
        assert_eq!(workflow.loading_message(), Some(LOADING_EXTRACT));
        assert!(matches!(pending_file.source(), RequestSource::Extract(_)));
        assert_ne!(pending.token(), pending_file.token());
    }

    #[test]
    fn test_busy_gate_and_stale_token() {
        let mut workflow = filled_workflow();
        let first = workflow.begin_generate().unwrap();
        assert!(matches!(workflow.begin_generate(), Err(Error::Busy)));

        workflow.cancel();
        let second = workflow.begin_generate().unwrap();

        let stale = workflow.complete(first.token(), first.run(&extractor, &generator));
        assert!(matches!(stale, Err(Error::StaleRequest(_))));
        assert_eq!(workflow.step(), Step::Processing);

        let result = second.run(&extractor, &generator);
        assert!(workflow.complete(second.token(), result).is_ok());
        assert_eq!(workflow.step(), Step::Report);
    }

    #[test]
    fn test_empty_extraction_never_reaches_generator() {
        let calls = Cell::new(0);
        let counting = |_: &GenerateRequest| -> Result<String> {
            calls.set(calls.get() + 1);
            Ok(REPORT.to_string())
        };
        let blank = |_: &ExtractRequest| -> Result<String> { Ok("  \n ".to_string()) };

        let mut workflow = filled_workflow();
        let file = SourceFile::new("scan.pdf", b"%PDF-1.4".to_vec()).unwrap();
        workflow.form_mut().source = Some(SourceInput::File(file));

        let err = workflow.generate(&blank, &counting).unwrap_err();
        assert!(matches!(err, Error::EmptySource));
        assert_eq!(calls.get(), 0);
        assert_eq!(workflow.step(), Step::Input);
        assert_eq!(workflow.error(), Some(MSG_EMPTY_SOURCE));
    }

    #[test]
    fn test_refine_failure_keeps_report() {
        let mut workflow = filled_workflow();
        workflow.generate(&extractor, &generator).unwrap();
        let before = workflow.report().unwrap().fragment().to_string();

        let err = workflow.begin_refine("   ").unwrap_err();
        assert_eq!(err.user_message(), MSG_EMPTY_REFINEMENT);
        assert_eq!(workflow.step(), Step::Report);

        let failing = |_: &GenerateRequest| -> Result<String> { Err(Error::Generation(String::new())) };
        assert!(workflow.refine("결론 보강", &failing).is_err());
        assert_eq!(workflow.step(), Step::Report);
        assert_eq!(workflow.error(), Some(MSG_REFINE_UNKNOWN));
        assert_eq!(workflow.report().unwrap().fragment(), before);

        workflow.dismiss_error();
        assert!(workflow.error().is_none());
    }

    #[test]
    fn test_refine_sends_comment_and_source() {
        let mut workflow = filled_workflow();
        workflow.generate(&extractor, &generator).unwrap();

        let checking = |r: &GenerateRequest| -> Result<String> {
            assert_eq!(r.refinement(), Some("결론 보강"));
            assert_eq!(r.source_text, "회의 메모");
            Ok("보 고 서\n1. 수정본".to_string())
        };
        let report = workflow.refine("결론 보강", &checking).unwrap();
        assert_eq!(report.stats().table_count, 0);
        assert!(report.source().contains("수정본"));
    }

    #[test]
    fn test_resume_then_refine() {
        let mut workflow = filled_workflow();
        workflow.resume("저장된 메모", REPORT).unwrap();
        assert_eq!(workflow.step(), Step::Report);

        let checking = |r: &GenerateRequest| -> Result<String> {
            assert_eq!(r.source_text, "저장된 메모");
            Ok(REPORT.to_string())
        };
        assert!(workflow.refine("표 정리", &checking).is_ok());
    }

    #[test]
    fn test_refine_without_report() {
        let mut workflow = filled_workflow();
        assert!(matches!(
            workflow.begin_refine("x"),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_reset() {
        let mut workflow = filled_workflow();
        workflow.generate(&extractor, &generator).unwrap();
        workflow.reset();
        assert_eq!(workflow.step(), Step::Input);
        assert!(workflow.report().is_none());
        assert!(workflow.form().author.is_empty());
        assert_eq!(workflow.form().report_date, "2024. 01. 05.");
    }

    #[test]
    fn test_export_restores_theme() {
        let mut workflow = filled_workflow().with_theme(Theme::Dark);
        workflow.generate(&extractor, &generator).unwrap();

        let registry = ExporterRegistry::with_defaults();
        let options = ExportOptions::default().with_theme(Theme::Dark);
        let artifact = workflow.export("print", &registry, &options).unwrap();
        let html = String::from_utf8(artifact.bytes).unwrap();
        assert!(html.contains("class=\"report light\""));
        assert_eq!(workflow.theme(), Theme::Dark);
        assert!(workflow.view().busy_label().is_none());

        // The screen page keeps the theme the user is looking at.
        let artifact = workflow.export("html", &registry, &options).unwrap();
        let html = String::from_utf8(artifact.bytes).unwrap();
        assert!(html.contains("class=\"report dark\""));
        assert_eq!(workflow.theme(), Theme::Dark);
        assert!(workflow.view().busy_label().is_none());

        assert!(workflow.export("rtf", &registry, &options).is_err());
        assert_eq!(workflow.theme(), Theme::Dark);
    }
}
