//! End-to-end workflow tests with stub collaborators.

use std::cell::{Cell, RefCell};

use kreport::error::{MSG_EMPTY_SOURCE, MSG_MISSING_FIELDS};
use kreport::model::{Block, OutlineLevel, TableKind};
use kreport::session::{Step, ThemeStore};
use kreport::{
    Error, ErrorCategory, ExportOptions, ExporterRegistry, ExtractRequest, GenerateRequest,
    MediaType, ReportForm, Result, SourceFile, Theme, Workflow,
};

const GENERATED: &str = "\
| 직위 | 성명 |
|:---|:---|
|  |  |
| 팀명 | 기획팀 |
| 일시 | 2024. 01. 01. |

**신규 사업 검토 보고**

1. 개요
가. 세부 내용 설명
1) 추진 일정
가) 1분기 착수
";

fn form() -> ReportForm {
    ReportForm::new()
        .with_team("기획팀")
        .with_date("2024. 01. 01.")
        .with_author("홍길동")
        .with_approval_line("팀장")
}

#[test]
fn test_generate_scenario() {
    let seen = RefCell::new(None);
    let generator = |request: &GenerateRequest| -> Result<String> {
        *seen.borrow_mut() = Some(request.user_prompt());
        Ok(GENERATED.to_string())
    };
    let extractor = |_: &ExtractRequest| -> Result<String> { unreachable!("typed text") };

    let mut workflow = Workflow::new();
    *workflow.form_mut() = form().with_text("신규 사업 회의 메모");
    let report = workflow.generate(&extractor, &generator).unwrap();

    let tables: Vec<_> = report.document().tables().collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].kind, TableKind::Approval);
    assert_eq!(tables[0].header.as_ref().unwrap().cells.len(), 2);
    assert_eq!(tables[0].rows.len(), 1);
    assert!(tables[0].rows[0].is_blank());
    assert_eq!(tables[1].kind, TableKind::Metadata);
    assert_eq!(tables[1].rows.len(), 2);

    let levels: Vec<OutlineLevel> = report
        .document()
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::OutlineLine { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(
        levels,
        vec![
            OutlineLevel::Decimal,
            OutlineLevel::Syllable,
            OutlineLevel::DecimalParen,
            OutlineLevel::SyllableParen
        ]
    );
    assert!(report
        .fragment()
        .contains("<p class=\"outline level-1\" style=\"margin:0 0 0.3em 2em\">가. 세부 내용 설명</p>"));

    let prompt = seen.borrow().clone().unwrap();
    assert!(prompt.contains("- 결재라인: 홍길동, 팀장"));
    assert!(prompt.contains("신규 사업 회의 메모"));
    assert_eq!(workflow.step(), Step::Report);
}

#[test]
fn test_empty_extraction_rejected_before_generation() {
    let generator_calls = Cell::new(0);
    let generator = |_: &GenerateRequest| -> Result<String> {
        generator_calls.set(generator_calls.get() + 1);
        Ok(GENERATED.to_string())
    };
    let extractor = |request: &ExtractRequest| -> Result<String> {
        assert_eq!(request.media_type, MediaType::Jpeg);
        Ok("   ".to_string())
    };

    let file = SourceFile::new("메모.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap();
    let mut workflow = Workflow::new();
    *workflow.form_mut() = form().with_file(file);

    let err = workflow.generate(&extractor, &generator).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.user_message(), MSG_EMPTY_SOURCE);
    assert_eq!(generator_calls.get(), 0);
    assert_eq!(workflow.step(), Step::Input);
    assert_eq!(workflow.error(), Some(MSG_EMPTY_SOURCE));
    assert!(workflow.report().is_none());
}

#[test]
fn test_collaborator_failure_returns_to_input() {
    let generator = |_: &GenerateRequest| -> Result<String> {
        Err(Error::Generation("요청 한도를 초과했습니다".to_string()))
    };
    let extractor = |_: &ExtractRequest| -> Result<String> { Ok(String::new()) };

    let mut workflow = Workflow::new();
    *workflow.form_mut() = form().with_text("메모");
    let err = workflow.generate(&extractor, &generator).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Collaborator);
    assert_eq!(workflow.step(), Step::Input);
    assert_eq!(workflow.error(), Some("요청 한도를 초과했습니다"));
    assert!(!workflow.is_busy());
}

#[test]
fn test_missing_fields() {
    let generator = |_: &GenerateRequest| -> Result<String> { unreachable!() };
    let extractor = |_: &ExtractRequest| -> Result<String> { unreachable!() };

    let mut workflow = Workflow::new();
    *workflow.form_mut() = form().with_text("메모").with_approval_line(" ");
    let err = workflow.generate(&extractor, &generator).unwrap_err();
    assert_eq!(err.user_message(), MSG_MISSING_FIELDS);
    assert_eq!(workflow.form().missing_fields(), vec!["결재라인"]);
}

#[test]
fn test_unsupported_upload() {
    let err = SourceFile::new("notes.txt", b"plain text".to_vec()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(err.user_message().contains("JPG, PNG, WEBP, PDF"));
}

#[test]
fn test_pending_request_outlives_cancel() {
    let generator = |_: &GenerateRequest| -> Result<String> { Ok(GENERATED.to_string()) };
    let extractor = |_: &ExtractRequest| -> Result<String> { Ok(String::new()) };

    let mut workflow = Workflow::new();
    *workflow.form_mut() = form().with_text("메모");

    let slow = workflow.begin_generate().unwrap();
    assert!(workflow.cancel());
    assert_eq!(workflow.step(), Step::Input);

    let result = slow.run(&extractor, &generator);
    assert!(result.is_ok());
    assert!(matches!(
        workflow.complete(slow.token(), result),
        Err(Error::StaleRequest(_))
    ));
    assert!(workflow.report().is_none());
}

#[test]
fn test_refine_and_export_round() {
    let generator = |request: &GenerateRequest| -> Result<String> {
        match request.refinement() {
            Some(comment) => Ok(format!("{}\n2. 수정 반영: {}", GENERATED.trim_end(), comment)),
            None => Ok(GENERATED.to_string()),
        }
    };
    let extractor = |_: &ExtractRequest| -> Result<String> { Ok(String::new()) };

    let mut workflow = Workflow::new().with_theme(Theme::Dark);
    *workflow.form_mut() = form().with_text("메모");
    workflow.generate(&extractor, &generator).unwrap();

    let refined = workflow.refine("일정 추가", &generator).unwrap();
    assert!(refined.fragment().contains("수정 반영: 일정 추가"));
    assert_eq!(workflow.source_text(), Some("메모"));

    let registry = ExporterRegistry::with_defaults();
    let word = workflow
        .export("word", &registry, &ExportOptions::default())
        .unwrap();
    let html = String::from_utf8(word.bytes).unwrap();
    assert!(html.contains("수정 반영: 일정 추가"));
    assert_eq!(workflow.theme(), Theme::Dark);

    workflow.reset();
    assert_eq!(workflow.step(), Step::Input);
    assert!(workflow.form().source.is_none());
    assert!(workflow
        .export("word", &registry, &ExportOptions::default())
        .is_err());
}

#[test]
fn test_theme_preference_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ThemeStore::new(dir.path().join("kreport").join("settings.json"));

    let theme = store.load_or(Theme::Light);
    assert_eq!(theme, Theme::Light);
    store.save(Theme::Dark).unwrap();

    let workflow = Workflow::new().with_theme(store.load_or(Theme::Light));
    assert_eq!(workflow.theme(), Theme::Dark);
}
