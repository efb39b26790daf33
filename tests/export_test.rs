//! Integration tests for the export registry and serializers.

use chrono::{Local, TimeZone};
use kreport::export::{
    print_document, word_document, ExportFormat, ExportOptions, ExporterRegistry, PdfOptions,
    PrintStrategy, PRINT_TITLE,
};
use kreport::render::{JsonFormat, RenderOptions, RenderedReport, Theme};
use kreport::{Document, ReportParser};

const REPORT: &str = "\
| 담당 | 팀장 | 부장 |
|:---:|:---:|:---:|
|  |  |  |
| 팀명 | 기획팀 |
| 일시 | 2024. 01. 05. |
| 작성자 | 홍길동 |

**2024년 상반기 사업 계획**

1. 추진 배경
가. 세부 내용 설명
1) 예산 **확보** 현황
가) 집행 계획

| 구분 | 금액 | 비고 |
|---|---|---|
| 인건비 | 1,000 | 정규직<br>계약직 |
| 운영비 | 500 |  |
";

fn report() -> RenderedReport {
    RenderedReport::render(REPORT, &ReportParser::new(), &RenderOptions::default()).unwrap()
}

fn options() -> ExportOptions {
    ExportOptions::default().with_pdf_options(
        PdfOptions::new()
            .with_title("2024년 상반기 사업 계획")
            .with_author("홍길동")
            .with_created(Local.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap()),
    )
}

#[test]
fn test_registry_has_every_format() {
    let registry = ExporterRegistry::with_defaults();
    for format in ExportFormat::ALL {
        assert!(registry.supports(format.name()), "{} missing", format);
    }
    assert!(registry.supports("DOCX"));
    assert!(registry.supports("txt"));
    assert!(!registry.supports("rtf"));
}

#[test]
fn test_word_export() {
    let report = report();
    let artifact = ExporterRegistry::with_defaults()
        .export("word", &report, &options())
        .unwrap();

    assert_eq!(artifact.filename, "ai-report.doc");
    assert_eq!(artifact.mime_type, "application/msword");

    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("xmlns:o='urn:schemas-microsoft-com:office:office'"));
    assert!(html.contains("xmlns:w='urn:schemas-microsoft-com:office:word'"));
    assert!(html.contains("<meta charset='utf-8'>"));
    assert!(html.contains(report.fragment()));
    assert_eq!(html, word_document(report.fragment(), "2024년 상반기 사업 계획"));
}

#[test]
fn test_word_target_is_configurable() {
    let options = options().with_word_target(
        "report.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    );
    let artifact = ExporterRegistry::with_defaults()
        .export("word", &report(), &options)
        .unwrap();
    assert_eq!(artifact.filename, "report.docx");
    assert_eq!(artifact.extension(), Some("docx"));
}

#[test]
fn test_print_export_is_light() {
    let report = report();
    let options = options().with_theme(Theme::Dark);
    let artifact = ExporterRegistry::with_defaults()
        .export("print", &report, &options)
        .unwrap();

    assert_eq!(artifact.mime_type, "text/html");
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert_eq!(html, print_document(report.fragment(), PRINT_TITLE));
    assert!(html.contains("@page{size:A4;margin:2cm}"));
    assert!(html.contains("class=\"report light\""));
    assert!(!html.contains("dark"));
}

#[test]
fn test_print_pdf_strategy() {
    let options = options().with_print_strategy(PrintStrategy::Pdf);
    let artifact = ExporterRegistry::with_defaults()
        .export("print", &report(), &options)
        .unwrap();
    assert_eq!(artifact.filename, "ai-report.pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-1.5"));
}

#[test]
fn test_pdf_export() {
    let artifact = ExporterRegistry::with_defaults()
        .export("pdf", &report(), &options())
        .unwrap();
    assert_eq!(artifact.filename, "ai-report.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");

    let pdf = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert!(!pdf.get_pages().is_empty());
}

#[test]
fn test_text_and_json_exports() {
    let report = report();
    let registry = ExporterRegistry::with_defaults();

    let text = registry.export("text", &report, &options()).unwrap();
    let text = String::from_utf8(text.bytes).unwrap();
    assert!(text.contains("  가. 세부 내용 설명"));
    assert!(text.contains("인건비 | 1,000 | 정규직 / 계약직"));

    let json = registry
        .export("json", &report, &options().with_json_format(JsonFormat::Compact))
        .unwrap();
    let doc: Document = serde_json::from_slice(&json.bytes).unwrap();
    assert_eq!(&doc, report.document());
}

#[test]
fn test_exports_do_not_mutate_snapshot() {
    let report = report();
    let before_doc = report.document().clone();
    let before_html = report.fragment().to_string();
    let registry = ExporterRegistry::with_defaults();

    let mut first = Vec::new();
    for name in registry.names() {
        first.push(registry.export(name, &report, &options()).unwrap().bytes);
    }
    assert_eq!(report.document(), &before_doc);
    assert_eq!(report.fragment(), before_html);

    // The creation date is pinned, so every format is byte-identical.
    for (name, bytes) in registry.names().into_iter().zip(&first) {
        let again = registry.export(name, &report, &options()).unwrap();
        assert_eq!(&again.bytes, bytes, "{} changed between exports", name);
    }

    let rerendered =
        RenderedReport::render(REPORT, &ReportParser::new(), &RenderOptions::default()).unwrap();
    assert_eq!(rerendered.fragment(), report.fragment());
}

#[test]
fn test_inline_markup_is_literal() {
    let html = report().fragment().to_string();
    assert!(html.contains("예산 **확보** 현황"));
    assert!(html.contains("정규직<br>계약직"));
}

#[test]
fn test_write_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let report = report();
    let registry = ExporterRegistry::with_defaults();

    for name in ["word", "pdf", "print"] {
        let artifact = registry.export(name, &report, &options()).unwrap();
        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }
    assert!(dir.path().join("ai-report.doc").exists());
    assert!(dir.path().join("ai-report.pdf").exists());
    assert!(dir.path().join("ai-report.html").exists());
}
