//! Prompts sent to the text generation service.
//!
//! The prompts fix the structure the parser relies on: an approval table
//! first, the report information table second, a bolded title line, then
//! the body.

use super::GenerateRequest;

/// Instruction sent with every extraction request.
pub const EXTRACTION_PROMPT: &str = "Extract all text from this file. It could be a handwritten note, a typed document, or a PDF. Return only the transcribed text, nothing else.";

/// System instruction for report generation.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional report generator for Korean public institutions. Your task is to transform raw text into a formal, structured, and professional report document. The language must be formal, objective, and adhere to the standards of official Korean government documents. The output must be entirely in Korean and formatted using markdown. The report must start with a formal approval signature table, followed by report metadata (team, date, author), a bolded title, and then the main content.";

/// Placeholder for empty additional instructions.
const NO_INSTRUCTIONS: &str = "없음";

/// Build the user prompt for a request, initial or refinement.
pub fn user_prompt(request: &GenerateRequest) -> String {
    let mut prompt = match request.refinement() {
        Some(comment) => refinement_prompt(request, comment),
        None => initial_prompt(request),
    };

    if let Some(template) = request.template.as_deref().filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!(
            "\n## 참고 양식\n아래 양식의 구성과 문체를 참고하여 작성해주세요.\n---\n{}\n---\n",
            template.trim()
        ));
    }
    prompt
}

/// Prompt for a first generation.
pub fn initial_prompt(request: &GenerateRequest) -> String {
    let instructions = request
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_INSTRUCTIONS);

    format!(
        "다음 정보를 바탕으로 공식 보고서를 작성해 주십시오. 보고서의 구조는 다음 순서를 엄격히 따라야 합니다.

1.  **결재란**: 보고서 최상단에 다음 결재라인에 따른 결재란을 마크다운 테이블로 만들어주세요. 결재라인의 첫 번째는 작성자 본인입니다. 테이블의 첫 행은 직위/이름을, 두 번째 행은 서명을 위한 빈 칸으로 구성해주세요.
    - 결재라인: {author}, {approval}

2.  **보고서 정보**: 결재란 바로 아래에 다음 정보를 명시해주세요. 각 항목은 한 줄씩 차지해야 합니다.
    - 팀명: {team}
    - 일시: {date}
    - 작성자: {author}

3.  **제목**: 보고서 정보 아래에, 원본 내용을 함축하는 '제목'을 만들어 '**'로 감싸 굵은 글씨로 표시해주세요. 이 제목은 보고서 내용과 분리된 한 줄이어야 합니다.

4.  **보고서 본문**: 제목 아래에 보고서의 본문을 작성해주세요. 본문은 개요, 주요 내용, 실행 계획 등의 체계적인 구조를 갖추어야 합니다.

## 추가 지시사항
{instructions}

## 원본 내용
---
{source}
---
",
        author = request.author,
        approval = request.approval_line,
        team = request.team_name,
        date = request.report_date,
        instructions = instructions,
        source = request.source_text,
    )
}

/// Prompt for regenerating a report with a revision comment.
pub fn refinement_prompt(request: &GenerateRequest, comment: &str) -> String {
    format!(
        "기존에 작성된 보고서가 있습니다. 아래의 수정 요청사항을 반영하여 보고서를 다시 작성해주십시오.

## 수정 요청사항
---
{comment}
---

## 보고서 재작성 가이드라인 (이 가이드라인을 반드시 따라서 수정해주세요)
아래의 구조와 정보를 사용하여 보고서 전체를 새로 생성해야 합니다.

1.  **결재란**: 보고서 최상단에 마크다운 테이블 형식의 결재란이 있어야 합니다. 첫 행은 직위/이름, 둘째 행은 빈 칸이어야 합니다.
    - 결재라인: {author}, {approval}

2.  **보고서 정보**: 각 항목이 한 줄을 차지하도록 명시해야 합니다.
    - 팀명: {team}
    - 일시: {date}
    - 작성자: {author}

3.  **제목**: '**'로 감싸진 굵은 글씨의 제목이 별도의 한 줄에 있어야 합니다.

4.  **보고서 본문**: 체계적인 구조(개요, 주요 내용 등)를 갖춘 본문이 와야 합니다.

## 원본 내용
---
{source}
---

최종 결과물은 위의 가이드라인과 수정 요청사항이 모두 반영된 완전한 형태의 보고서여야 합니다.
",
        comment = comment.trim(),
        author = request.author,
        approval = request.approval_line,
        team = request.team_name,
        date = request.report_date,
        source = request.source_text,
    )
}
