//! Outline classification for non-table lines.
//!
//! Korean official documents number their sections with four nested
//! conventions: `1.`, `가.`, `1)`, `가)`. Each line is tested against these
//! in that order and the first match decides its level.

use regex::Regex;

use super::ParseOptions;
use crate::model::{Block, OutlineLevel};

/// Classifies single lines into blocks.
#[derive(Debug, Clone)]
pub struct OutlineClassifier {
    patterns: Vec<(OutlineLevel, Regex)>,
    heading: Regex,
    options: ParseOptions,
}

impl OutlineClassifier {
    /// Create a classifier with the given options.
    pub fn new(options: ParseOptions) -> Self {
        // Constant patterns; compilation cannot fail.
        let patterns = vec![
            (OutlineLevel::Decimal, Regex::new(r"^(\d+\.)\s+(.*)$").unwrap()),
            (OutlineLevel::Syllable, Regex::new(r"^([가-힣]\.)\s+(.*)$").unwrap()),
            (OutlineLevel::DecimalParen, Regex::new(r"^(\d+\))\s+(.*)$").unwrap()),
            (OutlineLevel::SyllableParen, Regex::new(r"^([가-힣]\))\s+(.*)$").unwrap()),
        ];

        Self {
            patterns,
            heading: Regex::new(r"^#{1,6}\s+(.+)$").unwrap(),
            options,
        }
    }

    /// Match a line against the numbering patterns only.
    ///
    /// Returns the level, the marker and the remaining text.
    pub fn outline_level<'a>(&self, line: &'a str) -> Option<(OutlineLevel, &'a str, &'a str)> {
        let line = line.trim();
        self.patterns.iter().find_map(|(level, re)| {
            re.captures(line).map(|caps| {
                let marker = caps.get(1).map_or("", |m| m.as_str());
                let text = caps.get(2).map_or("", |m| m.as_str());
                (*level, marker, text.trim_end())
            })
        })
    }

    /// Classify a non-table line into a block.
    pub fn classify(&self, line: &str) -> Block {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Block::Spacer;
        }

        if self.options.is_title_marker(trimmed) {
            return Block::title(trimmed, true);
        }

        if let Some((level, marker, text)) = self.outline_level(trimmed) {
            return Block::outline(level, marker, text);
        }

        if self.options.detect_titles {
            if let Some(title) = bold_title(trimmed) {
                return Block::title(title, false);
            }
            if let Some(heading) = self.heading.captures(trimmed).and_then(|caps| caps.get(1)) {
                return Block::heading(heading.as_str().trim());
            }
        }

        if self.options.detect_list_items {
            if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                return Block::ListItem {
                    text: item.trim().to_string(),
                };
            }
        }

        Block::text(trimmed)
    }

}

/// Text of a line wholly wrapped in `**`.
fn bold_title(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("**")?.strip_suffix("**")?.trim();
    (!inner.is_empty() && !inner.contains("**")).then_some(inner)
}

impl Default for OutlineClassifier {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_of(line: &str) -> Option<OutlineLevel> {
        match OutlineClassifier::default().classify(line) {
            Block::OutlineLine { level, .. } => Some(level),
            _ => None,
        }
    }

    #[test]
    fn test_four_levels() {
        assert_eq!(level_of("1. 개요"), Some(OutlineLevel::Decimal));
        assert_eq!(level_of("가. 세부 내용 설명"), Some(OutlineLevel::Syllable));
        assert_eq!(level_of("1) 추진 배경"), Some(OutlineLevel::DecimalParen));
        assert_eq!(level_of("가) 세부 사항"), Some(OutlineLevel::SyllableParen));
        assert_eq!(level_of("12. 기타"), Some(OutlineLevel::Decimal));
    }

    #[test]
    fn test_syllable_line_keeps_marker_and_text() {
        let block = OutlineClassifier::default().classify("가. 세부 내용 설명");
        assert_eq!(
            block,
            Block::outline(OutlineLevel::Syllable, "가.", "세부 내용 설명")
        );
    }

    #[test]
    fn test_digit_dot_wins_over_digit_paren() {
        assert_eq!(level_of("1. 2) 항목"), Some(OutlineLevel::Decimal));
        assert_eq!(level_of("3. 가) 항목"), Some(OutlineLevel::Decimal));
    }

    #[test]
    fn test_non_matching_lines_are_paragraphs() {
        let classifier = OutlineClassifier::default();
        assert_eq!(classifier.classify("1.5배 증가"), Block::text("1.5배 증가"));
        assert_eq!(classifier.classify("가나. 두 글자"), Block::text("가나. 두 글자"));
        assert_eq!(classifier.classify("a. latin"), Block::text("a. latin"));
        assert_eq!(classifier.classify("1."), Block::text("1."));
    }

    #[test]
    fn test_leading_whitespace_ignored() {
        assert_eq!(level_of("    나. 들여쓴 줄"), Some(OutlineLevel::Syllable));
    }

    #[test]
    fn test_blank_line_is_spacer() {
        assert_eq!(OutlineClassifier::default().classify("   "), Block::Spacer);
    }

    #[test]
    fn test_title_marker() {
        let classifier = OutlineClassifier::default();
        assert_eq!(classifier.classify("  보 고 서 "), Block::title("보 고 서", true));
    }

    #[test]
    fn test_bold_titles_and_headings() {
        let classifier = OutlineClassifier::default();
        assert_eq!(
            classifier.classify("**2024년 업무 계획**"),
            Block::title("2024년 업무 계획", false)
        );
        assert_eq!(classifier.classify("## 개요"), Block::heading("개요"));
        assert_eq!(classifier.classify("****"), Block::text("****"));
    }

    #[test]
    fn test_list_items() {
        let classifier = OutlineClassifier::default();
        assert_eq!(
            classifier.classify("- 첫째 항목"),
            Block::ListItem {
                text: "첫째 항목".into()
            }
        );
        let strict = OutlineClassifier::new(ParseOptions::new().strict_outline());
        assert_eq!(strict.classify("- 첫째 항목"), Block::text("- 첫째 항목"));
        assert_eq!(strict.classify("**제목**"), Block::text("**제목**"));
    }
}
