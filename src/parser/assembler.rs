//! Report parser: merges segmenter, table and outline passes into a document.

use unicode_normalization::UnicodeNormalization;

use super::segmenter::{RawTable, Segment, TableSegmenter};
use super::table::{build_table, degrade, signature_split_point};
use super::{OutlineClassifier, ParseOptions};
use crate::model::{Block, Document};

/// Parser for the constrained report markdown dialect.
///
/// Parsing never fails: malformed tables degrade to paragraphs and
/// unmatched lines become plain text.
#[derive(Debug, Clone)]
pub struct ReportParser {
    options: ParseOptions,
    segmenter: TableSegmenter,
    classifier: OutlineClassifier,
}

impl ReportParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            segmenter: TableSegmenter::new(),
            classifier: OutlineClassifier::new(options.clone()),
            options,
        }
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse report text into a new document.
    pub fn parse(&self, text: &str) -> Document {
        let text = self.prepare(text);
        let mut blocks = Vec::new();
        let mut ordinal = 0;

        for segment in self.segmenter.segment(&text) {
            match segment {
                Segment::Line(line) => blocks.push(self.classifier.classify(line)),
                Segment::Table(raw) => {
                    ordinal = self.emit_table(raw, ordinal, &mut blocks);
                }
            }
        }

        log::debug!(
            "ReportParser: {} blocks, {} tables",
            blocks.len(),
            ordinal
        );

        Document::from_blocks(blocks)
    }

    /// Emit blocks for one raw table and return the next table ordinal.
    fn emit_table(&self, mut raw: RawTable, ordinal: usize, out: &mut Vec<Block>) -> usize {
        if !raw.is_valid() {
            out.extend(degrade(&raw));
            return ordinal;
        }

        if ordinal == 0 && self.options.split_signature_rows {
            if let Some(at) = signature_split_point(&raw) {
                let rest = raw.split_off(at);
                log::debug!(
                    "ReportParser: approval table closed after {} lines, {} lines carried over",
                    raw.line_count(),
                    rest.line_count()
                );
                out.push(Block::Table(build_table(&raw, ordinal)));
                // The approval block already supplied the header and divider,
                // so a single carried-over row still forms a table.
                if rest.data_row_count() == 0 {
                    out.extend(degrade(&rest));
                    return ordinal + 1;
                }
                out.push(Block::Table(build_table(&rest, ordinal + 1)));
                return ordinal + 2;
            }
        }

        out.push(Block::Table(build_table(&raw, ordinal)));
        ordinal + 1
    }

    fn prepare(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");
        if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}
