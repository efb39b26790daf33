//! Report text parsing module.
//!
//! Parsing runs in one ordered pass: the segmenter groups table lines, the
//! table pass assigns kinds by position, and the outline classifier tags
//! every remaining line.

mod assembler;
mod options;
mod outline;
pub mod segmenter;
pub mod table;

pub use assembler::ReportParser;
pub use options::{ParseOptions, DEFAULT_TITLE_MARKERS};
pub use outline::OutlineClassifier;
pub use segmenter::{RawLine, RawTable, Segment, TableSegmenter};
