//! Document model types for rendered report content.
//!
//! This module defines the intermediate representation that bridges the
//! report parser and every serializer. A [`Document`] is built once per
//! generated (or refined) report text and is never mutated afterwards;
//! screen rendering and all exports read the same structure.

mod block;
mod document;
mod table;

pub use block::{Block, OutlineLevel};
pub use document::{Document, ReportInfo};
pub use table::{split_line_breaks, Table, TableCell, TableKind, TableRow};
