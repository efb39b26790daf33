//! Rendering module for turning report documents into markup and text.

pub mod html;
mod json;
mod options;
pub mod page;
mod result;
mod text;
pub mod visitor;

pub use html::{escape_html, to_html, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, Theme};
pub use page::screen_page;
pub use result::{RenderStats, RenderedReport};
pub use text::{to_text, TextRenderer};
pub use visitor::{
    walk, BlockWriter, CompositeVisitor, DefaultVisitor, DocumentVisitor, SkipSpacersVisitor,
    VisitorAction,
};
