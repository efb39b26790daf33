//! Rendering options and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display theme for screen rendering.
///
/// Print and export output ignore the theme and always render light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background
    #[default]
    Light,
    /// Light text on a dark background
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Lowercase name, also used as the root CSS class.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Options for rendering a document to markup.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Indentation per outline level, in em
    pub indent_step_em: f32,

    /// Letter spacing of the title marker heading, in em
    pub title_letter_spacing_em: f32,

    /// Approval signature cell width, in millimetres
    pub signature_cell_width_mm: u32,

    /// Approval signature cell height, in millimetres
    pub signature_cell_height_mm: u32,

    /// Width of the label column in metadata tables, in percent
    pub label_column_percent: u32,

    /// Collapse spacer blocks in plain text output
    pub collapse_spacers: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation per outline level.
    pub fn with_indent_step(mut self, em: f32) -> Self {
        self.indent_step_em = em.max(0.0);
        self
    }

    /// Set the signature cell size.
    pub fn with_signature_cell(mut self, width_mm: u32, height_mm: u32) -> Self {
        self.signature_cell_width_mm = width_mm.max(1);
        self.signature_cell_height_mm = height_mm.max(1);
        self
    }

    /// Enable or disable spacer collapsing in text output.
    pub fn with_collapsed_spacers(mut self, collapse: bool) -> Self {
        self.collapse_spacers = collapse;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_step_em: 2.0,
            title_letter_spacing_em: 0.5,
            signature_cell_width_mm: 24,
            signature_cell_height_mm: 20,
            label_column_percent: 25,
            collapse_spacers: false,
        }
    }
}
