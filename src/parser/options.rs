//! Parsing options and configuration.

/// Default title marker phrases.
pub const DEFAULT_TITLE_MARKERS: [&str; 2] = ["보 고 서", "보고서"];

/// Options for parsing generated report text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Lines equal to one of these phrases become the centered report title
    pub title_markers: Vec<String>,

    /// Normalize input to Unicode NFC before parsing
    pub normalize_unicode: bool,

    /// Close the approval table at the first filled row after its blank
    /// signature rows
    pub split_signature_rows: bool,

    /// Treat `**Title**` and `#` heading lines as titles
    pub detect_titles: bool,

    /// Treat `- ` and `* ` lines as list items
    pub detect_list_items: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title marker phrases.
    pub fn with_title_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.title_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable signature-row splitting of the approval table.
    pub fn with_signature_split(mut self, split: bool) -> Self {
        self.split_signature_rows = split;
        self
    }

    /// Disable markdown title and list detection (outline patterns only).
    pub fn strict_outline(mut self) -> Self {
        self.detect_titles = false;
        self.detect_list_items = false;
        self
    }

    /// Check whether a trimmed line is a title marker.
    pub fn is_title_marker(&self, line: &str) -> bool {
        self.title_markers.iter().any(|m| m == line)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            title_markers: DEFAULT_TITLE_MARKERS.iter().map(|s| s.to_string()).collect(),
            normalize_unicode: true,
            split_signature_rows: true,
            detect_titles: true,
            detect_list_items: true,
        }
    }
}
