//! Reconstruction options.
//!
//! The numeric defaults are fixed heuristic constants, not measured values.

use serde::{Deserialize, Serialize};

use crate::parser::ErrorMode;

/// How fragments on a page are joined into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// Join every fragment of a page with a single space
    #[default]
    Flow,
    /// Start a new line when the vertical offset changes, and indent it
    /// from the horizontal offset
    Positional,
}

/// Options for the text reconstructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructOptions {
    /// What to do with fragments that fail to decode
    pub error_mode: ErrorMode,

    /// Line building strategy
    pub line_mode: LineMode,

    /// Vertical distance (parser units) that starts a new line in positional mode
    pub y_tolerance: f64,

    /// Width of one text column (parser units) in positional mode
    pub char_width: f64,

    /// Upper bound on the leading columns a positioned line can get
    pub max_indent_columns: usize,

    /// Apply Unicode NFC normalization to decoded text
    pub normalize_unicode: bool,

    /// Spaces a tab counts for in leading whitespace
    pub tab_width: usize,

    /// Headings must be shorter than this many characters
    pub heading_max_len: usize,

    /// Minimum length of an all-caps line matched by the caps pattern
    pub min_caps_run: usize,

    /// Leading characters per indent step
    pub indent_chars: usize,

    /// Width of one indent step in twips
    pub indent_unit_twips: u32,

    /// Centered lines must be shorter than this many characters
    pub center_max_len: usize,

    /// Centered lines need more leading whitespace than this
    pub center_min_indent: usize,

    /// Right-aligned lines need more leading whitespace than this
    pub right_min_indent: usize,
}

impl ReconstructOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first malformed fragment.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set line mode.
    pub fn with_line_mode(mut self, mode: LineMode) -> Self {
        self.line_mode = mode;
        self
    }

    /// Use fragment positions to rebuild lines.
    pub fn positional(mut self) -> Self {
        self.line_mode = LineMode::Positional;
        self
    }

    /// Cap the leading columns of positioned lines.
    pub fn with_max_indent_columns(mut self, columns: usize) -> Self {
        self.max_indent_columns = columns;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Set the heading length cutoff.
    pub fn with_heading_max_len(mut self, len: usize) -> Self {
        self.heading_max_len = len;
        self
    }

    /// Set the indent step: `chars` leading characters map to `twips`.
    pub fn with_indent_unit(mut self, chars: usize, twips: u32) -> Self {
        self.indent_chars = chars.max(1);
        self.indent_unit_twips = twips;
        self
    }

    /// Set the alignment thresholds.
    pub fn with_alignment_thresholds(
        mut self,
        center_max_len: usize,
        center_min_indent: usize,
        right_min_indent: usize,
    ) -> Self {
        self.center_max_len = center_max_len;
        self.center_min_indent = center_min_indent;
        self.right_min_indent = right_min_indent;
        self
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            line_mode: LineMode::Flow,
            // pdf2json measures in 1/4.5 inch: 0.3 is under half a 12pt line,
            // 0.45 is one 12pt monospace column
            y_tolerance: 0.3,
            char_width: 0.45,
            max_indent_columns: 240,
            normalize_unicode: true,
            tab_width: 4,
            heading_max_len: 100,
            min_caps_run: 3,
            indent_chars: 4,
            indent_unit_twips: 240,
            center_max_len: 50,
            center_min_indent: 20,
            right_min_indent: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReconstructOptions::default();
        assert_eq!(options.heading_max_len, 100);
        assert_eq!(options.indent_chars, 4);
        assert_eq!(options.indent_unit_twips, 240);
        assert_eq!(options.center_max_len, 50);
        assert_eq!(options.center_min_indent, 20);
        assert_eq!(options.right_min_indent, 40);
        assert_eq!(options.line_mode, LineMode::Flow);
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.max_indent_columns > options.right_min_indent);
    }

    #[test]
    fn test_builder() {
        let options = ReconstructOptions::new()
            .strict()
            .positional()
            .with_indent_unit(0, 360)
            .with_alignment_thresholds(60, 10, 30);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.line_mode, LineMode::Positional);
        assert_eq!(options.indent_chars, 1);
        assert_eq!(options.indent_unit_twips, 360);
        assert_eq!(options.right_min_indent, 30);
    }

    #[test]
    fn test_partial_config_file() {
        let options: ReconstructOptions =
            serde_json::from_str(r#"{"heading_max_len": 80, "line_mode": "positional"}"#).unwrap();
        assert_eq!(options.heading_max_len, 80);
        assert_eq!(options.line_mode, LineMode::Positional);
        assert_eq!(options.indent_unit_twips, 240);
    }
}
