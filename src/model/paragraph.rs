//! Paragraph descriptors produced by reconstruction.

use serde::{Deserialize, Serialize};

/// One styled output paragraph, produced for exactly one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphDescriptor {
    /// Trimmed line text (empty for spacers)
    pub text: String,

    /// Whether the line was classified as a heading
    pub is_heading: bool,

    /// Left indent in twips, always a multiple of the indent unit
    pub indent_level: u32,

    /// Paragraph alignment
    pub alignment: Alignment,

    /// Spacing after the paragraph
    pub spacing_after: SpacingTier,
}

impl ParagraphDescriptor {
    /// Create a body paragraph with default styling.
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_heading: false,
            indent_level: 0,
            alignment: Alignment::Left,
            spacing_after: SpacingTier::Normal,
        }
    }

    /// Create a heading paragraph.
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            is_heading: true,
            spacing_after: SpacingTier::Heading,
            ..Self::body(text)
        }
    }

    /// Create the empty paragraph emitted for a blank line.
    pub fn spacer() -> Self {
        Self::body(String::new())
    }

    /// Whether this paragraph stands in for a blank line.
    pub fn is_spacer(&self) -> bool {
        self.text.is_empty()
    }

    /// Set the left indent in twips.
    pub fn with_indent(mut self, twips: u32) -> Self {
        self.indent_level = twips;
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        f.write_str(name)
    }
}

/// Spacing tier applied after a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingTier {
    /// Body text and spacers
    #[default]
    Normal,
    /// Headings get more room
    Heading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacer() {
        let s = ParagraphDescriptor::spacer();
        assert!(s.is_spacer());
        assert!(!s.is_heading);
        assert_eq!(s.spacing_after, SpacingTier::Normal);
        assert_eq!(s.alignment, Alignment::Left);
    }

    #[test]
    fn test_heading() {
        let h = ParagraphDescriptor::heading("INTRODUCTION");
        assert!(h.is_heading);
        assert_eq!(h.spacing_after, SpacingTier::Heading);
        assert!(!h.is_spacer());
    }

    #[test]
    fn test_serialized_names() {
        let p = ParagraphDescriptor::body("x")
            .with_alignment(Alignment::Center)
            .with_indent(480);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"alignment\":\"center\""));
        assert!(json.contains("\"spacing_after\":\"normal\""));
        assert!(json.contains("\"indent_level\":480"));
    }
}
