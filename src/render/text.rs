//! Plain text rendering of paragraph descriptors.

use crate::model::ParagraphDescriptor;

/// Join paragraph texts with line breaks; spacers become blank lines.
pub fn to_text(paragraphs: &[ParagraphDescriptor]) -> String {
    paragraphs
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
