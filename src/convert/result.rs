//! Conversion result and extraction details.

use serde::{Deserialize, Serialize};

use crate::model::{Metadata, ParagraphDescriptor};
use crate::reconstruct::Reconstruction;

/// Summary of what was extracted from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDetails {
    /// Number of source pages
    pub pages_processed: u32,

    /// Length of the extracted text in characters
    pub total_text_length: usize,

    /// Whether the source carried descriptive metadata
    pub has_metadata: bool,

    /// Number of paragraphs written, spacers included
    pub paragraph_count: usize,

    /// Number of heading paragraphs
    pub heading_count: usize,

    /// Number of fragments dropped because they could not be decoded
    pub skipped_fragments: usize,
}

impl ExtractionDetails {
    /// Collect details from a reconstruction.
    pub fn from_reconstruction(reconstruction: &Reconstruction, metadata: &Metadata) -> Self {
        Self {
            pages_processed: reconstruction.page_count,
            total_text_length: reconstruction.text.chars().count(),
            has_metadata: metadata.has_metadata(),
            paragraph_count: reconstruction.paragraphs.len(),
            heading_count: reconstruction.heading_count(),
            skipped_fragments: reconstruction.skipped_fragments.len(),
        }
    }
}

/// Result of converting one input into a Word document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The DOCX package
    pub docx: Vec<u8>,

    /// Suggested output file name
    pub file_name: String,

    /// Normalized text the document was built from
    pub extracted_text: String,

    /// Paragraphs written to the document
    pub paragraphs: Vec<ParagraphDescriptor>,

    /// Extraction summary
    pub details: ExtractionDetails,

    /// Source document metadata
    pub metadata: Metadata,
}

impl ConvertResult {
    /// Size of the DOCX package in bytes.
    pub fn file_size(&self) -> usize {
        self.docx.len()
    }
}
