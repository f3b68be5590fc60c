//! Text reconstruction: from positioned page fragments to styled paragraphs.
//!
//! The pipeline runs in four steps over one request's data:
//!
//! 1. **Flatten** decodes fragments and joins them page by page.
//! 2. **Normalize** collapses whitespace and blank-line runs.
//! 3. **Split** breaks the buffer into raw lines.
//! 4. **Classify** turns every raw line into one [`ParagraphDescriptor`].
//!
//! # Example
//!
//! ```
//! use pdf2docx::model::{PageText, TextFragment};
//! use pdf2docx::reconstruct::Reconstructor;
//!
//! let pages = vec![
//!     PageText::with_fragments(1, vec![TextFragment::encoded("CHAPTER%20ONE")]),
//!     PageText::with_fragments(2, vec![TextFragment::encoded("It%20begins.")]),
//! ];
//!
//! let result = Reconstructor::default().reconstruct(&pages)?;
//! assert_eq!(result.paragraphs.len(), 3);
//! assert!(result.paragraphs[0].is_heading);
//! assert!(result.paragraphs[1].is_spacer());
//! # Ok::<(), pdf2docx::Error>(())
//! ```

mod classify;
mod flatten;
mod normalize;
mod options;

pub use classify::{leading_whitespace, LineClassifier};
pub use flatten::{decode_fragment, decode_percent, flatten, FragmentIssue, Flattened, PAGE_BREAK};
pub use normalize::{normalize, split_lines};
pub use options::{LineMode, ReconstructOptions};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{PageText, ParagraphDescriptor, SourceDocument};

/// Output of a reconstruction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconstruction {
    /// One descriptor per raw line, in order
    pub paragraphs: Vec<ParagraphDescriptor>,

    /// The normalized text buffer the paragraphs were split from
    pub text: String,

    /// Number of input pages
    pub page_count: u32,

    /// Fragments dropped in lenient mode
    pub skipped_fragments: Vec<FragmentIssue>,
}

impl Reconstruction {
    /// Number of headings.
    pub fn heading_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_heading).count()
    }

    /// Number of paragraphs with text.
    pub fn text_paragraph_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| !p.is_spacer()).count()
    }
}

/// Rebuilds paragraph structure from page fragments.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    options: ReconstructOptions,
    classifier: LineClassifier,
}

impl Reconstructor {
    /// Create a reconstructor with the given options.
    pub fn new(options: ReconstructOptions) -> Self {
        let classifier = LineClassifier::new(&options);
        Self {
            options,
            classifier,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ReconstructOptions {
        &self.options
    }

    /// Reconstruct paragraphs from pages.
    ///
    /// Fails with [`Error::EmptyContent`] when there are no pages, no
    /// fragments, or nothing but whitespace after normalization.
    pub fn reconstruct(&self, pages: &[PageText]) -> Result<Reconstruction> {
        let flattened = flatten(pages, &self.options)?;
        let text = normalize(&flattened.buffer, self.options.tab_width);

        if text.trim().is_empty() {
            return Err(Error::EmptyContent);
        }

        let paragraphs = self.classify_text(&text);
        log::debug!(
            "Reconstructed {} paragraphs from {} pages",
            paragraphs.len(),
            pages.len()
        );

        Ok(Reconstruction {
            paragraphs,
            text,
            page_count: pages.len() as u32,
            skipped_fragments: flattened.skipped,
        })
    }

    /// Reconstruct paragraphs from a parsed document.
    pub fn reconstruct_document(&self, doc: &SourceDocument) -> Result<Reconstruction> {
        self.reconstruct(&doc.pages)
    }

    /// Split an already normalized buffer and classify each line.
    pub fn classify_text(&self, text: &str) -> Vec<ParagraphDescriptor> {
        split_lines(text)
            .into_iter()
            .map(|line| self.classifier.classify(line))
            .collect()
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new(ReconstructOptions::default())
    }
}
