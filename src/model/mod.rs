//! Document model types.
//!
//! Two ends of the conversion meet here: the page/fragment structure that
//! parsers deliver, and the paragraph descriptors that reconstruction hands
//! to the document generator.

mod document;
mod paragraph;
mod source;

pub use document::{Metadata, SourceDocument};
pub(crate) use document::parse_pdf_date;
pub use paragraph::{Alignment, ParagraphDescriptor, SpacingTier};
pub use source::{FragmentEncoding, PageText, TextFragment};
