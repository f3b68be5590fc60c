//! # pdf2docx
//!
//! Rebuild the text of a PDF into styled Word paragraphs.
//!
//! A parser delivers pages of positioned text fragments (from pdf2json
//! output or straight from a PDF). The reconstructor flattens and
//! normalizes that text, splits it into lines and classifies each line as
//! heading or body with an indent and an alignment. The DOCX renderer then
//! writes one Word paragraph per line.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2docx::convert_file;
//!
//! fn main() -> pdf2docx::Result<()> {
//!     let result = convert_file("report.pdf")?;
//!     std::fs::write(&result.file_name, &result.docx)?;
//!     println!("{} paragraphs", result.details.paragraph_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Reconstruction only
//!
//! ```
//! use pdf2docx::reconstruct_json;
//!
//! let json = r#"{"Pages": [{"Texts": [{"R": [{"T": "CHAPTER%20ONE"}]}]}]}"#;
//! let result = reconstruct_json(json)?;
//! assert!(result.paragraphs[0].is_heading);
//! # Ok::<(), pdf2docx::Error>(())
//! ```

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod reconstruct;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert_batch, convert_batch_with_progress, ConvertOptions, ConvertResult, ConverterRegistry,
    DocumentConverter, ExtractionDetails,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use model::{
    Alignment, FragmentEncoding, Metadata, PageText, ParagraphDescriptor, SourceDocument,
    SpacingTier, TextFragment,
};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use reconstruct::{LineMode, ReconstructOptions, Reconstruction, Reconstructor};
pub use render::{DocxOptions, DocxRenderer, JsonFormat};

use std::path::Path;

/// Reconstruct paragraphs from pages with default options.
///
/// # Example
///
/// ```
/// use pdf2docx::{reconstruct, PageText, TextFragment};
///
/// let pages = vec![
///     PageText::with_fragments(1, vec![TextFragment::encoded("Hello")]),
///     PageText::with_fragments(2, vec![TextFragment::encoded("World")]),
/// ];
/// let paragraphs = reconstruct(&pages)?;
/// assert_eq!(paragraphs.len(), 3);
/// # Ok::<(), pdf2docx::Error>(())
/// ```
pub fn reconstruct(pages: &[PageText]) -> Result<Vec<ParagraphDescriptor>> {
    Reconstructor::default()
        .reconstruct(pages)
        .map(|r| r.paragraphs)
}

/// Reconstruct paragraphs from pdf2json output.
pub fn reconstruct_json(json: &str) -> Result<Reconstruction> {
    let source = parser::pdf2json::from_json_str(json)?;
    Reconstructor::default().reconstruct_document(&source)
}

/// Parse an input (PDF or pdf2json) from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<SourceDocument> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse an input (PDF or pdf2json) from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<SourceDocument> {
    match detect_format_from_bytes(data)? {
        InputFormat::Pdf { .. } => PdfParser::from_bytes_with_options(data, options)?.parse(),
        InputFormat::Pdf2Json => parser::pdf2json::from_json_slice(data),
    }
}

/// Parse an input file (PDF or pdf2json).
///
/// # Example
///
/// ```no_run
/// use pdf2docx::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    let data = std::fs::read(path)?;
    parse_bytes(&data)
}

/// Convert a file to a Word document with default options.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    ConverterRegistry::global().convert(path.as_ref(), &ConvertOptions::default())
}

/// Convert input bytes to a Word document, sniffing the input format.
///
/// `file_name` only names the output.
pub fn convert_bytes(data: &[u8], file_name: &str) -> Result<ConvertResult> {
    ConverterRegistry::global().convert_sniffed(data, file_name, &ConvertOptions::default())
}

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```no_run
/// use pdf2docx::Pdf2Docx;
///
/// let result = Pdf2Docx::new()
///     .strict()
///     .positional()
///     .with_font("Georgia")
///     .convert_file("document.json")?;
/// std::fs::write(&result.file_name, &result.docx)?;
/// # Ok::<(), pdf2docx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdf2Docx {
    options: ConvertOptions,
}

impl Pdf2Docx {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from existing conversion options.
    pub fn from_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Fail on malformed fragments and unreadable pages.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Rebuild lines from fragment positions.
    pub fn positional(mut self) -> Self {
        self.options.reconstruct = self.options.reconstruct.positional();
        self
    }

    /// Set reconstruction options.
    pub fn with_reconstruct_options(mut self, options: ReconstructOptions) -> Self {
        self.options = self.options.with_reconstruct_options(options);
        self
    }

    /// Set output document options.
    pub fn with_docx_options(mut self, options: DocxOptions) -> Self {
        self.options = self.options.with_docx_options(options);
        self
    }

    /// Set the document font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.options.docx = self.options.docx.with_font(font);
        self
    }

    /// Set the input size limit in bytes (0 = unlimited).
    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.options = self.options.with_max_input_bytes(max);
        self
    }

    /// Get the configured options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        ConverterRegistry::global().convert(path.as_ref(), &self.options)
    }

    /// Convert input bytes, sniffing the format.
    pub fn convert_bytes(&self, data: &[u8], file_name: &str) -> Result<ConvertResult> {
        ConverterRegistry::global().convert_sniffed(data, file_name, &self.options)
    }

    /// Reconstruct paragraphs from a file without rendering.
    pub fn reconstruct_file<P: AsRef<Path>>(&self, path: P) -> Result<Reconstruction> {
        let data = std::fs::read(path)?;
        self.options.validate_input(&data)?;
        let source = parse_bytes_with_options(&data, self.options.parse.clone())?;
        Reconstructor::new(self.options.reconstruct.clone()).reconstruct_document(&source)
    }
}
