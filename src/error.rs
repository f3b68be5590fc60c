//! Error types for pdf2docx.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting PDF text to Word.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No input bytes were supplied.
    #[error("No file uploaded")]
    NoInput,

    /// The input exceeds the configured size limit.
    #[error("File size too large: {size} bytes (limit is {max} bytes)")]
    TooLarge {
        /// Input size in bytes
        size: usize,
        /// Configured limit in bytes
        max: usize,
    },

    /// The input is neither a PDF nor pdf2json output.
    #[error("Invalid file type: not a PDF document")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// A text fragment could not be decoded.
    #[error("Malformed text fragment {fragment} on page {page}: {reason}")]
    MalformedFragment {
        /// Page number (1-indexed)
        page: u32,
        /// Fragment index within the page (0-indexed)
        fragment: usize,
        /// Why decoding failed
        reason: String,
    },

    /// Nothing readable was left after reconstruction.
    #[error("No text content found in the PDF file. The PDF might be image-based or encrypted.")]
    EmptyContent,

    /// pdf2json input could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while producing the output document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error describes bad input rather than an internal failure.
    ///
    /// The web route this library backs answers these with a 400.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoInput
                | Error::TooLarge { .. }
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::Encrypted
                | Error::EmptyContent
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
