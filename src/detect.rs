//! Input format detection.
//!
//! Conversion accepts either a PDF file or the JSON that pdf2json emits for
//! one. Both are recognized from their first bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const SNIFF_LEN: usize = 64;

/// Recognized input format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// A PDF file with its header version (e.g., "1.7")
    Pdf {
        /// PDF version from the header
        version: String,
    },
    /// pdf2json output
    Pdf2Json,
}

impl InputFormat {
    /// Whether this is a PDF file.
    pub fn is_pdf(&self) -> bool {
        matches!(self, InputFormat::Pdf { .. })
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Pdf { version } => write!(f, "PDF {}", version),
            InputFormat::Pdf2Json => write!(f, "pdf2json"),
        }
    }
}

/// Detect the input format from a file path.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the input format from the leading bytes of the input.
///
/// # Returns
/// * `Ok(InputFormat::Pdf)` if the data starts with a valid PDF header
/// * `Ok(InputFormat::Pdf2Json)` if the data is a JSON object
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.starts_with(PDF_MAGIC) {
        return detect_pdf_version(data);
    }

    let first = data
        .iter()
        .find(|b| !(matches!(b, 0xEF | 0xBB | 0xBF) || b.is_ascii_whitespace()));
    match first {
        Some(b'{') => Ok(InputFormat::Pdf2Json),
        _ => Err(Error::UnknownFormat),
    }
}

fn detect_pdf_version(data: &[u8]) -> Result<InputFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(InputFormat::Pdf { version })
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::Pdf { .. }))
}
