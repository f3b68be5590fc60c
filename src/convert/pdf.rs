//! Built-in converters for PDF files and pdf2json output.

use crate::detect::InputFormat;
use crate::error::{Error, Result};
use crate::parser::{pdf2json, PdfParser};

use super::{convert_source, ConvertOptions, ConvertResult, DocumentConverter};

/// Converts PDF files to Word documents.
#[derive(Debug, Clone, Default)]
pub struct PdfToWordConverter {
    _private: (),
}

impl PdfToWordConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfToWordConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        if !options.validate_input(bytes)?.is_pdf() {
            return Err(Error::UnknownFormat);
        }

        let parser = PdfParser::from_bytes_with_options(bytes, options.parse.clone())?;
        let source = parser.parse()?;
        convert_source(&source, file_name, options)
    }
}

/// Converts pdf2json output to Word documents.
#[derive(Debug, Clone, Default)]
pub struct Pdf2JsonConverter {
    _private: (),
}

impl Pdf2JsonConverter {
    /// Create a new pdf2json converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for Pdf2JsonConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "pdf2json"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        if options.validate_input(bytes)? != InputFormat::Pdf2Json {
            return Err(Error::UnknownFormat);
        }

        let source = pdf2json::from_json_slice(bytes)?;
        convert_source(&source, file_name, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_converter_extensions() {
        let converter = PdfToWordConverter::new();
        assert_eq!(converter.supported_extensions(), &["pdf"]);
        assert!(converter.supports_extension("PDF"));
        assert!(!converter.supports_extension("docx"));
        assert_eq!(converter.name(), "pdf");
    }

    #[test]
    fn test_pdf_converter_rejects_json() {
        let result =
            PdfToWordConverter::new().convert_bytes(b"{}", "x.pdf", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_pdf2json_converter() {
        let json = br#"{"Pages": [{"Texts": [{"R": [{"T": "INTRODUCTION"}]}, {"R": [{"T": "Some%20text."}]}]}]}"#;
        let result = Pdf2JsonConverter::new()
            .convert_bytes(json, "paper.json", &ConvertOptions::default())
            .unwrap();

        assert_eq!(result.file_name, "paper_converted.docx");
        assert_eq!(result.extracted_text, "INTRODUCTION Some text.");
        assert_eq!(result.details.pages_processed, 1);
        assert!(result.docx.starts_with(b"PK"));
    }

    #[test]
    fn test_pdf2json_converter_empty_pages() {
        let result = Pdf2JsonConverter::new().convert_bytes(
            br#"{"Pages": [{"Texts": []}]}"#,
            "empty.json",
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(Error::EmptyContent)));
    }
}
