//! Upstream parsers turning input files into pages of text fragments.

mod options;
pub mod pdf2json;
mod pdf_parser;

pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
