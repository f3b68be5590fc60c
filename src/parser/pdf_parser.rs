//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{parse_pdf_date, Metadata, PageText, SourceDocument, TextFragment};

use super::options::{ErrorMode, ParseOptions};

/// Vertical movement in points that starts a new text line.
const LINE_BREAK_POINTS: f32 = 1.0;

/// `TJ` adjustment (thousandths of an em) wide enough to be a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -200.0;

/// PDF points per pdf2json unit (1/4.5 inch).
const POINTS_PER_UNIT: f64 = 16.0;

/// PDF document parser.
///
/// Produces one [`PageText`] per page. The content stream is split into
/// lines wherever the text position moves vertically, and each line becomes
/// a plain fragment positioned in pdf2json units, so positional line mode
/// works on PDFs too.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        if !detect_format_from_path(path)?.is_pdf() {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load(path)?;
        Self::with_document(doc, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::with_document(doc, options)
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn with_document(doc: LopdfDocument, options: ParseOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Parse the document into pages of text fragments.
    pub fn parse(&self) -> Result<SourceDocument> {
        let mut document = SourceDocument::new();

        for (page_num, page_id) in self.doc.get_pages() {
            let page = self.parse_page(page_num, page_id)?;
            document.add_page(page);
        }

        let page_count = document.page_count();
        document.metadata = self.extract_metadata();
        document.metadata.page_count = page_count;

        log::debug!(
            "Parsed {} pages with {} fragments from PDF",
            page_count,
            document.fragment_count()
        );
        Ok(document)
    }

    /// Extract document metadata from the Info dictionary.
    fn extract_metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());

        let info_dict = self
            .doc
            .trailer
            .get(b"Info")
            .and_then(|info| info.as_reference())
            .and_then(|info_ref| self.doc.get_dictionary(info_ref));

        if let Ok(info_dict) = info_dict {
            metadata.title = get_string_from_dict(info_dict, b"Title");
            metadata.author = get_string_from_dict(info_dict, b"Author");
            metadata.subject = get_string_from_dict(info_dict, b"Subject");
            metadata.keywords = get_string_from_dict(info_dict, b"Keywords");
            metadata.creator = get_string_from_dict(info_dict, b"Creator");
            metadata.producer = get_string_from_dict(info_dict, b"Producer");
            metadata.created =
                get_string_from_dict(info_dict, b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified =
                get_string_from_dict(info_dict, b"ModDate").and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }

    /// Parse a single page.
    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<PageText> {
        let mut page = PageText::new(page_num);

        match self.extract_page_lines(page_id) {
            Ok(lines) => {
                for line in lines {
                    page.push(TextFragment::plain(line.text.trim()).at(
                        f64::from(line.x) / POINTS_PER_UNIT,
                        -f64::from(line.y) / POINTS_PER_UNIT,
                    ));
                }
            }
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(Error::TextExtract(format!("Page {}: {}", page_num, e)));
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }

        Ok(page)
    }

    /// Walk the page's content stream and collect its text lines.
    fn extract_page_lines(&self, page_id: ObjectId) -> Result<Vec<TextLine>> {
        let data = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&data)?;
        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();

        let mut lines = LineCollector::default();
        let mut font: Vec<u8> = Vec::new();

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => lines.begin_text(),
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        font = name.clone();
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(number) {
                        lines.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let (Some(tx), Some(ty)) = (number_at(operands, 0), number_at(operands, 1)) {
                        if op.operator == "TD" {
                            lines.leading = -ty;
                        }
                        lines.move_by(tx, ty);
                    }
                }
                "Tm" => {
                    if let (Some(e), Some(f)) = (number_at(operands, 4), number_at(operands, 5)) {
                        lines.set_origin(e, f);
                    }
                }
                "T*" => lines.next_line(),
                "Tj" | "'" | "\"" => {
                    if op.operator != "Tj" {
                        lines.next_line();
                    }
                    if let Some(Object::String(bytes, _)) = operands.last() {
                        lines.show(&self.decode_text(&fonts, &font, bytes));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    lines.show(&self.decode_text(&fonts, &font, bytes))
                                }
                                other => {
                                    if number(other).is_some_and(|n| n <= WORD_GAP_ADJUSTMENT) {
                                        lines.word_gap();
                                    }
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(lines.finish())
    }

    /// Decode a shown string with the current font's encoding.
    fn decode_text(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        bytes: &[u8],
    ) -> String {
        fonts
            .get(font)
            .and_then(|dict| dict.get_font_encoding(&self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .or_else(|| decode_pdf_string(bytes))
            .unwrap_or_default()
    }
}

/// A text line recovered from a content stream, in PDF user space.
#[derive(Debug, Default)]
struct TextLine {
    text: String,
    x: f32,
    y: f32,
}

/// Groups shown strings into lines by their text position.
#[derive(Debug, Default)]
struct LineCollector {
    lines: Vec<TextLine>,
    current: TextLine,
    /// Start of the current text line
    origin: (f32, f32),
    leading: f32,
    moved: bool,
}

impl LineCollector {
    fn begin_text(&mut self) {
        self.set_origin(0.0, 0.0);
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
        self.moved = true;
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.set_origin(self.origin.0 + tx, self.origin.1 + ty);
    }

    fn next_line(&mut self) {
        self.move_by(0.0, -self.leading);
    }

    fn show(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let (x, y) = self.origin;
        if !self.current.text.is_empty() && (y - self.current.y).abs() >= LINE_BREAK_POINTS {
            self.break_line();
        }

        if self.current.text.is_empty() {
            self.current.x = x;
            self.current.y = y;
        } else if self.moved {
            self.word_gap();
        }

        self.moved = false;
        self.current.text.push_str(text);
    }

    fn word_gap(&mut self) {
        if !self.current.text.is_empty() && !self.current.text.ends_with(char::is_whitespace) {
            self.current.text.push(' ');
        }
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        if !line.text.trim().is_empty() {
            self.lines.push(line);
        }
    }

    fn finish(mut self) -> Vec<TextLine> {
        self.break_line();
        self.lines
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn number_at(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(number)
}

fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    };
    value.filter(|s| !s.is_empty())
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).ok();
    }

    Some(
        String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect()),
    )
}
