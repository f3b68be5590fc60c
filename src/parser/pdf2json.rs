//! Reader for pdf2json output.
//!
//! pdf2json describes a document as
//! `{ "Pages": [{ "Texts": [{ "x": .., "y": .., "R": [{ "T": "..." }] }] }], "Meta": {..} }`.
//! Older releases wrap the same object in `"formImage"`. Every `R` run
//! becomes one percent-encoded [`TextFragment`] at its text item's position.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::model::{parse_pdf_date, Metadata, PageText, SourceDocument, TextFragment};

#[derive(Debug, Default, Deserialize)]
struct RawRoot {
    #[serde(rename = "formImage")]
    form_image: Option<RawDocument>,

    #[serde(flatten)]
    document: RawDocument,
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(rename = "Pages", default)]
    pages: Vec<RawPage>,

    #[serde(rename = "Meta", default)]
    meta: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(rename = "Texts", default)]
    texts: Vec<RawText>,
}

#[derive(Debug, Default, Deserialize)]
struct RawText {
    #[serde(default)]
    x: Option<f64>,

    #[serde(default)]
    y: Option<f64>,

    #[serde(rename = "R", default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRun {
    #[serde(rename = "T", default)]
    text: Option<String>,
}

/// Parse pdf2json output from a string.
pub fn from_json_str(json: &str) -> Result<SourceDocument> {
    let root: RawRoot = serde_json::from_str(json)?;
    Ok(build(root))
}

/// Parse pdf2json output from bytes.
pub fn from_json_slice(data: &[u8]) -> Result<SourceDocument> {
    let root: RawRoot = serde_json::from_slice(strip_bom(data))?;
    Ok(build(root))
}

/// Parse pdf2json output from a reader.
pub fn from_reader<R: Read>(mut reader: R) -> Result<SourceDocument> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    from_json_slice(&data)
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

fn build(root: RawRoot) -> SourceDocument {
    let raw = match root.form_image {
        Some(inner) if root.document.pages.is_empty() => inner,
        _ => root.document,
    };

    let mut doc = SourceDocument::new();
    for (index, page) in raw.pages.into_iter().enumerate() {
        let mut page_text = PageText::new(index as u32 + 1);
        for item in page.texts {
            for run in item.runs {
                if let Some(text) = run.text {
                    page_text.push(TextFragment {
                        x: item.x,
                        y: item.y,
                        ..TextFragment::encoded(text)
                    });
                }
            }
        }
        doc.add_page(page_text);
    }

    let page_count = doc.metadata.page_count;
    doc.metadata = metadata_from_meta(&raw.meta);
    doc.metadata.page_count = page_count;

    log::debug!(
        "Read {} pages with {} fragments from pdf2json",
        doc.page_count(),
        doc.fragment_count()
    );
    doc
}

fn metadata_from_meta(meta: &HashMap<String, Value>) -> Metadata {
    let get = |key: &str| {
        meta.get(key).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    };

    Metadata {
        title: get("Title"),
        author: get("Author"),
        subject: get("Subject"),
        keywords: get("Keywords"),
        creator: get("Creator"),
        producer: get("Producer"),
        created: get("CreationDate").and_then(|d| parse_pdf_date(&d)),
        modified: get("ModDate").and_then(|d| parse_pdf_date(&d)),
        pdf_version: get("PDFFormatVersion").unwrap_or_default(),
        page_count: 0,
    }
}
