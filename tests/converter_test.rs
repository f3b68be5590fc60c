//! Integration tests for the converter module.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pdf2docx::convert::{
    convert_batch, convert_batch_with_progress, convert_source, ConvertOptions, ConvertResult,
    ConverterRegistry, DocumentConverter,
};
use pdf2docx::error::{Error, Result};
use pdf2docx::{DocxOptions, PageText, Pdf2Docx, SourceDocument, TextFragment};

const SAMPLE_JSON: &str = r#"{
    "Pages": [
        {"Texts": [
            {"x": 2.0, "y": 1.0, "R": [{"T": "INTRODUCTION"}]},
            {"x": 2.0, "y": 2.0, "R": [{"T": "The%20quick%20brown%20fox."}]}
        ]},
        {"Texts": [
            {"x": 2.0, "y": 1.0, "R": [{"T": "1.%20Details"}]}
        ]}
    ],
    "Meta": {"Title": "Sample", "Author": "Jane Doe"}
}"#;

/// Mock converter for testing.
struct MockConverter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockConverter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl DocumentConverter for MockConverter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let text = String::from_utf8_lossy(bytes);
        let page = PageText::with_fragments(1, text.lines().map(TextFragment::plain).collect());
        convert_source(&SourceDocument::from_pages(vec![page]), file_name, options)
    }
}

fn package_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Splits `word/document.xml` into paragraph chunks plus the trailing
/// section properties.
fn paragraph_chunks(xml: &str) -> Vec<&str> {
    xml.split("</w:p>").collect()
}

fn is_bold(chunk: &str) -> bool {
    chunk.contains("<w:b />") || chunk.contains("<w:b/>")
}

fn write_sample(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_converter_registry_new() {
    let registry = ConverterRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("pdf"));
    assert!(!registry.supports("json"));
    assert!(registry.supported_extensions().is_empty());
}

#[test]
fn test_converter_registry_register() {
    let mut registry = ConverterRegistry::new();
    let converter = Arc::new(MockConverter::new(vec!["txt", "text"], "text"));
    registry.register(converter);

    assert!(registry.supports("txt"));
    assert!(registry.supports("TEXT"));
    assert!(registry.get_by_name("text").is_some());
    assert!(registry.get_by_name("pdf").is_none());
}

#[test]
fn test_custom_converter_output() {
    let mut registry = ConverterRegistry::new();
    registry.register(Arc::new(MockConverter::new(vec!["txt"], "text")));

    let result = registry
        .convert_bytes(
            b"SUMMARY\nplain body",
            "txt",
            "notes.txt",
            &ConvertOptions::default(),
        )
        .unwrap();

    assert_eq!(result.file_name, "notes_converted.docx");
    assert_eq!(result.extracted_text, "SUMMARY plain body");
}

#[test]
fn test_unknown_extension() {
    let registry = ConverterRegistry::with_defaults();
    let result = registry.convert_bytes(b"data", "xlsx", "a.xlsx", &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Other(_))));
}

#[test]
fn test_pdf2json_to_docx() {
    let result = pdf2docx::convert_bytes(SAMPLE_JSON.as_bytes(), "sample.json").unwrap();

    assert_eq!(result.file_name, "sample_converted.docx");
    assert_eq!(result.details.pages_processed, 2);
    assert_eq!(result.details.paragraph_count, 3);
    assert_eq!(result.details.heading_count, 1);
    assert!(result.details.has_metadata);
    assert_eq!(result.metadata.title.as_deref(), Some("Sample"));

    let xml = package_part(&result.docx, "word/document.xml");
    assert!(xml.contains("INTRODUCTION The quick brown fox."));
    assert!(xml.contains("1. Details"));

    let styles = package_part(&result.docx, "word/styles.xml");
    assert!(styles.contains("Times New Roman"));
}

#[test]
fn test_docx_paragraph_styling() {
    let caption = format!("{}Figure%201", "%20".repeat(24));
    let json = format!(
        r#"{{"Pages": [{{"Texts": [{{"R": [{{"T": "CHAPTER%20ONE%0A%0A{}"}}]}}]}}]}}"#,
        caption
    );
    let result = pdf2docx::convert_bytes(json.as_bytes(), "styled.json").unwrap();

    let texts: Vec<&str> = result.paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["CHAPTER ONE", "", "Figure 1"]);

    let xml = package_part(&result.docx, "word/document.xml");
    let chunks = paragraph_chunks(&xml);
    assert_eq!(chunks.len(), 4);

    let heading = chunks[0];
    assert!(heading.contains("CHAPTER ONE"));
    assert!(is_bold(heading));
    assert!(heading.contains(r#"w:sz w:val="26""#));
    assert!(heading.contains(r#"w:after="240""#));
    assert!(heading.contains(r#"w:jc w:val="left""#));

    let spacer = chunks[1];
    assert!(!is_bold(spacer));
    assert!(spacer.contains(r#"w:after="120""#));

    let centered = chunks[2];
    assert!(centered.contains("Figure 1"));
    assert!(!is_bold(centered));
    assert!(centered.contains(r#"w:sz w:val="24""#));
    assert!(centered.contains(r#"w:after="120""#));
    assert!(centered.contains(r#"w:jc w:val="center""#));
    assert!(centered.contains(r#"w:left="1440""#));

    let section = chunks[3];
    assert!(section.contains(r#"w:w="12240""#));
    assert!(section.contains(r#"w:h="15840""#));
    assert!(section.contains(r#"w:left="1440""#));
}

#[test]
fn test_far_offset_is_clamped() {
    let json = r#"{"Pages":[{"Texts":[{"x":0,"y":1,"R":[{"T":"a"}]},{"x":1e11,"y":5,"R":[{"T":"b"}]}]}]}"#;
    let result = Pdf2Docx::new()
        .positional()
        .convert_bytes(json.as_bytes(), "far.json")
        .unwrap();

    let texts: Vec<&str> = result.paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b"]);
    // 240 columns at most, 4 per indent step
    assert_eq!(result.paragraphs[1].indent_level, 60 * 240);
}

#[test]
fn test_positional_layout_docx() {
    let result = Pdf2Docx::new()
        .positional()
        .convert_bytes(SAMPLE_JSON.as_bytes(), "sample.json")
        .unwrap();

    let texts: Vec<&str> = result.paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["INTRODUCTION", "The quick brown fox.", "", "1. Details"]
    );
    assert!(result.paragraphs[0].is_heading);
    assert!(result.paragraphs[3].is_heading);
    assert_eq!(result.details.heading_count, 2);
}

#[test]
fn test_custom_font() {
    let docx = DocxOptions::new().with_font("Georgia");
    let result = Pdf2Docx::new()
        .with_docx_options(docx)
        .convert_bytes(SAMPLE_JSON.as_bytes(), "sample.json")
        .unwrap();

    assert!(package_part(&result.docx, "word/styles.xml").contains("Georgia"));
}

#[test]
fn test_convert_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "report.json", SAMPLE_JSON);

    let result = pdf2docx::convert_file(&path).unwrap();
    assert_eq!(result.file_name, "report_converted.docx");
    assert!(result.file_size() > 0);

    let out = dir.path().join(&result.file_name);
    std::fs::write(&out, &result.docx).unwrap();
    assert!(out.exists());
}

#[test]
fn test_too_large_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "big.json", SAMPLE_JSON);

    let result = Pdf2Docx::new().with_max_input_bytes(16).convert_file(&path);
    assert!(matches!(result, Err(Error::TooLarge { max: 16, .. })));
}

#[test]
fn test_empty_content() {
    let result = pdf2docx::convert_bytes(br#"{"Pages": [{"Texts": []}]}"#, "blank.json");
    assert!(matches!(result, Err(Error::EmptyContent)));
}

#[test]
fn test_strict_mode_rejects_malformed() {
    let json = r#"{"Pages": [{"Texts": [{"R": [{"T": "ok"}]}, {"R": [{"T": "100%"}]}]}]}"#;

    let lenient = pdf2docx::convert_bytes(json.as_bytes(), "doc.json").unwrap();
    assert_eq!(lenient.details.skipped_fragments, 1);
    assert_eq!(lenient.extracted_text, "ok");

    let strict = Pdf2Docx::new().strict().convert_bytes(json.as_bytes(), "doc.json");
    assert!(matches!(strict, Err(Error::MalformedFragment { .. })));
}

#[test]
fn test_not_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "fake.pdf", "definitely not a pdf");

    let result = pdf2docx::convert_file(&path);
    assert!(matches!(result, Err(Error::UnknownFormat)));
}

#[test]
fn test_convert_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_sample(dir.path(), "good.json", SAMPLE_JSON);
    let empty = write_sample(dir.path(), "empty.json", r#"{"Pages": []}"#);
    let missing = dir.path().join("missing.json");

    let paths = vec![good.clone(), empty.clone(), missing.clone()];
    let results = convert_batch(&paths, &ConvertOptions::default());

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, good);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, empty);
    assert!(matches!(results[1].1, Err(Error::EmptyContent)));
    assert_eq!(results[2].0, missing);
    assert!(matches!(results[2].1, Err(Error::Io(_))));
}

#[test]
fn test_convert_batch_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_sample(dir.path(), "one.json", SAMPLE_JSON),
        write_sample(dir.path(), "two.json", SAMPLE_JSON),
        dir.path().join("missing.json"),
    ];

    let done = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let results = convert_batch_with_progress(&paths, &ConvertOptions::default(), |_, result| {
        done.fetch_add(1, Ordering::SeqCst);
        if result.is_err() {
            failed.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert_eq!(results.len(), 3);
    assert_eq!(done.load(Ordering::SeqCst), 3);
    assert_eq!(failed.load(Ordering::SeqCst), 1);
}
