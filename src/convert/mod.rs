//! Conversion pipeline from input files to Word documents.
//!
//! Converters are looked up by file extension in a [`ConverterRegistry`].
//! A shared registry with the built-in converters is available through
//! [`ConverterRegistry::global`]; it is built once on first use and never
//! mutated afterwards.
//!
//! # Example
//!
//! ```no_run
//! use pdf2docx::convert::{ConvertOptions, ConverterRegistry};
//! use std::path::Path;
//!
//! fn main() -> pdf2docx::Result<()> {
//!     let registry = ConverterRegistry::global();
//!     let result = registry.convert(Path::new("report.pdf"), &ConvertOptions::default())?;
//!     std::fs::write(&result.file_name, &result.docx)?;
//!     Ok(())
//! }
//! ```

mod pdf;
mod result;

pub use pdf::{Pdf2JsonConverter, PdfToWordConverter};
pub use result::{ConvertResult, ExtractionDetails};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};
use crate::model::SourceDocument;
use crate::parser::{ErrorMode, ParseOptions};
use crate::reconstruct::{ReconstructOptions, Reconstructor};
use crate::render::{DocxOptions, DocxRenderer};

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Largest accepted input in bytes (0 = unlimited)
    pub max_input_bytes: usize,

    /// Parser options
    pub parse: ParseOptions,

    /// Reconstruction options
    pub reconstruct: ReconstructOptions,

    /// Output document options
    pub docx: DocxOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input size limit in bytes (0 = unlimited).
    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    /// Set the error mode for both parsing and reconstruction.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.parse.error_mode = mode;
        self.reconstruct.error_mode = mode;
        self
    }

    /// Fail on unreadable pages or fragments instead of skipping them.
    pub fn strict(self) -> Self {
        self.with_error_mode(ErrorMode::Strict)
    }

    /// Set reconstruction options, keeping the configured error mode.
    pub fn with_reconstruct_options(mut self, options: ReconstructOptions) -> Self {
        let mode = self.parse.error_mode;
        self.reconstruct = options.with_error_mode(mode);
        self
    }

    /// Set output document options.
    pub fn with_docx_options(mut self, options: DocxOptions) -> Self {
        self.docx = options;
        self
    }

    /// Check an input against the size limit and sniff its format.
    pub fn validate_input(&self, bytes: &[u8]) -> Result<InputFormat> {
        if bytes.is_empty() {
            return Err(Error::NoInput);
        }
        if self.max_input_bytes > 0 && bytes.len() > self.max_input_bytes {
            return Err(Error::TooLarge {
                size: bytes.len(),
                max: self.max_input_bytes,
            });
        }
        detect_format_from_bytes(bytes)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            parse: ParseOptions::default(),
            reconstruct: ReconstructOptions::default(),
            docx: DocxOptions::default(),
        }
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new input format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert input bytes; `file_name` only names the output.
    fn convert_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult>;

    /// Convert a file at the given path.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let size = fs::metadata(path)?.len() as usize;
        if options.max_input_bytes > 0 && size > options.max_input_bytes {
            return Err(Error::TooLarge {
                size,
                max: options.max_input_bytes,
            });
        }

        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.convert_bytes(&bytes, &file_name, options)
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

static GLOBAL_REGISTRY: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::with_defaults);

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in converters (PDF, pdf2json).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfToWordConverter::new()));
        registry.register(Arc::new(Pdf2JsonConverter::new()));
        registry
    }

    /// The shared registry with the built-in converters.
    pub fn global() -> &'static ConverterRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters.insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name.insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Convert a file using the converter for its extension.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other("File has no extension".into()))?;

        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No converter for extension: {}", ext)))?;

        converter.convert(path, options)
    }

    /// Convert bytes using the specified extension to pick the converter.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No converter for extension: {}", ext)))?;

        converter.convert_bytes(bytes, file_name, options)
    }

    /// Convert bytes, picking the converter from the sniffed input format.
    pub fn convert_sniffed(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let ext = match options.validate_input(bytes)? {
            InputFormat::Pdf { .. } => "pdf",
            InputFormat::Pdf2Json => "json",
        };
        self.convert_bytes(bytes, ext, file_name, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Output file name for a converted input: `report.pdf` → `report_converted.docx`.
pub fn output_file_name(input_name: &str) -> String {
    let stem = Path::new(input_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string());
    format!("{}_converted.docx", stem)
}

/// Reconstruct and render a parsed document.
///
/// Shared tail of every converter. Fails with [`Error::EmptyContent`] before
/// any document is generated when no text is found.
pub fn convert_source(
    source: &SourceDocument,
    file_name: &str,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let reconstruction =
        Reconstructor::new(options.reconstruct.clone()).reconstruct_document(source)?;
    let docx = DocxRenderer::new(options.docx.clone()).render_bytes(&reconstruction.paragraphs)?;
    let details = ExtractionDetails::from_reconstruction(&reconstruction, &source.metadata);

    let result = ConvertResult {
        docx,
        file_name: output_file_name(file_name),
        extracted_text: reconstruction.text,
        paragraphs: reconstruction.paragraphs,
        details,
        metadata: source.metadata.clone(),
    };

    log::info!(
        "Converted {} ({} pages, {} paragraphs, {} bytes)",
        if file_name.is_empty() { "<input>" } else { file_name },
        result.details.pages_processed,
        result.details.paragraph_count,
        result.file_size()
    );
    Ok(result)
}

/// Convert several files in parallel with the shared registry.
///
/// Every file is an independent request; one failure does not affect the
/// others. Results come back in input order.
pub fn convert_batch(
    paths: &[PathBuf],
    options: &ConvertOptions,
) -> Vec<(PathBuf, Result<ConvertResult>)> {
    convert_batch_with_progress(paths, options, |_, _| {})
}

/// Like [`convert_batch`], calling `on_done` from the worker thread as each
/// file finishes.
pub fn convert_batch_with_progress<F>(
    paths: &[PathBuf],
    options: &ConvertOptions,
    on_done: F,
) -> Vec<(PathBuf, Result<ConvertResult>)>
where
    F: Fn(&Path, &Result<ConvertResult>) + Sync,
{
    let registry = ConverterRegistry::global();
    paths
        .par_iter()
        .map(|path| {
            let result = registry.convert(path, options);
            on_done(path, &result);
            (path.clone(), result)
        })
        .collect()
}
