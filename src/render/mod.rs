//! Rendering of paragraph descriptors into output formats.

mod docx;
mod json;
mod text;

pub use docx::{to_docx, DocxOptions, DocxRenderer, TWIPS_PER_INCH};
pub use json::{to_json, JsonFormat};
pub use text::to_text;
