//! DOCX rendering of paragraph descriptors.

use std::io::{Cursor, Seek, Write};

use docx_rs::{AlignmentType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Alignment, ParagraphDescriptor, SpacingTier};

/// Twips per inch.
pub const TWIPS_PER_INCH: u32 = 1440;

/// Page and typography settings for the generated document.
///
/// Sizes are in half-points and distances in twips, as Word stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocxOptions {
    /// Page width in twips
    pub page_width: u32,

    /// Page height in twips
    pub page_height: u32,

    /// Margin on all four sides in twips
    pub margin: i32,

    /// Default font family
    pub font: String,

    /// Body run size in half-points
    pub body_size: usize,

    /// Heading run size in half-points
    pub heading_size: usize,

    /// Run color as RRGGBB
    pub color: String,

    /// Line spacing in 240ths of a line (240 = single)
    pub line_spacing: i32,

    /// Spacing after body paragraphs and spacers in twips
    pub spacing_after_normal: u32,

    /// Spacing after headings in twips
    pub spacing_after_heading: u32,
}

impl DocxOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in twips.
    pub fn with_page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Use A4 paper.
    pub fn a4(self) -> Self {
        self.with_page_size(11906, 16838)
    }

    /// Set the margin in twips.
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the default font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Set body and heading run sizes in half-points.
    pub fn with_sizes(mut self, body: usize, heading: usize) -> Self {
        self.body_size = body;
        self.heading_size = heading;
        self
    }

    fn spacing_after(&self, tier: SpacingTier) -> u32 {
        match tier {
            SpacingTier::Normal => self.spacing_after_normal,
            SpacingTier::Heading => self.spacing_after_heading,
        }
    }
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            // US Letter, 1 inch margins
            page_width: 8 * TWIPS_PER_INCH + TWIPS_PER_INCH / 2,
            page_height: 11 * TWIPS_PER_INCH,
            margin: TWIPS_PER_INCH as i32,
            font: "Times New Roman".to_string(),
            body_size: 24,
            heading_size: 26,
            color: "000000".to_string(),
            line_spacing: 240,
            spacing_after_normal: 120,
            spacing_after_heading: 240,
        }
    }
}

/// Renders paragraph descriptors into a Word document.
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer {
    options: DocxOptions,
}

impl DocxRenderer {
    /// Create a renderer with the given options.
    pub fn new(options: DocxOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &DocxOptions {
        &self.options
    }

    /// Build the in-memory document.
    pub fn build(&self, paragraphs: &[ParagraphDescriptor]) -> Docx {
        let opts = &self.options;
        let fonts = RunFonts::new()
            .ascii(&opts.font)
            .hi_ansi(&opts.font)
            .east_asia(&opts.font)
            .cs(&opts.font);

        let margin = PageMargin::new()
            .top(opts.margin)
            .bottom(opts.margin)
            .left(opts.margin)
            .right(opts.margin);

        paragraphs.iter().fold(
            Docx::new()
                .page_size(opts.page_width, opts.page_height)
                .page_margin(margin)
                .default_fonts(fonts)
                .default_size(opts.body_size),
            |docx, p| docx.add_paragraph(self.paragraph(p)),
        )
    }

    /// Render into a writer.
    pub fn render_to<W: Write + Seek>(
        &self,
        paragraphs: &[ParagraphDescriptor],
        writer: W,
    ) -> Result<()> {
        self.build(paragraphs)
            .build()
            .pack(writer)
            .map_err(|e| Error::Render(format!("DOCX packaging error: {}", e)))
    }

    /// Render into a byte vector.
    pub fn render_bytes(&self, paragraphs: &[ParagraphDescriptor]) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.render_to(paragraphs, &mut cursor)?;
        log::debug!(
            "Rendered {} paragraphs into {} bytes of DOCX",
            paragraphs.len(),
            cursor.get_ref().len()
        );
        Ok(cursor.into_inner())
    }

    fn paragraph(&self, p: &ParagraphDescriptor) -> Paragraph {
        let opts = &self.options;
        let spacing = LineSpacing::new()
            .line(opts.line_spacing)
            .after(opts.spacing_after(p.spacing_after));

        if p.is_spacer() {
            return Paragraph::new()
                .add_run(Run::new().add_text(""))
                .line_spacing(spacing);
        }

        let mut run = Run::new()
            .add_text(&p.text)
            .size(if p.is_heading {
                opts.heading_size
            } else {
                opts.body_size
            })
            .color(&opts.color);
        if p.is_heading {
            run = run.bold();
        }

        Paragraph::new()
            .add_run(run)
            .align(alignment_type(p.alignment))
            .indent(
                Some(i32::try_from(p.indent_level).unwrap_or(i32::MAX)),
                None,
                None,
                None,
            )
            .line_spacing(spacing)
    }
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
    }
}

/// Render paragraphs into DOCX bytes with the given options.
pub fn to_docx(paragraphs: &[ParagraphDescriptor], options: &DocxOptions) -> Result<Vec<u8>> {
    DocxRenderer::new(options.clone()).render_bytes(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_defaults() {
        let options = DocxOptions::default();
        assert_eq!(options.page_width, 12240);
        assert_eq!(options.page_height, 15840);
        assert_eq!(options.margin, 1440);
        assert_eq!(options.font, "Times New Roman");
    }

    #[test]
    fn test_render_is_zip() {
        let paragraphs = vec![
            ParagraphDescriptor::heading("TITLE"),
            ParagraphDescriptor::spacer(),
            ParagraphDescriptor::body("Body").with_alignment(Alignment::Center),
        ];
        let bytes = to_docx(&paragraphs, &DocxOptions::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_empty_list() {
        let bytes = DocxRenderer::default().render_bytes(&[]).unwrap();
        assert!(!bytes.is_empty());
    }

    fn document_xml(docx: &[u8]) -> String {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_indent_saturates() {
        let paragraphs = vec![ParagraphDescriptor::body("far")
            .with_indent(u32::MAX)
            .with_alignment(Alignment::Right)];
        let xml = document_xml(&DocxRenderer::default().render_bytes(&paragraphs).unwrap());

        assert!(xml.contains(r#"w:left="2147483647""#));
        assert!(xml.contains(r#"w:jc w:val="right""#));
        assert!(!xml.contains(r#"w:left="-"#));
    }

    #[test]
    fn test_custom_page_size() {
        let renderer = DocxRenderer::new(DocxOptions::new().a4().with_margin(720));
        let xml = document_xml(&renderer.render_bytes(&[ParagraphDescriptor::body("x")]).unwrap());

        assert!(xml.contains(r#"w:w="11906""#));
        assert!(xml.contains(r#"w:h="16838""#));
        assert!(xml.contains(r#"w:top="720""#));
    }

    #[test]
    fn test_spacing_tiers() {
        let options = DocxOptions::default();
        assert_eq!(options.spacing_after(SpacingTier::Normal), 120);
        assert_eq!(options.spacing_after(SpacingTier::Heading), 240);
    }
}
