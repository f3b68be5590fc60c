//! Fragment decoding and page flattening.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{FragmentEncoding, PageText, TextFragment};
use crate::parser::ErrorMode;

use super::{LineMode, ReconstructOptions};

/// Marker appended after every page.
pub const PAGE_BREAK: &str = "\n\n";

/// A fragment that was dropped because it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentIssue {
    /// Page number (1-indexed)
    pub page: u32,
    /// Fragment index within the page
    pub fragment: usize,
    /// Decoder message
    pub reason: String,
}

impl From<FragmentIssue> for Error {
    fn from(issue: FragmentIssue) -> Self {
        Error::MalformedFragment {
            page: issue.page,
            fragment: issue.fragment,
            reason: issue.reason,
        }
    }
}

/// Flattened text of all pages.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    /// Concatenated text with page break markers
    pub buffer: String,
    /// Fragments skipped in lenient mode
    pub skipped: Vec<FragmentIssue>,
}

/// Decode percent-encoded text the way `decodeURIComponent` does.
///
/// A `%` must be followed by two hex digits and the decoded bytes must be
/// valid UTF-8. `+` stays literal.
pub fn decode_percent(raw: &str) -> std::result::Result<String, String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(format!("invalid percent escape at byte {}", i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| format!("decoded bytes are not UTF-8: {}", e))
}

/// Decode a single fragment's text.
pub fn decode_fragment(
    fragment: &TextFragment,
    normalize_unicode: bool,
) -> std::result::Result<String, String> {
    let text = match fragment.encoding {
        FragmentEncoding::Percent => decode_percent(&fragment.text)?,
        FragmentEncoding::Plain => fragment.text.clone(),
    };

    if normalize_unicode {
        Ok(text.nfc().collect())
    } else {
        Ok(text)
    }
}

/// Concatenate the text of all pages.
///
/// Fragments of a page are joined with a single space and every page ends
/// with [`PAGE_BREAK`]. In [`LineMode::Positional`] a change in vertical
/// offset starts a new line indented by the fragment's horizontal offset.
pub fn flatten(pages: &[PageText], options: &ReconstructOptions) -> Result<Flattened> {
    if pages.is_empty() || pages.iter().all(PageText::is_empty) {
        return Err(Error::EmptyContent);
    }

    let mut out = Flattened::default();

    for page in pages {
        let min_x = page.min_x().unwrap_or(0.0);
        let mut prev_y: Option<f64> = None;
        let mut at_page_start = true;

        for (index, fragment) in page.fragments.iter().enumerate() {
            if fragment.is_empty() {
                continue;
            }

            let text = match decode_fragment(fragment, options.normalize_unicode) {
                Ok(text) => text,
                Err(reason) => {
                    let issue = FragmentIssue {
                        page: page.number,
                        fragment: index,
                        reason,
                    };
                    if options.error_mode == ErrorMode::Strict {
                        return Err(issue.into());
                    }
                    log::warn!(
                        "Skipping fragment {} on page {}: {}",
                        issue.fragment,
                        issue.page,
                        issue.reason
                    );
                    out.skipped.push(issue);
                    continue;
                }
            };

            if options.line_mode == LineMode::Positional {
                let y = fragment.finite_y();
                let new_line = match (prev_y, y) {
                    (Some(prev), Some(y)) => (y - prev).abs() > options.y_tolerance,
                    _ => false,
                };
                if at_page_start || new_line {
                    if new_line {
                        out.buffer.push('\n');
                    }
                    let columns = indent_columns(fragment.finite_x(), min_x, options);
                    out.buffer.extend(std::iter::repeat(' ').take(columns));
                }
                if y.is_some() {
                    prev_y = y;
                }
            }

            at_page_start = false;
            out.buffer.push_str(&text);
            out.buffer.push(' ');
        }

        out.buffer.push_str(PAGE_BREAK);
    }

    log::debug!(
        "Flattened {} pages into {} bytes ({} fragments skipped)",
        pages.len(),
        out.buffer.len(),
        out.skipped.len()
    );

    Ok(out)
}

fn indent_columns(x: Option<f64>, min_x: f64, options: &ReconstructOptions) -> usize {
    let char_width = options.char_width;
    match x {
        Some(x) if char_width > 0.0 => {
            let columns = ((x - min_x).max(0.0) / char_width).round();
            if columns.is_finite() {
                columns.min(options.max_indent_columns as f64) as usize
            } else {
                0
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, texts: &[&str]) -> PageText {
        PageText::with_fragments(
            number,
            texts.iter().map(|t| TextFragment::encoded(*t)).collect(),
        )
    }

    #[test]
    fn test_decode_percent() {
        assert_eq!(decode_percent("Hello%20World").unwrap(), "Hello World");
        assert_eq!(decode_percent("caf%C3%A9").unwrap(), "café");
        assert_eq!(decode_percent("a+b").unwrap(), "a+b");
        assert!(decode_percent("100%").is_err());
        assert!(decode_percent("%zz").is_err());
        assert!(decode_percent("%FF").is_err());
    }

    #[test]
    fn test_flatten_flow() {
        let pages = vec![page(1, &["Hello", "there"]), page(2, &["World"])];
        let out = flatten(&pages, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.buffer, "Hello there \n\nWorld \n\n");
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_flatten_skips_empty_fragments() {
        let pages = vec![page(1, &["", "A", ""])];
        let out = flatten(&pages, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.buffer, "A \n\n");
    }

    #[test]
    fn test_flatten_empty_input() {
        let options = ReconstructOptions::default();
        assert!(matches!(flatten(&[], &options), Err(Error::EmptyContent)));

        let pages = vec![PageText::new(1), PageText::new(2)];
        assert!(matches!(flatten(&pages, &options), Err(Error::EmptyContent)));
    }

    #[test]
    fn test_flatten_lenient_skips_malformed() {
        let pages = vec![page(1, &["ok", "bad%", "fine"])];
        let out = flatten(&pages, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.buffer, "ok fine \n\n");
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].page, 1);
        assert_eq!(out.skipped[0].fragment, 1);
    }

    #[test]
    fn test_flatten_strict_reports_malformed() {
        let pages = vec![page(3, &["ok", "%G1"])];
        let options = ReconstructOptions::default().strict();
        match flatten(&pages, &options) {
            Err(Error::MalformedFragment { page, fragment, .. }) => {
                assert_eq!(page, 3);
                assert_eq!(fragment, 1);
            }
            other => panic!("expected malformed fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_positional() {
        let pages = vec![PageText::with_fragments(
            1,
            vec![
                TextFragment::encoded("Title").at(10.0, 1.0),
                TextFragment::encoded("Body").at(1.0, 2.0),
                TextFragment::encoded("text").at(4.0, 2.05),
                TextFragment::encoded("Indented").at(2.8, 3.0),
            ],
        )];
        let options = ReconstructOptions::default().positional();
        let out = flatten(&pages, &options).unwrap();
        let expected = format!("{}Title \nBody text \n    Indented \n\n", " ".repeat(20));
        assert_eq!(out.buffer, expected);
    }

    #[test]
    fn test_positional_indent_is_capped() {
        let pages = vec![PageText::with_fragments(
            1,
            vec![
                TextFragment::encoded("a").at(0.0, 1.0),
                TextFragment::encoded("b").at(1e11, 5.0),
            ],
        )];
        let options = ReconstructOptions::default()
            .positional()
            .with_max_indent_columns(50);
        let out = flatten(&pages, &options).unwrap();
        let expected = format!("a \n{}b \n\n", " ".repeat(50));
        assert_eq!(out.buffer, expected);
    }

    #[test]
    fn test_non_finite_positions_are_ignored() {
        let pages = vec![PageText::with_fragments(
            1,
            vec![
                TextFragment::encoded("a").at(1.0, 1.0),
                TextFragment::encoded("b").at(f64::INFINITY, f64::NAN),
                TextFragment::encoded("c").at(f64::NAN, 1.0),
            ],
        )];
        let out = flatten(&pages, &ReconstructOptions::default().positional()).unwrap();
        assert_eq!(out.buffer, "a b c \n\n");
    }

    #[test]
    fn test_plain_fragments_are_not_decoded() {
        let pages = vec![PageText::with_fragments(
            1,
            vec![TextFragment::plain("100% done")],
        )];
        let out = flatten(&pages, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.buffer, "100% done \n\n");
    }
}
