//! Page and fragment types delivered by the upstream parsers.

use serde::{Deserialize, Serialize};

/// How the text of a fragment is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentEncoding {
    /// URI percent-encoding, as pdf2json stores its `T` runs
    #[default]
    Percent,
    /// Already decoded text
    Plain,
}

/// One run of text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Raw text, possibly percent-encoded
    pub text: String,

    /// How `text` is encoded
    pub encoding: FragmentEncoding,

    /// Horizontal offset in parser units
    pub x: Option<f64>,

    /// Vertical offset in parser units
    pub y: Option<f64>,
}

impl TextFragment {
    /// Create a percent-encoded fragment without position.
    pub fn encoded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            encoding: FragmentEncoding::Percent,
            x: None,
            y: None,
        }
    }

    /// Create a fragment holding already decoded text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            encoding: FragmentEncoding::Plain,
            x: None,
            y: None,
        }
    }

    /// Attach a position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Whether the raw text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Horizontal offset, ignoring NaN and infinities.
    pub fn finite_x(&self) -> Option<f64> {
        self.x.filter(|x| x.is_finite())
    }

    /// Vertical offset, ignoring NaN and infinities.
    pub fn finite_y(&self) -> Option<f64> {
        self.y.filter(|y| y.is_finite())
    }
}

/// The fragments of one PDF page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,

    /// Fragments in source order
    pub fragments: Vec<TextFragment>,
}

impl PageText {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    /// Create a page with fragments.
    pub fn with_fragments(number: u32, fragments: Vec<TextFragment>) -> Self {
        Self { number, fragments }
    }

    /// Add a fragment to the page.
    pub fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Check if the page has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Smallest horizontal offset on the page, if any fragment has one.
    pub fn min_x(&self) -> Option<f64> {
        self.fragments
            .iter()
            .filter_map(TextFragment::finite_x)
            .fold(None, |acc, x| Some(acc.map_or(x, |m: f64| m.min(x))))
    }
}
