//! Per-line classification: heading, indentation and alignment.
//!
//! Every decision here looks at one line only.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Alignment, ParagraphDescriptor, SpacingTier};

use super::ReconstructOptions;

/// "1. Intro", "2 Scope"
static NUMBERED_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.?\s").unwrap());

/// Classifies raw lines into paragraph descriptors.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    heading_max_len: usize,
    min_caps_run: usize,
    indent_chars: usize,
    indent_unit_twips: u32,
    center_max_len: usize,
    center_min_indent: usize,
    right_min_indent: usize,
}

impl LineClassifier {
    /// Create a classifier from reconstruction options.
    pub fn new(options: &ReconstructOptions) -> Self {
        Self {
            heading_max_len: options.heading_max_len,
            min_caps_run: options.min_caps_run,
            indent_chars: options.indent_chars.max(1),
            indent_unit_twips: options.indent_unit_twips,
            center_max_len: options.center_max_len,
            center_min_indent: options.center_min_indent,
            right_min_indent: options.right_min_indent,
        }
    }

    /// Classify one raw line.
    pub fn classify(&self, line: &str) -> ParagraphDescriptor {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ParagraphDescriptor::spacer();
        }

        let trimmed_len = trimmed.chars().count();
        let leading = leading_whitespace(line);
        let is_heading = self.is_heading(trimmed);

        ParagraphDescriptor {
            text: trimmed.to_string(),
            is_heading,
            indent_level: self.indent_for(leading),
            alignment: self.alignment_for(trimmed_len, leading),
            spacing_after: if is_heading {
                SpacingTier::Heading
            } else {
                SpacingTier::Normal
            },
        }
    }

    /// Heading test on trimmed text.
    ///
    /// Short lines qualify when they are unchanged by uppercasing, match the
    /// all-caps pattern, or start with a number prefix.
    pub fn is_heading(&self, trimmed: &str) -> bool {
        if trimmed.chars().count() >= self.heading_max_len {
            return false;
        }

        trimmed == trimmed.to_uppercase()
            || is_caps_run(trimmed, self.min_caps_run)
            || NUMBERED_PREFIX.is_match(trimmed)
    }

    /// Left indent in twips for `leading` whitespace characters.
    pub fn indent_for(&self, leading: usize) -> u32 {
        let steps = (leading / self.indent_chars) as u32;
        steps.saturating_mul(self.indent_unit_twips)
    }

    /// Alignment from trimmed length and leading whitespace; first match wins.
    pub fn alignment_for(&self, trimmed_len: usize, leading: usize) -> Alignment {
        if trimmed_len < self.center_max_len && leading > self.center_min_indent {
            Alignment::Center
        } else if leading > self.right_min_indent {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(&ReconstructOptions::default())
    }
}

/// Count leading whitespace characters.
pub fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// An ASCII capital followed by capitals or whitespace, `min_len` chars or more.
fn is_caps_run(text: &str, min_len: usize) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }

    let mut len = 1;
    for c in chars {
        if !(c.is_ascii_uppercase() || c.is_whitespace()) {
            return false;
        }
        len += 1;
    }
    len >= min_len
}
