//! Whitespace normalization of the flattened buffer.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize whitespace in a flattened buffer.
///
/// Inside a line, runs of spaces and tabs collapse to one space and trailing
/// whitespace is dropped. The leading run is kept, with tabs expanded to
/// `tab_width` spaces, because it carries indentation. Consecutive blank
/// lines collapse into a single paragraph break, and blank lines at the start
/// and trailing whitespace at the end of the buffer are removed.
pub fn normalize(buffer: &str, tab_width: usize) -> String {
    let unified = buffer.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| normalize_line(line, tab_width))
        .collect();
    let joined = lines.join("\n");

    let collapsed = BLANK_LINE_RUN.replace_all(&joined, "\n\n");
    collapsed.trim_start_matches('\n').trim_end().to_string()
}

fn normalize_line(line: &str, tab_width: usize) -> String {
    let body = line.trim_start_matches([' ', '\t']);
    let lead = &line[..line.len() - body.len()];

    let body = WHITESPACE_RUN.replace_all(body, " ");
    let body = body.trim_end();
    if body.is_empty() {
        return String::new();
    }

    let width: usize = lead
        .chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum();
    let mut out = String::with_capacity(width + body.len());
    out.extend(std::iter::repeat(' ').take(width));
    out.push_str(body);
    out
}

/// Split a normalized buffer into raw lines.
pub fn split_lines(buffer: &str) -> Vec<&str> {
    buffer.split('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_inner_whitespace() {
        assert_eq!(normalize("a   b\t\tc  ", 4), "a b c");
    }

    #[test]
    fn test_keep_leading_indent() {
        assert_eq!(normalize("x\n    indented  text", 4), "x\n    indented text");
        assert_eq!(normalize("x\n\tone tab", 4), "x\n    one tab");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(normalize("a \n\n\n \n\nb \n\n", 4), "a\n\nb");
        assert_eq!(normalize("a\n\nb", 4), "a\n\nb");
    }

    #[test]
    fn test_trim_buffer() {
        assert_eq!(normalize("\n\n  lead\n\n", 4), "  lead");
        assert_eq!(normalize(" \n\t\n", 4), "");
    }

    #[test]
    fn test_carriage_returns() {
        assert_eq!(normalize("a\r\nb\rc", 4), "a\nb\nc");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("Hello\n\nWorld"), vec!["Hello", "", "World"]);
        assert_eq!(split_lines("one"), vec!["one"]);
    }
}
