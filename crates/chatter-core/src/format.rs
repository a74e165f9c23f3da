//! Reply reflow for display.
//!
//! Model output arrives as one long run of text, sometimes with the newline
//! escapes still in it. [`format_reply`] turns that into paragraphs wrapped
//! to a fixed column width.

use unicode_width::UnicodeWidthStr;

/// Normalize, split into paragraphs and greedily wrap each to `width` columns.
///
/// Paragraphs are separated by one blank line in the result. A word wider
/// than `width` is placed alone on its own line without being split.
/// Applying this twice with the same width gives the same result as once.
pub fn format_reply(raw: &str, width: usize) -> String {
    let cleaned = raw.replace("\\n", "\n");

    cleaned
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| wrap_paragraph(paragraph, width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Greedy word-wrap of a single paragraph.
///
/// Any whitespace (including line breaks) separates words; runs of it
/// collapse to a single space. Widths are measured in terminal columns.
pub fn wrap_paragraph(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
