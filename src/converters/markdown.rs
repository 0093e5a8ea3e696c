//! Markdown inference for PDF documents.
//!
//! Converts an ordered stream of [`TextSpan`]s into Markdown with inferred
//! headings, bullet/numbered lists, indentation, and emphasis, per the
//! post-layout semantic classifier (body font size, heading ratio bands,
//! bullet/numbered list markers, indent level, emphasis lexicon).

use crate::converters::whitespace::cleanup_markdown;
use crate::layout::TextSpan;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// Leading bullet glyph, optionally followed by whitespace.
    static ref RE_BULLET: Regex = Regex::new(r"^\s*[•●○■□▪▫\-–—*]\s+").unwrap();

    /// Leading numbered/lettered list marker: "1.", "(2)", "a)", "iii:".
    static ref RE_NUMBERED: Regex =
        Regex::new(r"^\s*\(?([0-9]+|[A-Za-z]|[ivxlcdm]+)[.):]\s+").unwrap();
}

/// Heading ratio bands from the largest to the smallest, mapped to H1–H3.
const HEADING_RATIOS: [(f32, &str); 3] = [(1.8, "#"), (1.5, "##"), (1.3, "###")];

/// Font-name substrings treated as bold.
const BOLD_LEXICON: [&str; 4] = ["bold", "black", "heavy", "semibold"];
/// Font-name substrings treated as italic.
const ITALIC_LEXICON: [&str; 2] = ["italic", "oblique"];
/// Font-name substrings treated as monospace/code.
const MONO_LEXICON: [&str; 4] = ["mono", "courier", "consolas", "code"];

/// A single reconstructed line: concatenated text plus the dominant span's
/// metadata, used to classify the line once all spans have been merged.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    font_size: f32,
    font_name: String,
    x0: f32,
    /// True if this line starts a new paragraph (preceded by a large vertical gap).
    new_paragraph: bool,
}

/// Infer Markdown from an ordered sequence of text spans already in reading order.
///
/// Spans are expected to already be ordered the way [`super::super::document::PdfDocument::extract_spans`]
/// produces them (content-stream or structure-tree order); this function only
/// performs line grouping, body-font estimation, and Markdown emission.
pub fn spans_to_markdown(spans: &[TextSpan]) -> String {
    if spans.is_empty() {
        return String::new();
    }

    let lines = group_into_lines(spans);
    let body_size = estimate_body_font_size(spans);
    let left_margin = lines.iter().map(|l| l.x0).fold(f32::INFINITY, f32::min);

    let mut out = String::new();
    for line in &lines {
        if line.new_paragraph && !out.is_empty() {
            out.push('\n');
        }

        let rendered = render_line(line, body_size, left_margin);
        out.push_str(&rendered);
        out.push('\n');
    }

    cleanup_markdown(&out)
}

/// Group spans into lines by baseline Y (tolerance proportional to median font
/// size), mark paragraph boundaries on large vertical gaps, per spec.md §4.9.
fn group_into_lines(spans: &[TextSpan]) -> Vec<Line> {
    let median_size = median_font_size(spans);
    let y_tolerance = (median_size * 0.3).max(1.0);
    let paragraph_gap = median_size * 1.2;

    let mut lines: Vec<Line> = Vec::new();
    let mut prev_y: Option<f32> = None;

    for span in spans {
        let starts_new_line = match lines.last() {
            Some(_) => (prev_y.unwrap_or(span.bbox.y) - span.bbox.y).abs() > y_tolerance,
            None => true,
        };

        if starts_new_line {
            let gap = prev_y.map(|y| (y - span.bbox.y).abs()).unwrap_or(0.0);
            lines.push(Line {
                text: span.text.clone(),
                font_size: span.font_size,
                font_name: span.font_name.clone(),
                x0: span.bbox.x,
                new_paragraph: gap > paragraph_gap,
            });
        } else if let Some(last) = lines.last_mut() {
            if !last.text.is_empty() && !last.text.ends_with(' ') {
                last.text.push(' ');
            }
            last.text.push_str(&span.text);
            // Largest span on the line wins for classification purposes.
            if span.font_size > last.font_size {
                last.font_size = span.font_size;
                last.font_name = span.font_name.clone();
            }
        }

        prev_y = Some(span.bbox.y);
    }

    lines
}

fn median_font_size(spans: &[TextSpan]) -> f32 {
    let mut sizes: Vec<f32> = spans.iter().map(|s| s.font_size).collect();
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap());
    sizes.get(sizes.len() / 2).copied().unwrap_or(12.0)
}

/// Body font size = the size with the greatest character-weighted occurrence,
/// binned to 0.1pt, per spec.md §4.10.
fn estimate_body_font_size(spans: &[TextSpan]) -> f32 {
    let mut weight: HashMap<i32, usize> = HashMap::new();
    for span in spans {
        let bin = (span.font_size * 10.0).round() as i32;
        *weight.entry(bin).or_insert(0) += span.text.chars().count();
    }

    weight
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(bin, _)| bin as f32 / 10.0)
        .unwrap_or(12.0)
}

fn render_line(line: &Line, body_size: f32, left_margin: f32) -> String {
    let ratio = if body_size > 0.0 {
        line.font_size / body_size
    } else {
        1.0
    };

    if let Some(marker) = heading_marker(ratio) {
        return format!("{} {}", marker, line.text.trim());
    }

    let indent_level = (((line.x0 - left_margin) / 36.0).floor().max(0.0) as usize).min(6);
    let indent = "  ".repeat(indent_level);

    if let Some(rest) = strip_bullet(&line.text) {
        return format!("{}- {}", indent, apply_emphasis(rest.trim(), &line.font_name));
    }

    if let Some(rest) = strip_numbered(&line.text) {
        return format!("{}1. {}", indent, apply_emphasis(rest.trim(), &line.font_name));
    }

    format!("{}{}", indent, apply_emphasis(&line.text, &line.font_name))
}

fn heading_marker(ratio: f32) -> Option<&'static str> {
    HEADING_RATIOS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, marker)| *marker)
}

fn strip_bullet(text: &str) -> Option<&str> {
    RE_BULLET.find(text).map(|m| &text[m.end()..])
}

fn strip_numbered(text: &str) -> Option<&str> {
    RE_NUMBERED.find(text).map(|m| &text[m.end()..])
}

/// Wrap text in Markdown emphasis/code markers based on the font-name lexica.
/// Only fires when the lexicon actually matches; plain text is returned as-is.
fn apply_emphasis(text: &str, font_name: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lower = font_name.to_lowercase();
    let is_mono = MONO_LEXICON.iter().any(|m| lower.contains(m));
    if is_mono {
        return format!("`{}`", text);
    }

    let is_bold = BOLD_LEXICON.iter().any(|m| lower.contains(m));
    let is_italic = ITALIC_LEXICON.iter().any(|m| lower.contains(m));

    match (is_bold, is_italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::layout::{Color, FontWeight};

    fn span(text: &str, y: f32, x: f32, size: f32, font_name: &str) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            bbox: Rect::new(x, y, size * text.len() as f32 * 0.5, size),
            font_name: font_name.to_string(),
            font_size: size,
            font_weight: FontWeight::Normal,
            is_italic: false,
            color: Color::new(0, 0, 0),
            mcid: None,
            sequence: 0,
            split_boundary_before: false,
            offset_semantic: false,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 100.0,
            primary_detected: false,
        }
    }

    #[test]
    fn heading_detected_for_large_span() {
        let spans = vec![
            span("Title", 700.0, 72.0, 24.0, "Helvetica-Bold"),
            span("Body text here", 650.0, 72.0, 12.0, "Helvetica"),
            span("more body text", 630.0, 72.0, 12.0, "Helvetica"),
        ];
        let md = spans_to_markdown(&spans);
        assert!(md.contains("# Title"));
        assert!(md.contains("Body text here"));
    }

    #[test]
    fn bullet_list_item_rendered() {
        let spans = vec![
            span("body", 700.0, 72.0, 12.0, "Helvetica"),
            span("• first item", 680.0, 72.0, 12.0, "Helvetica"),
        ];
        let md = spans_to_markdown(&spans);
        assert!(md.contains("- first item"));
    }

    #[test]
    fn numbered_list_item_rendered() {
        let spans = vec![
            span("body", 700.0, 72.0, 12.0, "Helvetica"),
            span("1. first step", 680.0, 72.0, 12.0, "Helvetica"),
        ];
        let md = spans_to_markdown(&spans);
        assert!(md.contains("1. first step"));
    }

    #[test]
    fn bold_font_name_wraps_emphasis() {
        let spans = vec![
            span("plain", 700.0, 72.0, 12.0, "Helvetica"),
            span("strong", 680.0, 72.0, 12.0, "Helvetica-Bold"),
        ];
        let md = spans_to_markdown(&spans);
        assert!(md.contains("**strong**"));
    }

    #[test]
    fn empty_spans_produce_empty_markdown() {
        assert_eq!(spans_to_markdown(&[]), "");
    }
}
