//! Top-level configuration for text extraction.
//!
//! [`ExtractionOptions`] is the one struct a caller threads through
//! [`crate::document::PdfDocument::extract`]: which reading order to use,
//! whether to render Markdown, the layout engine's space-insertion
//! threshold, and the underlying parser's strict/permissive mode.

use crate::parser_config::ParserOptions;

/// Reading order used to sequence extracted text spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingOrder {
    /// Content-stream order: spans are emitted in the order the content
    /// stream's text-showing operators produced them.
    #[default]
    Stream,
    /// Structure-tree ("tagged") order: spans are ordered by a pre-order
    /// walk of the document's logical structure tree, falling back to
    /// stream order for pages or spans the structure tree doesn't cover.
    Tagged,
}

/// Options controlling a single page's text extraction.
///
/// # Example
///
/// ```
/// use pdf_extract_core::config::{ExtractionOptions, ReadingOrder};
///
/// let options = ExtractionOptions::default()
///     .with_order(ReadingOrder::Tagged)
///     .with_markdown(true);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Reading order to apply before rendering output.
    pub order: ReadingOrder,

    /// Render output as Markdown instead of plain text.
    pub markdown: bool,

    /// Minimum gap between two glyphs, as a fraction of the current font's
    /// em size, that the layout engine treats as a word boundary and
    /// renders as a space. Never derived from font metrics automatically.
    pub space_threshold: f32,

    /// Parser behavior: strict (fail on the first malformed structure) or
    /// permissive (skip/repair and continue).
    pub parser: ParserOptions,

    /// Hint for how many OS threads a caller extracting multiple pages may
    /// use. The core never spawns threads itself; this is read only by
    /// callers that choose to fan out page extraction themselves.
    pub parallelism: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            order: ReadingOrder::Stream,
            markdown: false,
            space_threshold: 0.15,
            parser: ParserOptions::default(),
            parallelism: 1,
        }
    }
}

impl ExtractionOptions {
    /// Strict parsing, stream reading order, plain text output.
    pub fn strict() -> Self {
        Self {
            parser: ParserOptions::strict(),
            ..Self::default()
        }
    }

    /// Permissive parsing (scan-and-repair on malformed xref/objects).
    pub fn lenient() -> Self {
        Self {
            parser: ParserOptions::lenient(),
            ..Self::default()
        }
    }

    /// Use the given reading order.
    pub fn with_order(mut self, order: ReadingOrder) -> Self {
        self.order = order;
        self
    }

    /// Render output as Markdown.
    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Override the space-insertion threshold (fraction of em size).
    pub fn with_space_threshold(mut self, threshold: f32) -> Self {
        self.space_threshold = threshold;
        self
    }

    /// Override the parallelism hint.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stream_order_plain_text() {
        let opts = ExtractionOptions::default();
        assert_eq!(opts.order, ReadingOrder::Stream);
        assert!(!opts.markdown);
        assert!((opts.space_threshold - 0.15).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_methods_compose() {
        let opts = ExtractionOptions::default()
            .with_order(ReadingOrder::Tagged)
            .with_markdown(true)
            .with_space_threshold(0.2)
            .with_parallelism(4);
        assert_eq!(opts.order, ReadingOrder::Tagged);
        assert!(opts.markdown);
        assert!((opts.space_threshold - 0.2).abs() < f32::EPSILON);
        assert_eq!(opts.parallelism, 4);
    }

    #[test]
    fn strict_and_lenient_select_parser_mode() {
        assert!(ExtractionOptions::strict().parser.strict);
        assert!(!ExtractionOptions::lenient().parser.strict);
    }

    #[test]
    fn parallelism_floors_at_one() {
        let opts = ExtractionOptions::default().with_parallelism(0);
        assert_eq!(opts.parallelism, 1);
    }
}
