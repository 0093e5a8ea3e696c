//! Format converters for PDF documents.
//!
//! This module provides functionality to convert an ordered span stream
//! into Markdown (semantic text with headings, lists, and emphasis
//! inferred from font metrics) and plain text (whitespace cleanup only).
//!
//! # Examples
//!
//! ```no_run
//! use pdf_extract_core::PdfDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = PdfDocument::open("paper.pdf")?;
//! let markdown = doc.to_markdown(0)?;
//! # Ok(())
//! # }
//! ```

pub mod markdown;
pub mod whitespace;

pub use markdown::spans_to_markdown;
pub use whitespace::{cleanup_markdown, cleanup_plain_text, normalize_whitespace, remove_page_artifacts};
