// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # pdf-extract-core
//!
//! A text-extraction engine for PDF: cross-reference resolution, object
//! parsing, stream filters, content-stream interpretation, tagged-structure
//! reading order, and Markdown inference.
//!
//! ## Core Features
//!
//! - **Xref resolution**: classic tables, cross-reference streams,
//!   incremental updates, object streams, scan-and-repair recovery.
//! - **Stream filters**: ASCIIHex, ASCII85, Flate, LZW (with `/EarlyChange`),
//!   RunLength, PNG/TIFF predictors.
//! - **Content interpretation**: text-positioning and text-showing operators,
//!   a graphics-state stack, font and encoding resolution (simple and
//!   CID-keyed fonts, `/Differences`, the Adobe Glyph List, `/ToUnicode`).
//! - **Reading order**: content-stream order or structure-tree (tagged)
//!   order, selected per extraction.
//! - **Layout & Markdown**: line grouping, column detection, and a
//!   heading/list/emphasis classifier that renders extracted spans as
//!   Markdown.
//!
//! ## Quick start
//!
//! ```ignore
//! use pdf_extract_core::PdfDocument;
//! use pdf_extract_core::config::ExtractionOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = PdfDocument::open("paper.pdf")?;
//! let options = ExtractionOptions::default();
//! let text = doc.extract_text(0, &options)?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Core PDF parsing
pub mod document;
pub mod lexer;
pub mod object;
pub mod objstm;
pub mod parser;
/// Parser configuration options (strict vs. permissive).
pub mod parser_config;
pub mod xref;
pub mod xref_reconstruction;

// Stream decoders
pub mod decoders;

// Layout analysis
pub mod geometry;
pub mod layout;

// Content-stream interpretation and font/encoding resolution
pub mod content;
pub mod fonts;

// PDF logical structure (Tagged PDF)
/// PDF logical structure trees and reading-order traversal.
pub mod structure;

// Format converters
pub mod converters;

// Pipeline: reading-order strategies and extraction configuration
pub mod pipeline;

// Top-level extraction configuration
pub mod config;

pub use config::{ExtractionOptions, ReadingOrder};
pub use document::{DocumentInfo, PageRef, PdfDocument};
pub use error::{Error, Result};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap(),
        }
    }

}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
