//! Font handling and encoding.
//!
//! This module provides font dictionary parsing, character encoding
//! resolution, and ToUnicode CMap parsing for accurate text extraction.
//! It never loads embedded font program streams (FontFile/FontFile2/
//! FontFile3): a text-extraction crate maps character codes to Unicode,
//! it never rasterizes glyphs.

/// CID to Unicode mappings for predefined Adobe CJK character collections.
pub mod cid_mappings;
pub mod cmap;
/// Glyph-name tables for the standard PDF base encodings.
pub mod encoding_tables;
pub mod encoding_normalizer;
pub mod font_dict;
/// Adobe Glyph List: glyph name to Unicode code point.
pub mod glyph_list;

pub use cmap::{parse_tounicode_cmap, CMap, LazyCMap};
pub use encoding_normalizer::EncodingNormalizer;
pub use font_dict::{CIDSystemInfo, CIDToGIDMap, Encoding, FontInfo};
