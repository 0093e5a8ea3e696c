//! FlateDecode (zlib/deflate) implementation.
//!
//! This is the most common PDF compression filter, used in the vast
//! majority of PDFs. Uses the `flate2` crate for zlib decompression.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use std::io::Read;

/// FlateDecode filter implementation.
///
/// In strict mode, any zlib/deflate error is propagated. In permissive mode
/// (the default), a truncated or corrupted stream yields whatever prefix
/// decoded successfully before the error, rather than failing outright —
/// many real-world PDFs have a few corrupted trailing bytes in an otherwise
/// usable stream.
pub struct FlateDecoder {
    strict: bool,
}

impl Default for FlateDecoder {
    fn default() -> Self {
        Self { strict: false }
    }
}

impl FlateDecoder {
    /// Create a decoder with an explicit strict/permissive mode.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(input);
        let mut output = Vec::new();

        match decoder.read_to_end(&mut output) {
            Ok(_) => Ok(output),
            Err(e) => {
                if !self.strict && !output.is_empty() {
                    log::warn!(
                        "FlateDecode: returning {} bytes decoded before error: {}",
                        output.len(),
                        e
                    );
                    Ok(output)
                } else {
                    Err(Error::Decode(format!(
                        "FlateDecode decompression failed: {} (compressed size: {} bytes)",
                        e,
                        input.len()
                    )))
                }
            },
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}
