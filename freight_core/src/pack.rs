//! Byte-level compression of reference content.
//!
//! Content is compressed the same way whether it ends up inline or in a
//! staging object, so the codec is fixed here in one place. The codec is
//! general purpose and independent of content type.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use errors::Result;

/// Compress a byte slice.
pub fn pack(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 2 + 64),
        Compression::default(),
    );
    encoder
        .write_all(data)
        .expect("error writing to memory encoder");
    encoder.finish().expect("error finishing memory encoder")
}

/// Decompress a byte slice produced by `pack`.
///
/// Fails on corrupt or truncated input.
pub fn unpack(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
