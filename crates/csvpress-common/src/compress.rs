//! Gzip compression helpers
//!
//! The pipeline ships its output as gzip byte streams; these helpers keep the
//! flate2 plumbing in one place. Both operate on in-memory buffers, which is
//! fine at the object sizes this pipeline handles.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use tracing::debug;

/// Compress data with gzip at the default compression level.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("Failed to write data to gzip encoder")?;
    let compressed = encoder.finish().context("Failed to finish gzip stream")?;
    debug!("Compressed {} -> {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

/// Decompress gzip-compressed data.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .context("Failed to decompress gzip data")?;
    debug!("Decompressed {} -> {} bytes", data.len(), decompressed.len());
    Ok(decompressed)
}
