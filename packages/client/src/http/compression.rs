//! Gzip compression for cached payloads
//!
//! Large response bodies are compressed before they enter a cache tier. The
//! compressed form is only kept when it is actually smaller than the input.

use std::io::{Read, Write};

use flate2::{Compression as FlateCompression, read::GzDecoder, write::GzEncoder};

use crate::error::{StorageError, StorageResult};

/// Minimum compression ratio to be considered worthwhile (1.05 = 5% improvement)
const MIN_COMPRESSION_RATIO: f64 = 1.05;

/// Compress `data` with gzip at the default level
///
/// # Errors
///
/// Returns `StorageError::Compression` if the encoder fails.
pub fn compress_gzip(data: &[u8]) -> StorageResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), FlateCompression::default());
    encoder
        .write_all(data)
        .map_err(|e| StorageError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| StorageError::Compression(e.to_string()))
}

/// Decompress a gzip stream produced by [`compress_gzip`]
///
/// # Errors
///
/// Returns `StorageError::Compression` if the input is not valid gzip.
pub fn decompress_gzip(data: &[u8]) -> StorageResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut output = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| StorageError::Compression(e.to_string()))?;
    Ok(output)
}

/// Compress `data` if that saves enough space.
///
/// Returns `Some(compressed)` when the compressed form beats the
/// minimum ratio, `None` when the original should be stored as-is.
///
/// # Errors
///
/// Returns `StorageError::Compression` if the encoder fails.
#[allow(clippy::cast_precision_loss)]
pub fn compress_if_smaller(data: &[u8]) -> StorageResult<Option<Vec<u8>>> {
    let compressed = compress_gzip(data)?;
    if compressed.is_empty() {
        return Ok(None);
    }
    let ratio = data.len() as f64 / compressed.len() as f64;
    if ratio >= MIN_COMPRESSION_RATIO {
        Ok(Some(compressed))
    } else {
        Ok(None)
    }
}
