// src/png/scanline.rs

//! Scanline serialization and zlib compression of the `IDAT` payload.

use crate::png::header::ImageHeader;
use crate::utils::error::{DmgError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use std::io::Write;

/// Per-row filter type. Rows are always written unfiltered, so `None` is the
/// only type this encoder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FilterType {
    #[default]
    None = 0,
}

/// Prefixes every row of `pixels` with a `FilterType::None` byte.
///
/// `pixels` holds the rows back to back with no padding; its length must be
/// exactly `height * bytes_per_row`.
pub fn serialize_scanlines(pixels: &[u8], header: &ImageHeader) -> Result<Vec<u8>> {
    let row_len = header.bytes_per_row();
    let expected = row_len * header.height as usize;
    if pixels.len() != expected {
        return Err(DmgError::InvalidArg(format!(
            "Pixel buffer is {} bytes, expected {} ({}x{} RGBA)",
            pixels.len(),
            expected,
            header.width,
            header.height
        )));
    }

    let mut out = Vec::with_capacity((row_len + 1) * header.height as usize);
    for row in pixels.chunks_exact(row_len) {
        out.push(FilterType::None as u8);
        out.extend_from_slice(row);
    }
    Ok(out)
}

/// Compresses `raw` into a zlib stream.
pub fn compress(raw: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 4), level);
    encoder
        .write_all(raw)
        .map_err(|e| DmgError::Compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| DmgError::Compression(e.to_string()))?;
    debug!(
        "Compressed {} scanline bytes to {} (level {})",
        raw.len(),
        compressed.len(),
        level.level()
    );
    Ok(compressed)
}
