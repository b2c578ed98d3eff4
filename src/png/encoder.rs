//! Assembles a complete PNG file from an RGBA pixel buffer.

use crate::png::chunk::{ChunkType, PngWriter};
use crate::png::header::ImageHeader;
use crate::png::scanline::{compress, serialize_scanlines};
use crate::utils::error::Result;
use flate2::Compression;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Configuration for PNG encoding
#[derive(Debug, Clone, Copy)]
pub struct PngEncodeParams {
    /// zlib level for the `IDAT` stream (default: 6, zlib's own default)
    pub compression: Compression,
}

impl Default for PngEncodeParams {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
        }
    }
}

/// Encodes 8-bit RGBA pixels (row-major, no padding) into a PNG byte stream.
///
/// The stream holds exactly the signature, `IHDR`, one `IDAT` and `IEND`.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    params: &PngEncodeParams,
) -> Result<Vec<u8>> {
    let header = ImageHeader::rgba8(width, height);
    header.validate()?;

    let scanlines = serialize_scanlines(pixels, &header)?;
    let idat = compress(&scanlines, params.compression)?;

    let mut output = Vec::with_capacity(idat.len() + 64);
    {
        let mut cursor = io::Cursor::new(&mut output);
        let mut writer = PngWriter::new(&mut cursor);

        writer.write_signature()?;

        writer.put_chunk(ChunkType::IHDR)?;
        writer.write_all(&header.to_bytes()?)?;
        writer.close_chunk()?;

        writer.write_chunk(ChunkType::IDAT, &idat)?;
        writer.write_chunk(ChunkType::IEND, &[])?;

        writer.into_inner()?;
    }
    debug!(
        "Encoded {}x{} RGBA image: {} scanline bytes, {} byte IDAT, {} bytes total",
        width,
        height,
        scanlines.len(),
        idat.len(),
        output.len()
    );
    Ok(output)
}

/// Encodes `pixels` and writes the PNG to `path`, creating missing parent
/// directories first.
pub fn write_png(
    path: &Path,
    pixels: &[u8],
    width: u32,
    height: u32,
    params: &PngEncodeParams,
) -> Result<()> {
    let bytes = encode_rgba(pixels, width, height, params)?;
    write_file(path, &bytes)
}

/// Writes already encoded PNG bytes to `path`, creating missing parent
/// directories first.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
