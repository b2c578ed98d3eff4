// src/png/header.rs

//! The `IHDR` image header.

use crate::png::chunk::MAX_CHUNK_LENGTH;
use crate::utils::error::{DmgError, Result};
use byteorder::{BigEndian, WriteBytesExt};

/// PNG colour types. Only `Rgba` is ever written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    Grayscale = 0,
    Rgb = 2,
    Indexed = 3,
    GrayscaleAlpha = 4,
    Rgba = 6,
}

impl ColorType {
    pub const fn channel_count(self) -> usize {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// The 13-byte payload of the `IHDR` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    /// Always 0 (deflate).
    pub compression_method: u8,
    /// Always 0 (adaptive filtering with five basic types).
    pub filter_method: u8,
    /// 0 = no interlace.
    pub interlace_method: u8,
}

impl ImageHeader {
    /// Size of the serialized header in bytes.
    pub const LEN: usize = 13;

    /// 8-bit RGBA, non-interlaced.
    pub fn rgba8(width: u32, height: u32) -> Self {
        ImageHeader {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::Rgba,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }

    /// Checks the header against what a PNG decoder will accept and what
    /// this encoder knows how to produce.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DmgError::InvalidArg(format!(
                "Image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width as u64 > MAX_CHUNK_LENGTH || self.height as u64 > MAX_CHUNK_LENGTH {
            return Err(DmgError::InvalidArg(format!(
                "Image dimensions {}x{} exceed 2^31 - 1",
                self.width, self.height
            )));
        }
        if self.bit_depth != 8 {
            return Err(DmgError::InvalidArg(format!(
                "Unsupported bit depth {}",
                self.bit_depth
            )));
        }
        if self.compression_method != 0 || self.filter_method != 0 || self.interlace_method != 0 {
            return Err(DmgError::InvalidArg(
                "Only deflate, filter method 0 and non-interlaced images are supported".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of pixel bytes in one row, excluding the filter byte.
    #[inline]
    pub fn bytes_per_row(&self) -> usize {
        (self.width as usize * self.color_type.channel_count() * self.bit_depth as usize).div_ceil(8)
    }

    pub fn to_bytes(&self) -> Result<[u8; Self::LEN]> {
        let mut out = [0u8; Self::LEN];
        let mut cursor = &mut out[..];
        cursor.write_u32::<BigEndian>(self.width)?;
        cursor.write_u32::<BigEndian>(self.height)?;
        cursor.write_u8(self.bit_depth)?;
        cursor.write_u8(self.color_type as u8)?;
        cursor.write_u8(self.compression_method)?;
        cursor.write_u8(self.filter_method)?;
        cursor.write_u8(self.interlace_method)?;
        Ok(out)
    }
}
