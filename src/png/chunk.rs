// src/png/chunk.rs

//! Reading and writing the chunk framing of a PNG stream.
//!
//! Every PNG chunk is laid out as `length | type | data | crc`, where `length`
//! counts only the data bytes and the CRC covers the type and the data. This
//! module provides two structs:
//! - `PngWriter`: emits the signature and chunks to any destination that
//!   implements `std::io::Write` and `std::io::Seek`.
//! - `PngReader`: walks the chunks of an existing stream and verifies each CRC.
//!   It never inflates or unfilters the image data.

use crate::png::crc::Crc32;
use crate::utils::error::{DmgError, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};

/// The 8-byte signature that starts every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Chunk lengths are limited to 2^31 - 1 bytes.
pub const MAX_CHUNK_LENGTH: u64 = (1 << 31) - 1;

/// A 4-letter PNG chunk type such as `IHDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    /// Builds a chunk type from raw bytes, rejecting anything that is not
    /// four ASCII letters.
    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_alphabetic) {
            Ok(ChunkType(bytes))
        } else {
            Err(DmgError::InvalidArg(format!(
                "Chunk type must be 4 ASCII letters: {:?}",
                bytes
            )))
        }
    }

    /// Critical chunks have the ancillary bit (bit 5 of the first byte) clear.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::str::FromStr for ChunkType {
    type Err = DmgError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 4] = s.as_bytes().try_into().map_err(|_| {
            DmgError::InvalidArg(format!("Chunk type must be 4 characters: '{}'", s))
        })?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// An open chunk: where its length field lives and the CRC accumulated so far.
struct OpenChunk {
    chunk_type: ChunkType,
    length_pos: u64,
    crc: Crc32,
}

/// A writer for PNG chunk streams.
/// The underlying writer must also implement `Seek` to allow for patching chunk lengths.
pub struct PngWriter<W: Write + Seek> {
    writer: W,
    open: Option<OpenChunk>,
}

impl<W: Write + Seek> PngWriter<W> {
    #[inline]
    pub fn new(writer: W) -> Self {
        PngWriter { writer, open: None }
    }

    /// Writes the PNG signature. Must be called once, before the first chunk.
    #[inline]
    pub fn write_signature(&mut self) -> Result<()> {
        self.writer.write_all(&PNG_SIGNATURE)?;
        Ok(())
    }

    /// Begins a new chunk of the given type.
    ///
    /// Writes a placeholder length and the type. The payload is then written
    /// through this writer's `Write` impl and the chunk is finished with
    /// [`close_chunk`](Self::close_chunk).
    pub fn put_chunk(&mut self, chunk_type: ChunkType) -> Result<()> {
        if let Some(open) = &self.open {
            return Err(DmgError::InvalidOperation(format!(
                "Cannot open chunk {}: chunk {} is still open.",
                chunk_type, open.chunk_type
            )));
        }

        let length_pos = self.writer.stream_position()?;
        self.writer.write_u32::<BigEndian>(0)?;
        self.writer.write_all(chunk_type.as_bytes())?;

        let mut crc = Crc32::new();
        crc.update(chunk_type.as_bytes());
        self.open = Some(OpenChunk {
            chunk_type,
            length_pos,
            crc,
        });
        Ok(())
    }

    /// Finishes the open chunk.
    ///
    /// Seeks back to patch the length field, returns to the end of the stream
    /// and appends the CRC of the type and payload.
    pub fn close_chunk(&mut self) -> Result<()> {
        let open = self.open.take().ok_or_else(|| {
            DmgError::InvalidOperation("Cannot close chunk: no chunk is open.".to_string())
        })?;

        let end_pos = self.writer.stream_position()?;
        let payload_start = open.length_pos + 8;
        let length = end_pos - payload_start;
        if length > MAX_CHUNK_LENGTH {
            return Err(DmgError::InvalidArg(format!(
                "Chunk {} payload of {} bytes exceeds the PNG limit",
                open.chunk_type, length
            )));
        }

        self.writer.seek(SeekFrom::Start(open.length_pos))?;
        self.writer.write_u32::<BigEndian>(length as u32)?;
        self.writer.seek(SeekFrom::Start(end_pos))?;

        let crc = open.crc.finish();
        self.writer.write_u32::<BigEndian>(crc)?;
        debug!(
            "Wrote chunk {} ({} bytes, crc {:08x})",
            open.chunk_type, length, crc
        );
        Ok(())
    }

    /// Writes a complete chunk in one call.
    pub fn write_chunk(&mut self, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
        self.put_chunk(chunk_type)?;
        self.write_all(data)?;
        self.close_chunk()
    }

    /// Returns the underlying writer. Fails if a chunk is still open.
    pub fn into_inner(self) -> Result<W> {
        if let Some(open) = &self.open {
            return Err(DmgError::InvalidOperation(format!(
                "Chunk {} was never closed.",
                open.chunk_type
            )));
        }
        Ok(self.writer)
    }
}

// Payload bytes pass straight through and are folded into the open chunk's CRC.
impl<W: Write + Seek> Write for PngWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let open = self
            .open
            .as_mut()
            .ok_or_else(|| std::io::Error::other("payload written outside of a chunk"))?;
        let n = self.writer.write(buf)?;
        open.crc.update(&buf[..n]);
        Ok(n)
    }

    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// A chunk read back from a stream, CRC already verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    pub chunk_type: ChunkType,
    pub data: Vec<u8>,
    pub crc: u32,
}

/// A reader that walks the chunks of a PNG stream.
pub struct PngReader<R: Read> {
    reader: R,
}

impl<R: Read> PngReader<R> {
    /// Wraps `reader` after checking that it starts with the PNG signature.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut sig = [0u8; 8];
        reader.read_exact(&mut sig).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                DmgError::Stream("Stream is shorter than the PNG signature.".to_string())
            }
            _ => e.into(),
        })?;
        if sig != PNG_SIGNATURE {
            return Err(DmgError::Stream("Missing PNG signature.".to_string()));
        }
        Ok(PngReader { reader })
    }

    /// Reads the next chunk.
    ///
    /// Returns `Ok(None)` at a clean end of stream. A chunk cut short or a
    /// CRC mismatch is a `Stream` error.
    pub fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
        let mut length_buf = [0u8; 4];
        match read_exact_or_eof(&mut self.reader, &mut length_buf)? {
            0 => return Ok(None),
            4 => {}
            _ => return Err(DmgError::Stream("Truncated chunk length.".to_string())),
        }
        let length = u32::from_be_bytes(length_buf) as u64;
        if length > MAX_CHUNK_LENGTH {
            return Err(DmgError::Stream(format!(
                "Chunk length {} exceeds the PNG limit.",
                length
            )));
        }

        let truncated = |e: std::io::Error| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                DmgError::Stream("Truncated chunk.".to_string())
            }
            _ => DmgError::Io(e),
        };

        let mut type_buf = [0u8; 4];
        self.reader.read_exact(&mut type_buf).map_err(truncated)?;
        let chunk_type = ChunkType::from_bytes(type_buf)
            .map_err(|_| DmgError::Stream(format!("Invalid chunk type {:?}.", type_buf)))?;

        let mut data = Vec::with_capacity(length.min(1 << 20) as usize);
        (&mut self.reader)
            .take(length)
            .read_to_end(&mut data)?;
        if (data.len() as u64) < length {
            return Err(DmgError::Stream(format!(
                "Chunk {} declares {} bytes but only {} remain.",
                chunk_type,
                length,
                data.len()
            )));
        }

        let declared = self.reader.read_u32::<BigEndian>().map_err(truncated)?;
        let mut crc = Crc32::new();
        crc.update(&type_buf);
        crc.update(&data);
        let actual = crc.finish();
        if actual != declared {
            return Err(DmgError::Stream(format!(
                "CRC mismatch in chunk {}: declared {:08x}, computed {:08x}.",
                chunk_type, declared, actual
            )));
        }

        Ok(Some(RawChunk {
            chunk_type,
            data,
            crc: declared,
        }))
    }

    /// Reads every remaining chunk up to and including `IEND`.
    pub fn read_all(mut self) -> Result<Vec<RawChunk>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next_chunk()? {
            let is_end = chunk.chunk_type == ChunkType::IEND;
            chunks.push(chunk);
            if is_end {
                break;
            }
        }
        Ok(chunks)
    }
}

/// Fills `buf` like `read_exact`, but reports how many bytes arrived instead
/// of failing on end of stream.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
