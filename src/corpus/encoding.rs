// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives for snapshots: varints and length-prefixed
//! strings.
//!
//! Nothing fancy here. Token ids and offsets are usually small, so LEB128
//! varints keep the uncompressed body compact before brotli sees it.

use std::io;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

// ============================================================================
// READER
// ============================================================================

/// Cursor over one section's bytes.
pub struct SectionReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> SectionReader<'a> {
    pub fn new(bytes: &'a [u8], section: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            section,
        }
    }

    pub fn varint(&mut self) -> io::Result<u64> {
        let (value, consumed) = decode_varint(&self.bytes[self.pos..])
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", self.section, e)))?;
        self.pos += consumed;
        Ok(value)
    }

    pub fn u32(&mut self) -> io::Result<u32> {
        let value = self.varint()?;
        u32::try_from(value).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: value {} overflows u32", self.section, value),
            )
        })
    }

    /// A count that must be backed by at least `min_bytes_each` bytes per
    /// element. Stops absurd counts from driving huge allocations.
    pub fn count(&mut self, min_bytes_each: usize) -> io::Result<usize> {
        let count = self.varint()? as usize;
        let budget = self.remaining() / min_bytes_each.max(1);
        if count > budget {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{}: count {} exceeds available bytes {}",
                    self.section,
                    count,
                    self.remaining()
                ),
            ));
        }
        Ok(count)
    }

    pub fn string(&mut self) -> io::Result<String> {
        let len = self.varint()? as usize;
        let end = self.pos.checked_add(len).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: string length {} causes overflow", self.section, len),
            )
        })?;
        let raw = self.bytes.get(self.pos..end).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{}: truncated string (expected {} bytes)", self.section, len),
            )
        })?;
        let text = String::from_utf8(raw.to_vec()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: invalid UTF-8: {}", self.section, e),
            )
        })?;
        self.pos = end;
        Ok(text)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fail unless every byte of the section was consumed.
    pub fn finish(self) -> io::Result<()> {
        if self.remaining() != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {} trailing bytes", self.section, self.remaining()),
            ));
        }
        Ok(())
    }
}

/// Encode a length-prefixed UTF-8 string
pub fn encode_string(value: &str, buf: &mut Vec<u8>) {
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}
