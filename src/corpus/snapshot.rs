// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus snapshot format.
//!
//! Building the suffix array for a large corpus is the expensive part of
//! start-up, so the built index can be written once and loaded many times.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ HEADER              [32B]    │ magic "TMIX", version, flags, counts, lengths
//! ├──────────────────────────────┤
//! │ BODY (optionally brotli)     │
//! │   VOCABULARY   [vocab_len]   │ count, length-prefixed strings
//! │   TOKENS       [tokens_len]  │ count, varint ids
//! │   SUFFIX_ARRAY [sa_len]      │ count, varint offsets
//! │   SEGMENTS     [segments_len]│ start, len, target, target_len, pairs
//! ├──────────────────────────────┤
//! │ FOOTER              [8B]     │ CRC32 of everything above, magic "XIMT"
//! └──────────────────────────────┘
//! ```
//!
//! Section lengths always describe the uncompressed body. If the footer is
//! wrong, something got corrupted or truncated. Don't trust the data.
//!
//! Decoding ends with `Corpus::from_parts`, so a snapshot that parses but
//! whose tables disagree is reported as corruption, not silently used.

use std::io::{self, Read, Write};
use std::path::Path;

use crc32fast::Hasher as Crc32Hasher;
use tracing::{debug, info};

use super::encoding::{encode_string, encode_varint, SectionReader};
use super::{Corpus, SegmentEntry, Vocabulary, WordAlignment};
use crate::error::Error;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "TMIX" in ASCII (header)
pub const MAGIC: [u8; 4] = *b"TMIX";

/// Footer magic: "XIMT" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = *b"XIMT";

pub const VERSION: u8 = 1;

const BROTLI_BUFFER: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_LGWIN: u32 = 22;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum snapshot file size: 4 GiB
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Maximum uncompressed body size: 16 GiB
pub const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024 * 1024;

// ============================================================================
// FLAGS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const COMPRESSED: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_compression(mut self) -> Self {
        self.0 |= Self::COMPRESSED;
        self
    }

    pub fn is_compressed(self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Snapshot header (32 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub segment_count: u32,
    pub token_count: u32,
    pub vocab_len: u32,
    pub tokens_len: u32,
    pub sa_len: u32,
    pub segments_len: u32,
}

impl SnapshotHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 6*4 (u32s) + 2 (reserved) = 32
    pub const SIZE: usize = 32;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        w.write_all(&[self.flags.0])?;
        w.write_all(&self.segment_count.to_le_bytes())?;
        w.write_all(&self.token_count.to_le_bytes())?;
        w.write_all(&self.vocab_len.to_le_bytes())?;
        w.write_all(&self.tokens_len.to_le_bytes())?;
        w.write_all(&self.sa_len.to_le_bytes())?;
        w.write_all(&self.segments_len.to_le_bytes())?;
        w.write_all(&[0u8; 2])?; // reserved
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> Result<Self, Error> {
        let buf: &[u8; Self::SIZE] = bytes
            .get(..Self::SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| Error::Snapshot("file too short for header".into()))?;

        if buf[0..4] != MAGIC {
            return Err(Error::Snapshot(format!(
                "invalid magic: expected TMIX, got {:?}",
                &buf[0..4]
            )));
        }
        let version = buf[4];
        if version != VERSION {
            return Err(Error::Snapshot(format!(
                "unsupported version {} (expected {})",
                version, VERSION
            )));
        }

        let word = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        Ok(Self {
            version,
            flags: FormatFlags(buf[5]),
            segment_count: word(6),
            token_count: word(10),
            vocab_len: word(14),
            tokens_len: word(18),
            sa_len: word(22),
            segments_len: word(26),
            // buf[30..32] is reserved
        })
    }

    /// Uncompressed body size the header promises.
    pub fn body_len(&self) -> u64 {
        self.vocab_len as u64 + self.tokens_len as u64 + self.sa_len as u64 + self.segments_len as u64
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFooter {
    /// CRC32 checksum of header + body (everything before footer)
    pub crc32: u32,
}

impl SnapshotFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> Result<Self, Error> {
        let start = bytes
            .len()
            .checked_sub(Self::SIZE)
            .ok_or_else(|| Error::Snapshot("file too short for footer".into()))?;
        let footer = &bytes[start..];
        if footer[4..] != FOOTER_MAGIC {
            return Err(Error::Snapshot(format!(
                "invalid footer magic: expected XIMT, got {:?}",
                &footer[4..]
            )));
        }
        Ok(Self {
            crc32: u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]),
        })
    }

    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// ENCODE
// ============================================================================

fn section_len(section: &'static str, bytes: &[u8]) -> Result<u32, Error> {
    u32::try_from(bytes.len())
        .map_err(|_| Error::Snapshot(format!("{} section exceeds 4 GiB", section)))
}

fn encode_vocabulary(vocabulary: &Vocabulary) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_varint(vocabulary.len() as u64, &mut buf);
    for token in vocabulary.iter() {
        encode_string(token, &mut buf);
    }
    buf
}

fn encode_ids(ids: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ids.len() * 2);
    encode_varint(ids.len() as u64, &mut buf);
    for &id in ids {
        encode_varint(id as u64, &mut buf);
    }
    buf
}

fn encode_segments(segments: &[SegmentEntry]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_varint(segments.len() as u64, &mut buf);
    for entry in segments {
        encode_varint(entry.start as u64, &mut buf);
        encode_varint(entry.len as u64, &mut buf);
        encode_string(&entry.target, &mut buf);
        encode_varint(entry.target_len as u64, &mut buf);
        encode_varint(entry.alignment.pair_count() as u64, &mut buf);
        for (source, target) in entry.alignment.pairs() {
            encode_varint(source as u64, &mut buf);
            encode_varint(target as u64, &mut buf);
        }
    }
    buf
}

/// Serialize a corpus. `compress` brotli-compresses the body.
pub fn encode(corpus: &Corpus, compress: bool) -> Result<Vec<u8>, Error> {
    let vocab = encode_vocabulary(corpus.vocabulary());
    let tokens = encode_ids(corpus.tokens());
    let sa = encode_ids(corpus.suffix_array());
    let segments = encode_segments(corpus.segments());

    let flags = if compress {
        FormatFlags::new().with_compression()
    } else {
        FormatFlags::new()
    };
    let header = SnapshotHeader {
        version: VERSION,
        flags,
        segment_count: corpus.segment_count() as u32,
        token_count: corpus.token_count() as u32,
        vocab_len: section_len("vocabulary", &vocab)?,
        tokens_len: section_len("tokens", &tokens)?,
        sa_len: section_len("suffix array", &sa)?,
        segments_len: section_len("segments", &segments)?,
    };

    let mut body = Vec::with_capacity(header.body_len() as usize);
    body.extend_from_slice(&vocab);
    body.extend_from_slice(&tokens);
    body.extend_from_slice(&sa);
    body.extend_from_slice(&segments);

    let payload = if compress {
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(
                &mut compressed,
                BROTLI_BUFFER,
                BROTLI_QUALITY,
                BROTLI_LGWIN,
            );
            writer.write_all(&body)?;
            writer.flush()?;
        }
        debug!(raw = body.len(), compressed = compressed.len(), "compressed snapshot body");
        compressed
    } else {
        body
    };

    let mut out = Vec::with_capacity(SnapshotHeader::SIZE + payload.len() + SnapshotFooter::SIZE);
    header.write(&mut out)?;
    out.extend_from_slice(&payload);
    let footer = SnapshotFooter {
        crc32: SnapshotFooter::compute_crc32(&out),
    };
    footer.write(&mut out)?;
    Ok(out)
}

// ============================================================================
// DECODE
// ============================================================================

/// Header and integrity status of a snapshot, without decoding the body.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub header: SnapshotHeader,
    pub file_size: usize,
    /// Stored body size (compressed size when the body is compressed).
    pub payload_size: usize,
    pub stored_crc: u32,
    pub computed_crc: u32,
}

impl SnapshotInfo {
    pub fn crc_ok(&self) -> bool {
        self.stored_crc == self.computed_crc
    }
}

/// Read header and footer, and recompute the checksum.
pub fn inspect(bytes: &[u8]) -> Result<SnapshotInfo, Error> {
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(Error::Snapshot(format!(
            "file size {} exceeds limit {}",
            bytes.len(),
            MAX_FILE_SIZE
        )));
    }
    if bytes.len() < SnapshotHeader::SIZE + SnapshotFooter::SIZE {
        return Err(Error::Snapshot(format!("file too short ({} bytes)", bytes.len())));
    }
    let header = SnapshotHeader::read(bytes)?;
    let footer = SnapshotFooter::read(bytes)?;
    let content = &bytes[..bytes.len() - SnapshotFooter::SIZE];
    Ok(SnapshotInfo {
        header,
        file_size: bytes.len(),
        payload_size: content.len() - SnapshotHeader::SIZE,
        stored_crc: footer.crc32,
        computed_crc: SnapshotFooter::compute_crc32(content),
    })
}

fn section_error(e: io::Error) -> Error {
    Error::Snapshot(e.to_string())
}

/// Deserialize and validate a corpus.
pub fn decode(bytes: &[u8]) -> Result<Corpus, Error> {
    let info = inspect(bytes)?;
    if !info.crc_ok() {
        return Err(Error::Snapshot(format!(
            "CRC32 mismatch: stored {:08x}, computed {:08x}",
            info.stored_crc, info.computed_crc
        )));
    }
    let header = info.header;

    let expected = header.body_len();
    if expected > MAX_BODY_SIZE {
        return Err(Error::Snapshot(format!(
            "body size {} exceeds limit {}",
            expected, MAX_BODY_SIZE
        )));
    }
    let expected = expected as usize;

    let payload = &bytes[SnapshotHeader::SIZE..bytes.len() - SnapshotFooter::SIZE];
    let body: std::borrow::Cow<'_, [u8]> = if header.flags.is_compressed() {
        let mut body = Vec::with_capacity(expected.min(payload.len().saturating_mul(16)));
        brotli::Decompressor::new(payload, BROTLI_BUFFER)
            .take(expected as u64 + 1)
            .read_to_end(&mut body)
            .map_err(|e| Error::Snapshot(format!("brotli: {}", e)))?;
        body.into()
    } else {
        payload.into()
    };
    if body.len() != expected {
        return Err(Error::Snapshot(format!(
            "body is {} bytes, header says {}",
            body.len(),
            expected
        )));
    }

    let (vocab_bytes, rest) = body.split_at(header.vocab_len as usize);
    let (token_bytes, rest) = rest.split_at(header.tokens_len as usize);
    let (sa_bytes, segment_bytes) = rest.split_at(header.sa_len as usize);

    let vocabulary = decode_vocabulary(vocab_bytes).map_err(section_error)?;
    let tokens = decode_ids(token_bytes, "tokens").map_err(section_error)?;
    let suffix_array = decode_ids(sa_bytes, "suffix array").map_err(section_error)?;
    let segments = decode_segments(segment_bytes)?;

    if tokens.len() != header.token_count as usize {
        return Err(Error::Snapshot(format!(
            "token section has {} ids, header says {}",
            tokens.len(),
            header.token_count
        )));
    }
    if segments.len() != header.segment_count as usize {
        return Err(Error::Snapshot(format!(
            "segment section has {} entries, header says {}",
            segments.len(),
            header.segment_count
        )));
    }

    Ok(Corpus::from_parts(vocabulary, tokens, segments, suffix_array)?)
}

fn decode_vocabulary(bytes: &[u8]) -> io::Result<Vocabulary> {
    let mut reader = SectionReader::new(bytes, "vocabulary");
    let count = reader.count(1)?;
    let mut tokens = Vec::with_capacity(count);
    for _ in 0..count {
        tokens.push(reader.string()?);
    }
    reader.finish()?;
    Ok(Vocabulary::from_sorted_unchecked(tokens))
}

fn decode_ids(bytes: &[u8], section: &'static str) -> io::Result<Vec<u32>> {
    let mut reader = SectionReader::new(bytes, section);
    let count = reader.count(1)?;
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(reader.u32()?);
    }
    reader.finish()?;
    Ok(ids)
}

fn decode_segments(bytes: &[u8]) -> Result<Vec<SegmentEntry>, Error> {
    let mut reader = SectionReader::new(bytes, "segments");
    // start, len, target length prefix, target_len, pair count
    let count = reader.count(5).map_err(section_error)?;
    let mut segments = Vec::with_capacity(count);
    for i in 0..count {
        let start = reader.varint().map_err(section_error)? as usize;
        let len = reader.varint().map_err(section_error)? as usize;
        let target = reader.string().map_err(section_error)?;
        let target_len = reader.varint().map_err(section_error)? as usize;
        let pair_count = reader.count(2).map_err(section_error)?;
        let mut pairs = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            let source_idx = reader.u32().map_err(section_error)?;
            let target_idx = reader.u32().map_err(section_error)?;
            pairs.push((source_idx, target_idx));
        }
        let alignment = WordAlignment::from_pairs(i, pairs, len, target_len)?;
        segments.push(SegmentEntry {
            start,
            len,
            target,
            target_len,
            alignment,
        });
    }
    reader.finish().map_err(section_error)?;
    Ok(segments)
}

// ============================================================================
// FILES
// ============================================================================

impl Corpus {
    /// Write a snapshot. Returns the number of bytes written.
    pub fn save(&self, path: &Path, compress: bool) -> Result<usize, Error> {
        let bytes = encode(self, compress)?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), compress, "saved corpus snapshot");
        Ok(bytes.len())
    }

    /// Load and validate a snapshot.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = decode(&bytes)?;
        info!(
            path = %path.display(),
            segments = corpus.segment_count(),
            tokens = corpus.token_count(),
            "loaded corpus snapshot"
        );
        Ok(corpus)
    }
}
