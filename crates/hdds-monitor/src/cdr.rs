// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR primitive reader and writer.
//!
//! Shared by the TypeCode codec and the dynamic sample decoder. Alignment is
//! always computed relative to the start of the buffer the reader/writer was
//! created on, which is what CDR encapsulations require: a nested
//! encapsulation gets its own reader whose offset 0 is the byte-order octet.
//!
//! Classic CDR aligns primitives to their size. XCDR2 bodies cap alignment at
//! 4 bytes; use `with_max_alignment(XCDR2_MAX_ALIGN)` for those.
//!
//! Every read is bounds-checked. Nothing in here panics on malformed input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest alignment applied by classic CDR (XCDR1).
pub const CDR_MAX_ALIGN: usize = 8;
/// Largest alignment applied by XCDR2.
pub const XCDR2_MAX_ALIGN: usize = 4;

/// Byte order of a CDR stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// Big-endian (CDR flag 0).
    Big,
    /// Little-endian (CDR flag 1).
    #[default]
    Little,
}

impl Endianness {
    /// Decode the CDR byte-order flag (low bit set = little-endian).
    pub fn from_flag(flag: u8) -> Self {
        if flag & 0x01 == 0x01 {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// CDR byte-order flag for this endianness.
    pub fn flag(self) -> u8 {
        match self {
            Self::Big => 0,
            Self::Little => 1,
        }
    }
}

/// Errors raised while reading CDR data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CdrError {
    /// Not enough bytes left for the requested read.
    #[error("unexpected end of buffer at offset {offset}: need {need} bytes, have {have}")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// A length prefix does not fit in the remaining bytes.
    #[error("length {len} at offset {offset} exceeds the {remaining} remaining bytes")]
    LengthOverflow {
        offset: usize,
        len: usize,
        remaining: usize,
    },
    /// Wide string is not valid UTF-16.
    #[error("invalid UTF-16 in wide string at offset {offset}")]
    InvalidUtf16 { offset: usize },
    /// Encapsulation without a byte-order octet.
    #[error("empty encapsulation at offset {offset}")]
    EmptyEncapsulation { offset: usize },
}

macro_rules! read_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Read an aligned `", stringify!($ty), "`.")]
        pub fn $name(&mut self) -> Result<$ty, CdrError> {
            const SIZE: usize = std::mem::size_of::<$ty>();
            self.align(SIZE);
            let bytes = self.read_array::<SIZE>()?;
            Ok(match self.endianness {
                Endianness::Big => <$ty>::from_be_bytes(bytes),
                Endianness::Little => <$ty>::from_le_bytes(bytes),
            })
        }
    };
}

macro_rules! write_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Write an aligned `", stringify!($ty), "`.")]
        pub fn $name(&mut self, value: $ty) {
            self.align(std::mem::size_of::<$ty>());
            match self.endianness {
                Endianness::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
                Endianness::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
            }
        }
    };
}

/// Bounds-checked CDR reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct CdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
    endianness: Endianness,
    max_align: usize,
}

impl<'a> CdrReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8], endianness: Endianness) -> Self {
        Self {
            buf,
            pos: 0,
            endianness,
            max_align: CDR_MAX_ALIGN,
        }
    }

    /// Cap alignment at `max_align` bytes.
    #[must_use]
    pub fn with_max_alignment(mut self, max_align: usize) -> Self {
        self.max_align = max_align.max(1);
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Advance to the next multiple of `alignment` (capped at the reader's
    /// maximum alignment).
    pub fn align(&mut self, alignment: usize) {
        let alignment = alignment.min(self.max_align);
        if alignment > 1 {
            let rem = self.pos % alignment;
            if rem != 0 {
                self.pos = self.pos.saturating_add(alignment - rem);
            }
        }
    }

    /// Borrow the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CdrError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|end| *end <= self.buf.len())
            .ok_or(CdrError::UnexpectedEof {
                offset: self.pos,
                need: count,
                have: self.remaining(),
            })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CdrError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CdrError> {
        Ok(self.read_array::<1>()?[0])
    }

    read_number!(read_u16, u16);
    read_number!(read_i16, i16);
    read_number!(read_u32, u32);
    read_number!(read_i32, i32);
    read_number!(read_u64, u64);
    read_number!(read_i64, i64);
    read_number!(read_f32, f32);
    read_number!(read_f64, f64);

    /// Read a `ulong` length prefix and check it against the remaining bytes,
    /// assuming each element takes at least `min_element_size` bytes.
    ///
    /// Guards allocations against hostile counts.
    pub fn read_length(&mut self, min_element_size: usize) -> Result<usize, CdrError> {
        let offset = self.pos;
        let len = self.read_u32()? as usize;
        if len.saturating_mul(min_element_size) > self.remaining() {
            return Err(CdrError::LengthOverflow {
                offset,
                len,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    /// Read a CDR string (length includes the NUL terminator).
    ///
    /// A missing terminator is tolerated; invalid UTF-8 is replaced.
    pub fn read_string(&mut self) -> Result<String, CdrError> {
        let len = self.read_length(1)?;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len)?;
        let text = match bytes.split_last() {
            Some((0, body)) => body,
            _ => bytes,
        };
        Ok(String::from_utf8_lossy(text).into_owned())
    }

    /// Read a CDR wide string (length in UTF-16 units, NUL included).
    pub fn read_wstring(&mut self) -> Result<String, CdrError> {
        let offset = self.pos;
        let len = self.read_length(2)?;
        let mut units = Vec::with_capacity(len);
        for _ in 0..len {
            units.push(self.read_u16()?);
        }
        if units.last() == Some(&0) {
            units.pop();
        }
        String::from_utf16(&units).map_err(|_| CdrError::InvalidUtf16 { offset })
    }

    /// Read a `ulong`-prefixed encapsulation and return a reader over it.
    ///
    /// The returned reader starts after the byte-order octet and uses the byte
    /// order that octet announces.
    pub fn read_encapsulation(&mut self) -> Result<CdrReader<'a>, CdrError> {
        let len = self.read_length(1)?;
        let offset = self.pos;
        let body = self.read_bytes(len)?;
        let flag = *body
            .first()
            .ok_or(CdrError::EmptyEncapsulation { offset })?;
        Ok(CdrReader {
            buf: body,
            pos: 1,
            endianness: Endianness::from_flag(flag),
            max_align: self.max_align,
        })
    }
}

/// CDR writer producing an owned buffer.
#[derive(Debug, Clone)]
pub struct CdrWriter {
    buf: Vec<u8>,
    endianness: Endianness,
    max_align: usize,
}

impl CdrWriter {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            buf: Vec::new(),
            endianness,
            max_align: CDR_MAX_ALIGN,
        }
    }

    /// Cap alignment at `max_align` bytes.
    #[must_use]
    pub fn with_max_alignment(mut self, max_align: usize) -> Self {
        self.max_align = max_align.max(1);
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Pad with zeros up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        let alignment = alignment.min(self.max_align);
        if alignment > 1 {
            let padding = (alignment - self.buf.len() % alignment) % alignment;
            self.buf.resize(self.buf.len() + padding, 0);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    write_number!(write_u16, u16);
    write_number!(write_i16, i16);
    write_number!(write_u32, u32);
    write_number!(write_i32, i32);
    write_number!(write_u64, u64);
    write_number!(write_i64, i64);
    write_number!(write_f32, f32);
    write_number!(write_f64, f64);

    /// Write a CDR string with its NUL terminator.
    pub fn write_string(&mut self, value: &str) {
        self.write_u32((value.len() + 1) as u32);
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
    }

    /// Write a CDR wide string (UTF-16 units, NUL terminated).
    pub fn write_wstring(&mut self, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_u32((units.len() + 1) as u32);
        for unit in units {
            self.write_u16(unit);
        }
        self.write_u16(0);
    }

    /// Write a `ulong`-prefixed encapsulation filled by `body`.
    pub fn write_encapsulation<E>(
        &mut self,
        endianness: Endianness,
        body: impl FnOnce(&mut CdrWriter) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut inner = CdrWriter::new(endianness).with_max_alignment(self.max_align);
        inner.write_u8(endianness.flag());
        body(&mut inner)?;
        self.write_u32(inner.buf.len() as u32);
        self.buf.extend_from_slice(&inner.buf);
        Ok(())
    }
}
