// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoding of raw CDR payloads into [`Sample`] trees.
//!
//! The payload is the serialized body without the RTPS encapsulation header.
//! APPENDABLE types prefix the top-level struct with a 4-byte delimiter header
//! (DHEADER) giving the body length and are laid out with XCDR2 alignment
//! (4 bytes at most); FINAL types have no header and use classic CDR
//! alignment. MUTABLE types use parameter lists and are rejected.

use crate::cdr::{CdrError, CdrReader, Endianness, CDR_MAX_ALIGN, XCDR2_MAX_ALIGN};
use crate::dynamic::{
    DynamicValue, Extensibility, FieldDescriptor, Member, PrimitiveKind, Sample, TypeDescriptor,
    TypeKind,
};
use crate::typecode::DEFAULT_MAX_DEPTH;
use thiserror::Error;

/// Errors raised while decoding a sample payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleDecodeError {
    /// The topic type is not a struct.
    #[error("topic type '{0}' is not a struct")]
    NotAStruct(String),
    /// MUTABLE (or otherwise unsupported) extensibility.
    #[error("{0} types are not supported")]
    UnsupportedExtensibility(Extensibility),
    /// The delimiter header announces more bytes than the payload holds.
    #[error("delimiter header announces {declared} bytes, payload has {available}")]
    DelimiterOverflow { declared: usize, available: usize },
    /// A bounded string or sequence is longer than its bound.
    #[error("length {len} exceeds bound {max}")]
    BoundExceeded { len: usize, max: usize },
    /// A union discriminator of a non-integral type.
    #[error("union discriminator of type '{0}' is not integral")]
    BadDiscriminator(String),
    /// Composite nesting deeper than the decoder accepts.
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    /// Malformed CDR.
    #[error(transparent)]
    Cdr(#[from] CdrError),
}

/// Decode a raw payload of a topic whose type is `descriptor`.
pub fn decode_sample(
    payload: &[u8],
    descriptor: &TypeDescriptor,
    extensibility: Extensibility,
    endianness: Endianness,
) -> Result<Sample, SampleDecodeError> {
    decode_sample_with_depth(
        payload,
        descriptor,
        extensibility,
        endianness,
        DEFAULT_MAX_DEPTH,
    )
}

/// [`decode_sample`] accepting up to `max_depth` levels of composite nesting.
///
/// Pass the TypeCode depth limit the descriptor was decoded with, so that
/// every type the codec accepts also decodes its samples.
pub fn decode_sample_with_depth(
    payload: &[u8],
    descriptor: &TypeDescriptor,
    extensibility: Extensibility,
    endianness: Endianness,
    max_depth: usize,
) -> Result<Sample, SampleDecodeError> {
    let fields = descriptor
        .fields()
        .ok_or_else(|| SampleDecodeError::NotAStruct(descriptor.name.clone()))?;

    let body = match extensibility {
        Extensibility::Final => payload,
        Extensibility::Appendable => {
            let mut header = CdrReader::new(payload, endianness);
            let declared = header.read_u32()? as usize;
            let available = header.remaining();
            if declared > available {
                return Err(SampleDecodeError::DelimiterOverflow {
                    declared,
                    available,
                });
            }
            // Keep the alignment origin at the start of the payload
            &payload[..header.position() + declared]
        }
        Extensibility::Mutable => {
            return Err(SampleDecodeError::UnsupportedExtensibility(extensibility));
        }
    };

    let mut reader = match extensibility {
        Extensibility::Appendable => {
            let mut reader =
                CdrReader::new(body, endianness).with_max_alignment(XCDR2_MAX_ALIGN);
            reader.read_u32()?;
            reader
        }
        _ => CdrReader::new(body, endianness).with_max_alignment(CDR_MAX_ALIGN),
    };
    let limits = Limits { max_depth };
    let members = decode_fields(&mut reader, fields, 0, limits)?;
    Ok(Sample::new(descriptor.name.clone(), members))
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    max_depth: usize,
}

impl Limits {
    fn enter(self, depth: usize) -> Result<usize, SampleDecodeError> {
        if depth >= self.max_depth {
            return Err(SampleDecodeError::DepthExceeded(self.max_depth));
        }
        Ok(depth + 1)
    }
}

fn decode_fields(
    reader: &mut CdrReader<'_>,
    fields: &[FieldDescriptor],
    depth: usize,
    limits: Limits,
) -> Result<Vec<Member>, SampleDecodeError> {
    let mut members = Vec::with_capacity(fields.len());
    for field in fields {
        let value = decode_value(reader, &field.type_desc, depth, limits)?;
        members.push(Member::new(
            field.name.clone(),
            field.type_desc.member_kind(),
            value,
        ));
    }
    Ok(members)
}

/// Smallest number of bytes one element of `desc` can take on the wire.
fn min_wire_size(desc: &TypeDescriptor) -> usize {
    match &desc.resolved().kind {
        TypeKind::Primitive(p) => p.size().unwrap_or(4),
        TypeKind::Enum(_) | TypeKind::Sequence(_) => 4,
        _ => 1,
    }
}

fn decode_value(
    reader: &mut CdrReader<'_>,
    desc: &TypeDescriptor,
    depth: usize,
    limits: Limits,
) -> Result<DynamicValue, SampleDecodeError> {
    let desc = desc.resolved();
    match &desc.kind {
        TypeKind::Primitive(p) => decode_primitive(reader, *p),
        TypeKind::Enum(_) => Ok(DynamicValue::Enum(reader.read_u32()?)),
        TypeKind::Struct(fields) => {
            let depth = limits.enter(depth)?;
            let members = decode_fields(reader, fields, depth, limits)?;
            Ok(DynamicValue::Struct(Sample::new(desc.name.clone(), members)))
        }
        TypeKind::Sequence(seq) => {
            let depth = limits.enter(depth)?;
            let len = reader.read_length(min_wire_size(&seq.element_type))?;
            if let Some(max) = seq.max_length {
                if len > max {
                    return Err(SampleDecodeError::BoundExceeded { len, max });
                }
            }
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(decode_value(reader, &seq.element_type, depth, limits)?);
            }
            Ok(DynamicValue::Sequence(items))
        }
        TypeKind::Array(arr) => {
            let depth = limits.enter(depth)?;
            let need = arr
                .length
                .saturating_mul(min_wire_size(&arr.element_type));
            if need > reader.remaining() {
                return Err(CdrError::UnexpectedEof {
                    offset: reader.position(),
                    need,
                    have: reader.remaining(),
                }
                .into());
            }
            let mut items = Vec::with_capacity(arr.length);
            for _ in 0..arr.length {
                items.push(decode_value(reader, &arr.element_type, depth, limits)?);
            }
            Ok(DynamicValue::Array(items))
        }
        TypeKind::Union(u) => {
            let depth = limits.enter(depth)?;
            let discriminator = decode_value(reader, &u.discriminator, depth, limits)?
                .as_discriminator()
                .ok_or_else(|| SampleDecodeError::BadDiscriminator(u.discriminator.name.clone()))?;
            let branch = match u.case_by_discriminator(discriminator) {
                Some(case) => {
                    let value = decode_value(reader, &case.type_desc, depth, limits)?;
                    Some(Box::new(Member::new(
                        case.name.clone(),
                        case.type_desc.member_kind(),
                        value,
                    )))
                }
                None => None,
            };
            Ok(DynamicValue::Union {
                discriminator,
                branch,
            })
        }
        TypeKind::Alias(inner) => decode_value(reader, inner, depth, limits),
    }
}


fn decode_primitive(
    reader: &mut CdrReader<'_>,
    kind: PrimitiveKind,
) -> Result<DynamicValue, SampleDecodeError> {
    let value = match kind {
        PrimitiveKind::Bool => DynamicValue::Bool(reader.read_u8()? != 0),
        PrimitiveKind::Octet => DynamicValue::Octet(reader.read_u8()?),
        PrimitiveKind::Char => DynamicValue::Char(reader.read_u8()?),
        PrimitiveKind::WChar => DynamicValue::WChar(reader.read_u16()?),
        PrimitiveKind::I16 => DynamicValue::I16(reader.read_i16()?),
        PrimitiveKind::I32 => DynamicValue::I32(reader.read_i32()?),
        PrimitiveKind::I64 => DynamicValue::I64(reader.read_i64()?),
        PrimitiveKind::U16 => DynamicValue::U16(reader.read_u16()?),
        PrimitiveKind::U32 => DynamicValue::U32(reader.read_u32()?),
        PrimitiveKind::U64 => DynamicValue::U64(reader.read_u64()?),
        PrimitiveKind::F32 => DynamicValue::F32(reader.read_f32()?),
        PrimitiveKind::F64 => DynamicValue::F64(reader.read_f64()?),
        PrimitiveKind::LongDouble => {
            reader.align(8);
            let mut storage = [0u8; 16];
            storage.copy_from_slice(reader.read_bytes(16)?);
            DynamicValue::LongDouble(storage)
        }
        PrimitiveKind::String { max_length } => {
            let s = reader.read_string()?;
            check_bound(s.chars().count(), max_length)?;
            DynamicValue::String(s)
        }
        PrimitiveKind::WString { max_length } => {
            let s = reader.read_wstring()?;
            check_bound(s.encode_utf16().count(), max_length)?;
            DynamicValue::WString(s)
        }
    };
    Ok(value)
}

fn check_bound(len: usize, max: Option<usize>) -> Result<(), SampleDecodeError> {
    match max {
        Some(max) if len > max => Err(SampleDecodeError::BoundExceeded { len, max }),
        _ => Ok(()),
    }
}
