// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptor codec.
//!
//! Topic user data carries the type of the topic in the transport's native
//! descriptor format. [`DescriptorCodec`] is the seam between that format
//! and [`TypeDescriptor`]; [`TypeCodeCodec`] implements it for the CORBA
//! TypeCode CDR representation.
//!
//! # Wire layout
//!
//! ```text
//! TypeCode := ulong kind, parameters
//!
//! short .. wchar         : no parameters
//! string / wstring       : ulong bound (0 = unbounded)
//! struct / union / enum  : encapsulation (ulong length, byte-order octet, body)
//! sequence / array       : encapsulation { element TypeCode, ulong bound }
//! alias                  : encapsulation { id, name, TypeCode }
//! ```
//!
//! Parameters inside an encapsulation are aligned relative to its byte-order
//! octet and use the byte order that octet announces.

mod decode;
mod encode;
mod kind;

pub use kind::TcKind;

use crate::cdr::{CdrError, CdrReader, CdrWriter, Endianness};
use crate::config::MonitorConfig;
use crate::dynamic::TypeDescriptor;
use decode::TypeCodeReader;
use encode::TypeCodeWriter;
use thiserror::Error;

/// Default TypeCode nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest nesting limit accepted. Decoding recurses once per level.
pub const MAX_TYPE_DEPTH_LIMIT: usize = 128;

/// Errors raised by a [`DescriptorCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeCodeError {
    #[error("unsupported TypeCode kind {0:#x}")]
    UnsupportedKind(u32),
    #[error("TypeCode nesting deeper than {0} levels")]
    DepthExceeded(usize),
    #[error("union default index {index} out of range ({count} members)")]
    InvalidDefaultIndex { index: i32, count: usize },
    #[error("union discriminator '{0}' is not an integral or enum type")]
    InvalidDiscriminator(String),
    #[error("cannot encode: {0}")]
    NotEncodable(String),
    #[error(transparent)]
    Cdr(#[from] CdrError),
}

/// Converts between the transport-native descriptor bytes and
/// [`TypeDescriptor`].
pub trait DescriptorCodec: Send + Sync {
    /// Decode a descriptor. Trailing bytes are ignored.
    fn decode(&self, bytes: &[u8]) -> Result<TypeDescriptor, TypeCodeError>;

    /// Encode a descriptor.
    fn encode(&self, descriptor: &TypeDescriptor) -> Result<Vec<u8>, TypeCodeError>;
}

/// CORBA TypeCode CDR codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCodeCodec {
    endianness: Endianness,
    max_depth: usize,
}

impl Default for TypeCodeCodec {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TypeCodeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec using the TypeCode settings of `config`.
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            endianness: config.typecode_endianness,
            max_depth: config.max_type_depth.min(MAX_TYPE_DEPTH_LIMIT),
        }
    }

    /// Byte order of the top-level TypeCode (and of encapsulations written).
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Nesting limit, clamped to [`MAX_TYPE_DEPTH_LIMIT`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_TYPE_DEPTH_LIMIT);
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl DescriptorCodec for TypeCodeCodec {
    fn decode(&self, bytes: &[u8]) -> Result<TypeDescriptor, TypeCodeError> {
        let mut reader = CdrReader::new(bytes, self.endianness);
        let descriptor = TypeCodeReader {
            max_depth: self.max_depth,
        }
        .read(&mut reader, 0)?;
        if reader.remaining() > 0 {
            log::debug!(
                "[monitor] ignoring {} trailing bytes after TypeCode '{}'",
                reader.remaining(),
                descriptor.name
            );
        }
        Ok(descriptor)
    }

    fn encode(&self, descriptor: &TypeDescriptor) -> Result<Vec<u8>, TypeCodeError> {
        let mut writer = CdrWriter::new(self.endianness);
        TypeCodeWriter {
            endianness: self.endianness,
            max_depth: self.max_depth,
        }
        .write(&mut writer, descriptor, 0)?;
        Ok(writer.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{
        ArrayDescriptor, MemberKind, PrimitiveKind, SequenceDescriptor, TypeDescriptorBuilder,
        TypeKind, UnionCase, UnionDescriptor,
    };
    use std::sync::Arc;

    /// `struct Track { unsigned long id; string<16> callsign; }` written by hand.
    fn track_typecode(outer: Endianness, inner: Endianness) -> Vec<u8> {
        let mut w = CdrWriter::new(outer);
        w.write_u32(TcKind::TK_STRUCT.to_u32());
        w.write_encapsulation::<()>(inner, |p| {
            p.write_string("IDL:Track:1.0");
            p.write_string("Track");
            p.write_u32(2);
            p.write_string("id");
            p.write_u32(TcKind::TK_ULONG.to_u32());
            p.write_string("callsign");
            p.write_u32(TcKind::TK_STRING.to_u32());
            p.write_u32(16);
            Ok(())
        })
        .unwrap();
        w.into_bytes()
    }

    #[test]
    fn test_decode_struct() {
        let bytes = track_typecode(Endianness::Little, Endianness::Little);
        let desc = TypeCodeCodec::new().decode(&bytes).expect("decode");

        assert_eq!(desc.name, "Track");
        let fields = desc.fields().expect("struct");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].type_desc.member_kind(), MemberKind::ULong);
        assert_eq!(
            fields[1].type_desc.kind,
            TypeKind::Primitive(PrimitiveKind::String {
                max_length: Some(16)
            })
        );
    }

    #[test]
    fn test_encapsulation_byte_order_switch() {
        let codec = TypeCodeCodec::new().with_endianness(Endianness::Big);
        let bytes = track_typecode(Endianness::Big, Endianness::Little);
        let desc = codec.decode(&bytes).expect("decode");
        assert_eq!(desc.fields().map(<[_]>::len), Some(2));

        // Same bytes read with the wrong top-level order
        let err = TypeCodeCodec::new().decode(&bytes).unwrap_err();
        assert!(matches!(err, TypeCodeError::UnsupportedKind(_)));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = track_typecode(Endianness::Little, Endianness::Little);
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(TypeCodeCodec::new().decode(&bytes).is_ok());
    }

    #[test]
    fn test_unsupported_kinds() {
        for raw in [11u32, 14, 22, 29, 0xffff_ffff] {
            let bytes = raw.to_le_bytes();
            assert_eq!(
                TypeCodeCodec::new().decode(&bytes),
                Err(TypeCodeError::UnsupportedKind(raw))
            );
        }
    }

    #[test]
    fn test_hostile_member_count() {
        let mut w = CdrWriter::new(Endianness::Little);
        w.write_u32(TcKind::TK_STRUCT.to_u32());
        w.write_encapsulation::<()>(Endianness::Little, |p| {
            p.write_string("IDL:Evil:1.0");
            p.write_string("Evil");
            p.write_u32(u32::MAX);
            Ok(())
        })
        .unwrap();
        let err = TypeCodeCodec::new().decode(&w.into_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TypeCodeError::Cdr(CdrError::LengthOverflow { .. })
        ));
    }

    #[test]
    fn test_truncated_encapsulation() {
        let bytes = track_typecode(Endianness::Little, Endianness::Little);
        let err = TypeCodeCodec::new().decode(&bytes[..12]).unwrap_err();
        assert!(matches!(err, TypeCodeError::Cdr(_)));
    }

    fn nested_sequences(levels: usize) -> TypeDescriptor {
        let mut desc = TypeDescriptor::primitive("long", PrimitiveKind::I32);
        for _ in 0..levels {
            desc = TypeDescriptor::new(
                "",
                TypeKind::Sequence(SequenceDescriptor::unbounded(Arc::new(desc))),
            );
        }
        desc
    }

    #[test]
    fn test_depth_limit() {
        let deep = nested_sequences(40);
        let permissive = TypeCodeCodec::new().with_max_depth(64);
        let bytes = permissive.encode(&deep).expect("encode");

        assert!(permissive.decode(&bytes).is_ok());
        assert_eq!(
            TypeCodeCodec::new().decode(&bytes),
            Err(TypeCodeError::DepthExceeded(DEFAULT_MAX_DEPTH))
        );
        assert_eq!(
            TypeCodeCodec::new().encode(&deep),
            Err(TypeCodeError::DepthExceeded(DEFAULT_MAX_DEPTH))
        );

        let clamped = TypeCodeCodec::new().with_max_depth(1_000_000);
        assert_eq!(clamped.max_depth(), MAX_TYPE_DEPTH_LIMIT);
        assert_eq!(
            clamped.encode(&nested_sequences(MAX_TYPE_DEPTH_LIMIT + 10)),
            Err(TypeCodeError::DepthExceeded(MAX_TYPE_DEPTH_LIMIT))
        );
    }

    #[test]
    fn test_encode_then_decode_composite() {
        let long = Arc::new(TypeDescriptor::primitive("long", PrimitiveKind::I32));
        let double = Arc::new(TypeDescriptor::primitive("double", PrimitiveKind::F64));
        let mut reading = UnionDescriptor::new(
            long.clone(),
            vec![
                UnionCase::new("count", vec![1, 2], long.clone()),
                UnionCase::new("level", vec![], double.clone()),
            ],
        );
        reading.default_case = Some(1);
        let reading = Arc::new(TypeDescriptor::new("Reading", TypeKind::Union(reading)));
        let matrix = Arc::new(TypeDescriptor::new(
            "",
            TypeKind::Array(ArrayDescriptor::new(double, 9)),
        ));
        let id_alias = Arc::new(TypeDescriptor::new("SensorId", TypeKind::Alias(long)));

        let desc = TypeDescriptorBuilder::new("sensors::Sample")
            .field_with_type("id", id_alias)
            .enum_field("mode", "Mode", ["IDLE", "RUN"])
            .field_with_type("reading", reading)
            .field_with_type("matrix", matrix)
            .sequence_field("raw", PrimitiveKind::Octet)
            .build();

        let codec = TypeCodeCodec::new().with_endianness(Endianness::Big);
        let decoded = codec.decode(&codec.encode(&desc).expect("encode")).expect("decode");

        assert_eq!(decoded.name, "sensors::Sample");
        let kinds: Vec<MemberKind> = decoded
            .fields()
            .unwrap()
            .iter()
            .map(|f| f.type_desc.member_kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                MemberKind::Long,
                MemberKind::Enum,
                MemberKind::Union,
                MemberKind::Array,
                MemberKind::Sequence
            ]
        );

        let reading = decoded.field("reading").unwrap();
        let TypeKind::Union(union) = &reading.type_desc.kind else {
            panic!("expected union");
        };
        // One member per label plus the default member
        assert_eq!(union.cases.len(), 3);
        assert_eq!(union.case_by_discriminator(2).map(|c| c.name.as_str()), Some("count"));
        assert_eq!(union.case_by_discriminator(9).map(|c| c.name.as_str()), Some("level"));

        let TypeKind::Array(matrix) = &decoded.field("matrix").unwrap().type_desc.kind else {
            panic!("expected array");
        };
        assert_eq!(matrix.length, 9);

        assert_eq!(decoded.field("id").unwrap().type_desc.name, "SensorId");
    }

    #[test]
    fn test_float_discriminator_rejected() {
        let float = Arc::new(TypeDescriptor::primitive("float", PrimitiveKind::F32));
        let union = TypeDescriptor::new(
            "Bad",
            TypeKind::Union(UnionDescriptor::new(
                float.clone(),
                vec![UnionCase::new("a", vec![1], float)],
            )),
        );
        assert_eq!(
            TypeCodeCodec::new().encode(&union),
            Err(TypeCodeError::InvalidDiscriminator("float".into()))
        );
    }

    #[test]
    fn test_from_config() {
        let config = MonitorConfig::builder()
            .typecode_endianness(Endianness::Big)
            .max_type_depth(8)
            .build()
            .expect("config");
        let codec = TypeCodeCodec::from_config(&config);
        assert_eq!(codec.endianness(), Endianness::Big);
        assert_eq!(codec.max_depth(), 8);
    }
}
