// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field extraction for callers that do not know the sample type.
//!
//! [`extract`] looks up one top-level member by name and converts it into a
//! [`FieldValue`] according to the member's kind tag:
//!
//! | member kind                   | value          |
//! |-------------------------------|----------------|
//! | short / long / long long      | `I16` / `I32` / `I64` |
//! | unsigned short / long / long long | `U16` / `U32` / `U64` |
//! | float / double                | `F32` / `F64`  |
//! | boolean                       | `U32` (0 or 1) |
//! | octet                         | `U8`           |
//! | char / wchar                  | `Char`         |
//! | string                        | `Text`         |
//! | enum                          | `U32` ordinal  |
//!
//! Every other case yields [`FieldValue::Null`].

use crate::dynamic::{DynamicValue, MemberKind, Sample};
use std::fmt;

/// Display-ready member value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Missing member or unsupported kind.
    Null,
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Read member `name` of `sample`.
pub fn extract(sample: &Sample, name: &str) -> FieldValue {
    let Some(member) = sample.member(name) else {
        return FieldValue::Null;
    };
    match (member.kind, &member.value) {
        (MemberKind::Short, DynamicValue::I16(v)) => FieldValue::I16(*v),
        (MemberKind::Long, DynamicValue::I32(v)) => FieldValue::I32(*v),
        (MemberKind::LongLong, DynamicValue::I64(v)) => FieldValue::I64(*v),
        (MemberKind::UShort, DynamicValue::U16(v)) => FieldValue::U16(*v),
        (MemberKind::ULong, DynamicValue::U32(v)) => FieldValue::U32(*v),
        (MemberKind::ULongLong, DynamicValue::U64(v)) => FieldValue::U64(*v),
        (MemberKind::Float, DynamicValue::F32(v)) => FieldValue::F32(*v),
        (MemberKind::Double, DynamicValue::F64(v)) => FieldValue::F64(*v),
        (MemberKind::Boolean, DynamicValue::Bool(v)) => FieldValue::U32(u32::from(*v)),
        (MemberKind::Octet, DynamicValue::Octet(v)) => FieldValue::U8(*v),
        // Narrow chars are ISO-8859-1
        (MemberKind::Char, DynamicValue::Char(v)) => FieldValue::Char(char::from(*v)),
        (MemberKind::WChar, DynamicValue::WChar(v)) => char::from_u32(u32::from(*v))
            .map(FieldValue::Char)
            .unwrap_or(FieldValue::Null),
        (MemberKind::String, DynamicValue::String(v)) => FieldValue::Text(v.clone()),
        (MemberKind::Enum, DynamicValue::Enum(v)) => FieldValue::U32(*v),
        _ => FieldValue::Null,
    }
}
