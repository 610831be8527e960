// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw decoded values carried by sample members.

use crate::dynamic::{Member, Sample};

/// A raw value as decoded from the wire.
///
/// The variant reflects the wire representation only. The member's
/// [`MemberKind`](crate::dynamic::MemberKind) tag says how it should be
/// interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    // Primitives
    Bool(bool),
    Octet(u8),
    Char(u8),
    WChar(u16),
    I16(i16),
    I32(i32),
    I64(i64),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    LongDouble([u8; 16]),
    String(String),
    WString(String),

    // Composites
    /// Enumeration ordinal.
    Enum(u32),
    Struct(Sample),
    Sequence(Vec<DynamicValue>),
    Array(Vec<DynamicValue>),
    /// Selected union branch (`None` when no case matches the discriminator).
    Union {
        discriminator: i64,
        branch: Option<Box<Member>>,
    },
}

impl DynamicValue {
    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::WString(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence or array elements.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Sequence(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as nested struct.
    pub fn as_struct(&self) -> Option<&Sample> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view used for union discriminators.
    pub fn as_discriminator(&self) -> Option<i64> {
        match self {
            Self::Bool(v) => Some(i64::from(*v)),
            Self::Octet(v) | Self::Char(v) => Some(i64::from(*v)),
            Self::WChar(v) | Self::U16(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::U32(v) | Self::Enum(v) => Some(i64::from(*v)),
            Self::U64(v) => Some(*v as i64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_views() {
        assert_eq!(DynamicValue::String("a".into()).as_str(), Some("a"));
        assert_eq!(DynamicValue::WString("b".into()).as_str(), Some("b"));
        assert_eq!(DynamicValue::U32(1).as_str(), None);
    }

    #[test]
    fn test_discriminator_view() {
        assert_eq!(DynamicValue::Bool(true).as_discriminator(), Some(1));
        assert_eq!(DynamicValue::I16(-3).as_discriminator(), Some(-3));
        assert_eq!(DynamicValue::Enum(2).as_discriminator(), Some(2));
        assert_eq!(DynamicValue::F64(1.0).as_discriminator(), None);
    }

    #[test]
    fn test_sequence_view() {
        let v = DynamicValue::Array(vec![DynamicValue::Octet(1)]);
        assert_eq!(v.as_sequence().map(<[DynamicValue]>::len), Some(1));
    }
}
