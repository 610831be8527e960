// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CORBA TCKind constants
//!
//! Only the kinds a DDS topic type can be built from are listed. Anything
//! else (`tk_any`, object references, value types, indirections) is rejected
//! by the codec with its raw value.

use crate::dynamic::PrimitiveKind;

/// TypeCode kind, encoded as a CDR `ulong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(non_camel_case_types)]
pub enum TcKind {
    TK_SHORT = 2,
    TK_LONG = 3,
    TK_USHORT = 4,
    TK_ULONG = 5,
    TK_FLOAT = 6,
    TK_DOUBLE = 7,
    TK_BOOLEAN = 8,
    TK_CHAR = 9,
    TK_OCTET = 10,
    TK_STRUCT = 15,
    TK_UNION = 16,
    TK_ENUM = 17,
    TK_STRING = 18,
    TK_SEQUENCE = 19,
    TK_ARRAY = 20,
    TK_ALIAS = 21,
    TK_LONGLONG = 23,
    TK_ULONGLONG = 24,
    TK_LONGDOUBLE = 25,
    TK_WCHAR = 26,
    TK_WSTRING = 27,
}

impl TcKind {
    pub const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            2 => Self::TK_SHORT,
            3 => Self::TK_LONG,
            4 => Self::TK_USHORT,
            5 => Self::TK_ULONG,
            6 => Self::TK_FLOAT,
            7 => Self::TK_DOUBLE,
            8 => Self::TK_BOOLEAN,
            9 => Self::TK_CHAR,
            10 => Self::TK_OCTET,
            15 => Self::TK_STRUCT,
            16 => Self::TK_UNION,
            17 => Self::TK_ENUM,
            18 => Self::TK_STRING,
            19 => Self::TK_SEQUENCE,
            20 => Self::TK_ARRAY,
            21 => Self::TK_ALIAS,
            23 => Self::TK_LONGLONG,
            24 => Self::TK_ULONGLONG,
            25 => Self::TK_LONGDOUBLE,
            26 => Self::TK_WCHAR,
            27 => Self::TK_WSTRING,
            _ => return None,
        })
    }

    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Primitive kind for parameterless TypeCodes.
    pub const fn primitive(self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::TK_SHORT => PrimitiveKind::I16,
            Self::TK_LONG => PrimitiveKind::I32,
            Self::TK_USHORT => PrimitiveKind::U16,
            Self::TK_ULONG => PrimitiveKind::U32,
            Self::TK_FLOAT => PrimitiveKind::F32,
            Self::TK_DOUBLE => PrimitiveKind::F64,
            Self::TK_BOOLEAN => PrimitiveKind::Bool,
            Self::TK_CHAR => PrimitiveKind::Char,
            Self::TK_OCTET => PrimitiveKind::Octet,
            Self::TK_LONGLONG => PrimitiveKind::I64,
            Self::TK_ULONGLONG => PrimitiveKind::U64,
            Self::TK_LONGDOUBLE => PrimitiveKind::LongDouble,
            Self::TK_WCHAR => PrimitiveKind::WChar,
            _ => return None,
        })
    }

    /// TypeCode kind of a primitive.
    pub const fn of_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::I16 => Self::TK_SHORT,
            PrimitiveKind::I32 => Self::TK_LONG,
            PrimitiveKind::U16 => Self::TK_USHORT,
            PrimitiveKind::U32 => Self::TK_ULONG,
            PrimitiveKind::F32 => Self::TK_FLOAT,
            PrimitiveKind::F64 => Self::TK_DOUBLE,
            PrimitiveKind::Bool => Self::TK_BOOLEAN,
            PrimitiveKind::Char => Self::TK_CHAR,
            PrimitiveKind::Octet => Self::TK_OCTET,
            PrimitiveKind::I64 => Self::TK_LONGLONG,
            PrimitiveKind::U64 => Self::TK_ULONGLONG,
            PrimitiveKind::LongDouble => Self::TK_LONGDOUBLE,
            PrimitiveKind::WChar => Self::TK_WCHAR,
            PrimitiveKind::String { .. } => Self::TK_STRING,
            PrimitiveKind::WString { .. } => Self::TK_WSTRING,
        }
    }

    /// Canonical IDL name, used for anonymous primitive descriptors.
    pub const fn idl_name(self) -> &'static str {
        match self {
            Self::TK_SHORT => "short",
            Self::TK_LONG => "long",
            Self::TK_USHORT => "unsigned short",
            Self::TK_ULONG => "unsigned long",
            Self::TK_FLOAT => "float",
            Self::TK_DOUBLE => "double",
            Self::TK_BOOLEAN => "boolean",
            Self::TK_CHAR => "char",
            Self::TK_OCTET => "octet",
            Self::TK_STRUCT => "struct",
            Self::TK_UNION => "union",
            Self::TK_ENUM => "enum",
            Self::TK_STRING => "string",
            Self::TK_SEQUENCE => "sequence",
            Self::TK_ARRAY => "array",
            Self::TK_ALIAS => "typedef",
            Self::TK_LONGLONG => "long long",
            Self::TK_ULONGLONG => "unsigned long long",
            Self::TK_LONGDOUBLE => "long double",
            Self::TK_WCHAR => "wchar",
            Self::TK_WSTRING => "wstring",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u32_rejects_unsupported() {
        assert_eq!(TcKind::from_u32(15), Some(TcKind::TK_STRUCT));
        assert_eq!(TcKind::from_u32(11), None); // tk_any
        assert_eq!(TcKind::from_u32(0xffff_ffff), None); // indirection
    }

    #[test]
    fn test_primitive_mapping_is_consistent() {
        for raw in 0..64 {
            let Some(kind) = TcKind::from_u32(raw) else {
                continue;
            };
            assert_eq!(kind.to_u32(), raw);
            if let Some(p) = kind.primitive() {
                assert_eq!(TcKind::of_primitive(p), kind);
            }
        }
    }
}
