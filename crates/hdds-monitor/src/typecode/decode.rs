// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeCode CDR -> [`TypeDescriptor`].

use super::kind::TcKind;
use super::TypeCodeError;
use crate::cdr::CdrReader;
use crate::dynamic::{
    ArrayDescriptor, EnumDescriptor, FieldDescriptor, PrimitiveKind, SequenceDescriptor,
    TypeDescriptor, TypeKind, UnionCase, UnionDescriptor,
};
use std::sync::Arc;

/// Smallest wire size of one struct or union member entry.
const MIN_MEMBER_SIZE: usize = 8;

pub(super) struct TypeCodeReader {
    pub(super) max_depth: usize,
}

impl TypeCodeReader {
    pub(super) fn read(
        &self,
        r: &mut CdrReader<'_>,
        depth: usize,
    ) -> Result<TypeDescriptor, TypeCodeError> {
        if depth >= self.max_depth {
            return Err(TypeCodeError::DepthExceeded(self.max_depth));
        }

        let raw = r.read_u32()?;
        let kind = TcKind::from_u32(raw).ok_or(TypeCodeError::UnsupportedKind(raw))?;
        if let Some(primitive) = kind.primitive() {
            return Ok(TypeDescriptor::primitive(kind.idl_name(), primitive));
        }

        match kind {
            TcKind::TK_STRING => {
                let max_length = bound(r.read_u32()?);
                Ok(TypeDescriptor::primitive(
                    kind.idl_name(),
                    PrimitiveKind::String { max_length },
                ))
            }
            TcKind::TK_WSTRING => {
                let max_length = bound(r.read_u32()?);
                Ok(TypeDescriptor::primitive(
                    kind.idl_name(),
                    PrimitiveKind::WString { max_length },
                ))
            }
            TcKind::TK_STRUCT => self.read_struct(&mut r.read_encapsulation()?, depth),
            TcKind::TK_UNION => self.read_union(&mut r.read_encapsulation()?, depth),
            TcKind::TK_ENUM => read_enum(&mut r.read_encapsulation()?),
            TcKind::TK_SEQUENCE => {
                let mut p = r.read_encapsulation()?;
                let element = self.read(&mut p, depth + 1)?;
                let max_length = bound(p.read_u32()?);
                let name = format!("sequence<{}>", element.name);
                Ok(TypeDescriptor::new(
                    name,
                    TypeKind::Sequence(SequenceDescriptor {
                        element_type: Arc::new(element),
                        max_length,
                    }),
                ))
            }
            TcKind::TK_ARRAY => {
                let mut p = r.read_encapsulation()?;
                let element = self.read(&mut p, depth + 1)?;
                let length = p.read_u32()? as usize;
                let name = format!("{}[{}]", element.name, length);
                Ok(TypeDescriptor::new(
                    name,
                    TypeKind::Array(ArrayDescriptor::new(Arc::new(element), length)),
                ))
            }
            TcKind::TK_ALIAS => {
                let mut p = r.read_encapsulation()?;
                let _repository_id = p.read_string()?;
                let name = p.read_string()?;
                let target = self.read(&mut p, depth + 1)?;
                Ok(TypeDescriptor::new(name, TypeKind::Alias(Arc::new(target))))
            }
            // Parameterless kinds returned above
            _ => Err(TypeCodeError::UnsupportedKind(raw)),
        }
    }

    fn read_struct(
        &self,
        p: &mut CdrReader<'_>,
        depth: usize,
    ) -> Result<TypeDescriptor, TypeCodeError> {
        let _repository_id = p.read_string()?;
        let name = p.read_string()?;
        let count = p.read_length(MIN_MEMBER_SIZE)?;
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            let member = p.read_string()?;
            let member_type = self.read(p, depth + 1)?;
            fields.push(FieldDescriptor::new(member, Arc::new(member_type)));
        }
        Ok(TypeDescriptor::struct_type(name, fields))
    }

    fn read_union(
        &self,
        p: &mut CdrReader<'_>,
        depth: usize,
    ) -> Result<TypeDescriptor, TypeCodeError> {
        let _repository_id = p.read_string()?;
        let name = p.read_string()?;
        let discriminator = Arc::new(self.read(p, depth + 1)?);
        let default_index = p.read_i32()?;
        let count = p.read_length(MIN_MEMBER_SIZE)?;

        let default_case = match usize::try_from(default_index) {
            Ok(index) if index < count => Some(index),
            Ok(_) => {
                return Err(TypeCodeError::InvalidDefaultIndex {
                    index: default_index,
                    count,
                })
            }
            Err(_) => None,
        };

        let mut cases = Vec::with_capacity(count);
        for i in 0..count {
            let labels = if default_case == Some(i) {
                // The default member carries a zero octet as its label
                p.read_u8()?;
                Vec::new()
            } else {
                vec![read_label(p, &discriminator)?]
            };
            let case_name = p.read_string()?;
            let case_type = self.read(p, depth + 1)?;
            cases.push(UnionCase::new(case_name, labels, Arc::new(case_type)));
        }

        let mut union = UnionDescriptor::new(discriminator, cases);
        union.default_case = default_case;
        Ok(TypeDescriptor::new(name, TypeKind::Union(union)))
    }
}

fn read_enum(p: &mut CdrReader<'_>) -> Result<TypeDescriptor, TypeCodeError> {
    let _repository_id = p.read_string()?;
    let name = p.read_string()?;
    let count = p.read_length(4)?;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(p.read_string()?);
    }
    Ok(TypeDescriptor::new(
        name,
        TypeKind::Enum(EnumDescriptor::from_names(names)),
    ))
}

/// Read one union label, encoded as a value of the discriminator type.
fn read_label(p: &mut CdrReader<'_>, discriminator: &TypeDescriptor) -> Result<i64, TypeCodeError> {
    let label = match &discriminator.resolved().kind {
        TypeKind::Primitive(kind) => match kind {
            PrimitiveKind::Bool | PrimitiveKind::Octet | PrimitiveKind::Char => {
                i64::from(p.read_u8()?)
            }
            PrimitiveKind::I16 => i64::from(p.read_i16()?),
            PrimitiveKind::U16 | PrimitiveKind::WChar => i64::from(p.read_u16()?),
            PrimitiveKind::I32 => i64::from(p.read_i32()?),
            PrimitiveKind::U32 => i64::from(p.read_u32()?),
            PrimitiveKind::I64 => p.read_i64()?,
            PrimitiveKind::U64 => p.read_u64()? as i64,
            _ => return Err(TypeCodeError::InvalidDiscriminator(discriminator.name.clone())),
        },
        TypeKind::Enum(_) => i64::from(p.read_u32()?),
        _ => return Err(TypeCodeError::InvalidDiscriminator(discriminator.name.clone())),
    };
    Ok(label)
}

/// `0` means unbounded.
fn bound(raw: u32) -> Option<usize> {
    (raw != 0).then_some(raw as usize)
}
