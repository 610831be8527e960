// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`TypeDescriptor`] -> TypeCode CDR.

use super::kind::TcKind;
use super::TypeCodeError;
use crate::cdr::{CdrWriter, Endianness};
use crate::dynamic::{PrimitiveKind, TypeDescriptor, TypeKind, UnionDescriptor};

pub(super) struct TypeCodeWriter {
    pub(super) endianness: Endianness,
    pub(super) max_depth: usize,
}

impl TypeCodeWriter {
    pub(super) fn write(
        &self,
        w: &mut CdrWriter,
        desc: &TypeDescriptor,
        depth: usize,
    ) -> Result<(), TypeCodeError> {
        if depth >= self.max_depth {
            return Err(TypeCodeError::DepthExceeded(self.max_depth));
        }

        match &desc.kind {
            TypeKind::Primitive(kind) => {
                w.write_u32(TcKind::of_primitive(*kind).to_u32());
                if let PrimitiveKind::String { max_length }
                | PrimitiveKind::WString { max_length } = kind
                {
                    w.write_u32(ulong(max_length.unwrap_or(0), "string bound")?);
                }
                Ok(())
            }
            TypeKind::Struct(fields) => {
                w.write_u32(TcKind::TK_STRUCT.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    p.write_string(&repository_id(&desc.name));
                    p.write_string(&desc.name);
                    p.write_u32(ulong(fields.len(), "member count")?);
                    for field in fields {
                        p.write_string(&field.name);
                        self.write(p, &field.type_desc, depth + 1)?;
                    }
                    Ok(())
                })
            }
            TypeKind::Union(union) => {
                w.write_u32(TcKind::TK_UNION.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    self.write_union(p, &desc.name, union, depth)
                })
            }
            TypeKind::Enum(e) => {
                w.write_u32(TcKind::TK_ENUM.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    p.write_string(&repository_id(&desc.name));
                    p.write_string(&desc.name);
                    p.write_u32(ulong(e.variants.len(), "enumerator count")?);
                    for (i, variant) in e.variants.iter().enumerate() {
                        // TypeCode enumerators are positional
                        if variant.value as usize != i {
                            return Err(TypeCodeError::NotEncodable(format!(
                                "enumerator '{}' of '{}' has explicit value {}",
                                variant.name, desc.name, variant.value
                            )));
                        }
                        p.write_string(&variant.name);
                    }
                    Ok(())
                })
            }
            TypeKind::Sequence(seq) => {
                w.write_u32(TcKind::TK_SEQUENCE.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    self.write(p, &seq.element_type, depth + 1)?;
                    p.write_u32(ulong(seq.max_length.unwrap_or(0), "sequence bound")?);
                    Ok(())
                })
            }
            TypeKind::Array(arr) => {
                w.write_u32(TcKind::TK_ARRAY.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    self.write(p, &arr.element_type, depth + 1)?;
                    p.write_u32(ulong(arr.length, "array length")?);
                    Ok(())
                })
            }
            TypeKind::Alias(target) => {
                w.write_u32(TcKind::TK_ALIAS.to_u32());
                w.write_encapsulation(self.endianness, |p| {
                    p.write_string(&repository_id(&desc.name));
                    p.write_string(&desc.name);
                    self.write(p, target, depth + 1)
                })
            }
        }
    }

    fn write_union(
        &self,
        p: &mut CdrWriter,
        name: &str,
        union: &UnionDescriptor,
        depth: usize,
    ) -> Result<(), TypeCodeError> {
        p.write_string(&repository_id(name));
        p.write_string(name);
        self.write(p, &union.discriminator, depth + 1)?;

        if let Some(index) = union.default_case.filter(|i| *i >= union.cases.len()) {
            return Err(TypeCodeError::InvalidDefaultIndex {
                index: i32::try_from(index).unwrap_or(i32::MAX),
                count: union.cases.len(),
            });
        }

        // One TypeCode member per label; the default branch adds a member
        // with a zero octet label.
        let mut members = Vec::new();
        let mut default_index = -1i32;
        for (i, case) in union.cases.iter().enumerate() {
            if union.default_case == Some(i) {
                default_index = ulong(members.len(), "default index")? as i32;
                members.push((None, case));
            }
            for label in &case.labels {
                members.push((Some(*label), case));
            }
        }
        p.write_i32(default_index);

        p.write_u32(ulong(members.len(), "union member count")?);
        for (label, case) in members {
            match label {
                Some(label) => write_label(p, &union.discriminator, label)?,
                None => p.write_u8(0),
            }
            p.write_string(&case.name);
            self.write(p, &case.type_desc, depth + 1)?;
        }
        Ok(())
    }
}

fn write_label(
    p: &mut CdrWriter,
    discriminator: &TypeDescriptor,
    label: i64,
) -> Result<(), TypeCodeError> {
    match &discriminator.resolved().kind {
        TypeKind::Primitive(kind) => match kind {
            PrimitiveKind::Bool | PrimitiveKind::Octet | PrimitiveKind::Char => {
                p.write_u8(label as u8)
            }
            PrimitiveKind::I16 => p.write_i16(label as i16),
            PrimitiveKind::U16 | PrimitiveKind::WChar => p.write_u16(label as u16),
            PrimitiveKind::I32 => p.write_i32(label as i32),
            PrimitiveKind::U32 => p.write_u32(label as u32),
            PrimitiveKind::I64 => p.write_i64(label),
            PrimitiveKind::U64 => p.write_u64(label as u64),
            _ => return Err(TypeCodeError::InvalidDiscriminator(discriminator.name.clone())),
        },
        TypeKind::Enum(_) => p.write_u32(label as u32),
        _ => return Err(TypeCodeError::InvalidDiscriminator(discriminator.name.clone())),
    }
    Ok(())
}

fn repository_id(name: &str) -> String {
    format!("IDL:{}:1.0", name.replace("::", "/"))
}

fn ulong(value: usize, what: &str) -> Result<u32, TypeCodeError> {
    u32::try_from(value)
        .map_err(|_| TypeCodeError::NotEncodable(format!("{} {} exceeds a ulong", what, value)))
}
