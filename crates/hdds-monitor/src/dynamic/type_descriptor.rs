// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural type descriptors recovered from topic user data.

use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Octet,
    Char,
    WChar,
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
    F32,
    F64,
    LongDouble,
    String { max_length: Option<usize> },
    WString { max_length: Option<usize> },
}

impl PrimitiveKind {
    /// Get the size in bytes (None for strings).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Octet | Self::Char => Some(1),
            Self::WChar | Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::LongDouble => Some(16),
            Self::String { .. } | Self::WString { .. } => None,
        }
    }

    /// Get CDR alignment requirement.
    pub fn alignment(&self) -> usize {
        match self {
            Self::Bool | Self::Octet | Self::Char => 1,
            Self::WChar | Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 | Self::String { .. } | Self::WString { .. } => 4,
            Self::U64 | Self::I64 | Self::F64 | Self::LongDouble => 8,
        }
    }

    /// Kind tag carried by sample members of this primitive type.
    pub fn member_kind(&self) -> MemberKind {
        match self {
            Self::Bool => MemberKind::Boolean,
            Self::Octet => MemberKind::Octet,
            Self::Char => MemberKind::Char,
            Self::WChar => MemberKind::WChar,
            Self::I16 => MemberKind::Short,
            Self::I32 => MemberKind::Long,
            Self::I64 => MemberKind::LongLong,
            Self::U16 => MemberKind::UShort,
            Self::U32 => MemberKind::ULong,
            Self::U64 => MemberKind::ULongLong,
            Self::F32 => MemberKind::Float,
            Self::F64 => MemberKind::Double,
            Self::LongDouble => MemberKind::LongDouble,
            Self::String { .. } => MemberKind::String,
            Self::WString { .. } => MemberKind::WString,
        }
    }
}

/// Kind tag attached to every decoded sample member.
///
/// Mirrors the TypeCode kinds a member can have once aliases are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Short,
    Long,
    LongLong,
    UShort,
    ULong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    Boolean,
    Octet,
    Char,
    WChar,
    String,
    WString,
    Enum,
    Struct,
    Union,
    Sequence,
    Array,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::LongLong => "long long",
            Self::UShort => "unsigned short",
            Self::ULong => "unsigned long",
            Self::ULongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::Boolean => "boolean",
            Self::Octet => "octet",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::String => "string",
            Self::WString => "wstring",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Sequence => "sequence",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// Schema-evolution mode of a topic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Extensibility {
    /// Members may be appended; samples carry a delimiter header.
    #[default]
    Appendable,
    /// Fixed layout.
    Final,
    /// Arbitrary changes. Not supported for sample decoding.
    Mutable,
}

impl Extensibility {
    /// Decode the user-data extensibility code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Appendable),
            1 => Some(Self::Final),
            2 => Some(Self::Mutable),
            _ => None,
        }
    }

    /// User-data extensibility code.
    pub fn code(self) -> u8 {
        match self {
            Self::Appendable => 0,
            Self::Final => 1,
            Self::Mutable => 2,
        }
    }
}

impl fmt::Display for Extensibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Appendable => "APPENDABLE",
            Self::Final => "FINAL",
            Self::Mutable => "MUTABLE",
        })
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields.
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Enumeration.
    Enum(EnumDescriptor),
    /// Union with discriminator.
    Union(UnionDescriptor),
    /// Typedef to another type.
    Alias(Arc<TypeDescriptor>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Follow alias chains down to the underlying type.
    pub fn resolved(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeKind::Alias(target) = &current.kind {
            current = target;
        }
        current
    }

    /// Check if this is a struct type (aliases resolved).
    pub fn is_struct(&self) -> bool {
        matches!(self.resolved().kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct (aliases resolved).
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.resolved().kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Kind tag for members of this type.
    pub fn member_kind(&self) -> MemberKind {
        match &self.resolved().kind {
            TypeKind::Primitive(p) => p.member_kind(),
            TypeKind::Struct(_) => MemberKind::Struct,
            TypeKind::Sequence(_) => MemberKind::Sequence,
            TypeKind::Array(_) => MemberKind::Array,
            TypeKind::Enum(_) => MemberKind::Enum,
            TypeKind::Union(_) => MemberKind::Union,
            // resolved() never stops on an alias
            TypeKind::Alias(inner) => inner.member_kind(),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Maximum length (None = unbounded).
    pub max_length: Option<usize>,
}

impl SequenceDescriptor {
    pub fn unbounded(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            max_length: None,
        }
    }

    pub fn bounded(element_type: Arc<TypeDescriptor>, max_length: usize) -> Self {
        Self {
            element_type,
            max_length: Some(max_length),
        }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Enumerators in declaration order; ordinal = position.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Build from enumerator names, ordinals assigned in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variants = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| EnumVariant::new(name, i as u32))
            .collect();
        Self { variants }
    }

    /// Get variant by ordinal.
    pub fn variant_by_value(&self, value: u32) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: u32,
}

impl EnumVariant {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Union type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDescriptor {
    /// Discriminator type.
    pub discriminator: Arc<TypeDescriptor>,
    /// Union cases.
    pub cases: Vec<UnionCase>,
    /// Index into `cases` of the default branch.
    pub default_case: Option<usize>,
}

impl UnionDescriptor {
    pub fn new(discriminator: Arc<TypeDescriptor>, cases: Vec<UnionCase>) -> Self {
        Self {
            discriminator,
            cases,
            default_case: None,
        }
    }

    /// Get case by discriminator value, falling back to the default branch.
    pub fn case_by_discriminator(&self, value: i64) -> Option<&UnionCase> {
        self.cases
            .iter()
            .find(|c| c.labels.contains(&value))
            .or_else(|| self.default_case.and_then(|i| self.cases.get(i)))
    }
}

/// Union case.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionCase {
    pub name: String,
    /// Discriminator labels for this case.
    pub labels: Vec<i64>,
    pub type_desc: Arc<TypeDescriptor>,
}

impl UnionCase {
    pub fn new(name: impl Into<String>, labels: Vec<i64>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            labels,
            type_desc,
        }
    }
}

/// Fluent builder for struct descriptors.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a primitive field.
    pub fn field(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        let type_desc = Arc::new(TypeDescriptor::primitive("", kind));
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add an unbounded string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String { max_length: None })
    }

    /// Add a field with an arbitrary type.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add an unbounded sequence field.
    pub fn sequence_field(self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive("", element_kind));
        let seq = TypeDescriptor::new(
            "",
            TypeKind::Sequence(SequenceDescriptor::unbounded(element_type)),
        );
        self.field_with_type(name, Arc::new(seq))
    }

    /// Add an enum field.
    pub fn enum_field<I, S>(self, name: impl Into<String>, enum_name: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let desc = TypeDescriptor::new(
            enum_name,
            TypeKind::Enum(EnumDescriptor::from_names(variants)),
        );
        self.field_with_type(name, Arc::new(desc))
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.name, self.fields)
    }
}
