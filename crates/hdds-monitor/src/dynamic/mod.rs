// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors and dynamically decoded samples.
//!
//! A [`TypeDescriptor`] is recovered from topic user data by the
//! [`typecode`](crate::typecode) codec. Raw payloads of that topic are then
//! turned into [`Sample`] trees by [`decode_sample`], and individual members
//! are read through [`extract`](crate::extract::extract).
//!
//! # Example
//!
//! ```
//! use hdds_monitor::dynamic::{PrimitiveKind, TypeDescriptorBuilder, MemberKind};
//!
//! let desc = TypeDescriptorBuilder::new("Temperature")
//!     .field("sensor_id", PrimitiveKind::U32)
//!     .field("value", PrimitiveKind::F32)
//!     .build();
//!
//! let field = desc.field("value").unwrap();
//! assert_eq!(field.type_desc.member_kind(), MemberKind::Float);
//! ```

mod cdr_sample;
mod sample;
mod type_descriptor;
mod value;

pub use cdr_sample::{decode_sample, decode_sample_with_depth, SampleDecodeError};
pub use sample::{Member, Sample};
pub use type_descriptor::{
    ArrayDescriptor, EnumDescriptor, EnumVariant, Extensibility, FieldDescriptor, MemberKind,
    PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeDescriptorBuilder, TypeKind,
    UnionCase, UnionDescriptor,
};
pub use value::DynamicValue;
