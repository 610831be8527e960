// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoded samples: an immutable tree of named, kind-tagged members.

use crate::dynamic::{DynamicValue, MemberKind};
use std::collections::HashMap;

/// One named member of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub value: DynamicValue,
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind, value: DynamicValue) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }
}

/// A decoded message instance.
///
/// Members keep declaration order. The name index is built once here and the
/// sample is never mutated afterwards; the cache shares it as `Arc<Sample>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    type_name: String,
    members: Vec<Member>,
    index: HashMap<String, usize>,
}

impl Sample {
    /// Build a sample. On duplicate names the first member wins.
    pub fn new(type_name: impl Into<String>, members: Vec<Member>) -> Self {
        let mut index = HashMap::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            index.entry(member.name.clone()).or_insert(i);
        }
        Self {
            type_name: type_name.into(),
            members,
            index,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a top-level member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.index.get(name).and_then(|&i| self.members.get(i))
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
