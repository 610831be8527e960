// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic metadata: type information and QoS learned from discovery.

mod store;
mod topic_info;

pub use store::{Readiness, TopicMetadataStore};
pub use topic_info::TopicInfo;
