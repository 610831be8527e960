// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent topic -> [`TopicInfo`] map.

use super::TopicInfo;
use crate::feed::DiscoveryEvent;
use crate::typecode::DescriptorCodec;
use crate::user_data::{parse_user_data, DecodeOutcome};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// How far a topic has progressed towards being inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Never seen.
    Unknown,
    /// Discovered, type not yet known.
    MetadataOnly,
    /// Type known; samples can be decoded.
    Ready,
}

/// Topic metadata shared between discovery and inspection.
///
/// One mutex guards the whole map and is held for the duration of each call.
/// Records are copy-on-write: an `Arc<TopicInfo>` obtained from [`get`]
/// is a snapshot that later updates never modify.
///
/// [`get`]: TopicMetadataStore::get
#[derive(Debug, Default)]
pub struct TopicMetadataStore {
    topics: Mutex<HashMap<String, Arc<TopicInfo>>>,
}

impl TopicMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge a record.
    ///
    /// An existing record takes the QoS bundle of `info`, gains its
    /// partitions, and takes its type only when it has none yet.
    pub fn put(&self, info: TopicInfo) {
        let mut topics = self.topics.lock();
        match topics.get_mut(info.name()) {
            Some(existing) => {
                let existing = Arc::make_mut(existing);
                existing.replace_qos(info.qos().clone());
                existing.add_partitions(info.partitions().iter().cloned());
                existing.adopt_type(&info);
            }
            None => {
                topics.insert(info.name().to_string(), Arc::new(info));
            }
        }
    }

    /// Apply `f` to the record of `topic`, creating it with best-effort
    /// defaults if needed. A resolved type is preserved whatever `f` does.
    pub fn put_with<R>(&self, topic: &str, f: impl FnOnce(&mut TopicInfo) -> R) -> R {
        let mut topics = self.topics.lock();
        let entry = topics
            .entry(topic.to_string())
            .or_insert_with(|| Arc::new(TopicInfo::new(topic)));
        let previous = entry.is_resolved().then(|| Arc::clone(entry));
        let info = Arc::make_mut(entry);
        let result = f(info);
        if let Some(previous) = previous {
            info.restore_type(&previous);
        }
        result
    }

    /// Snapshot of the record of `topic`.
    pub fn get(&self, topic: &str) -> Option<Arc<TopicInfo>> {
        self.topics.lock().get(topic).cloned()
    }

    pub fn ready(&self, topic: &str) -> Readiness {
        match self.topics.lock().get(topic) {
            None => Readiness::Unknown,
            Some(info) if info.is_resolved() => Readiness::Ready,
            Some(_) => Readiness::MetadataOnly,
        }
    }

    /// Learn the type of `topic` from a user-data blob.
    ///
    /// The first successful decode wins; later blobs for a resolved topic
    /// are not applicable. Failures are logged and change nothing, so a
    /// later update can still resolve the topic.
    pub fn store_user_data(
        &self,
        topic: &str,
        blob: &[u8],
        codec: &dyn DescriptorCodec,
    ) -> DecodeOutcome {
        if blob.is_empty() {
            return DecodeOutcome::NotApplicable;
        }
        if self.ready(topic) == Readiness::Ready {
            return DecodeOutcome::NotApplicable;
        }

        // Parse without holding the lock
        let parsed = match parse_user_data(blob, codec) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return DecodeOutcome::NotApplicable,
            Err(e) => {
                log::warn!("[monitor] topic '{}': rejecting user data: {}", topic, e);
                return DecodeOutcome::Failed(e);
            }
        };

        let header = parsed.header;
        let type_name = parsed.descriptor.name.clone();
        let stored = self.put_with(topic, |info| info.resolve(parsed));
        if !stored {
            // Another update resolved the topic while we were parsing
            return DecodeOutcome::NotApplicable;
        }

        log::debug!(
            "[monitor] topic '{}' resolved to type '{}' (keyed={}, {})",
            topic,
            type_name,
            header.has_key,
            header.extensibility
        );
        DecodeOutcome::Decoded {
            has_key: header.has_key,
            extensibility: header.extensibility,
        }
    }

    /// Apply a discovery event: endpoint QoS and partitions, then user data.
    pub fn merge_discovery(
        &self,
        topic: &str,
        event: &DiscoveryEvent,
        codec: &dyn DescriptorCodec,
    ) -> DecodeOutcome {
        self.put_with(topic, |info| {
            if let Some(qos) = &event.qos {
                info.apply_endpoint_qos(qos);
            }
            info.add_partitions(event.partitions.iter().cloned());
        });
        self.store_user_data(topic, &event.user_data, codec)
    }

    /// Known topic names, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.topics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.lock().is_empty()
    }

    /// Forget every topic.
    pub fn reset(&self) {
        self.topics.lock().clear();
    }
}
