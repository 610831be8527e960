// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded per-topic sample history.
//!
//! Each topic keeps its most recent samples, newest first, together with
//! their arrival labels. Index 0 is always the newest sample. When a topic
//! is full the oldest sample is dropped in the same critical section as the
//! insertion, so readers never observe more than `capacity` entries.

use crate::dynamic::Sample;
use crate::extract::{extract, FieldValue};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Default number of samples kept per topic.
pub const MAX_SAMPLES: usize = 1000;

/// Arrival label of a cached sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleLabel {
    /// Monotonic per-feed arrival number.
    pub sequence: u64,
    /// Local reception time.
    pub received: SystemTime,
}

impl SampleLabel {
    pub fn new(sequence: u64, received: SystemTime) -> Self {
        Self { sequence, received }
    }
}

impl fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local: DateTime<Local> = self.received.into();
        write!(f, "{} #{}", local.format("%H:%M:%S%.3f"), self.sequence)
    }
}

type CacheEntry = (SampleLabel, Arc<Sample>);

/// Per-topic bounded sample history.
#[derive(Debug)]
pub struct SampleCache {
    capacity: usize,
    topics: Mutex<HashMap<String, VecDeque<CacheEntry>>>,
}

impl Default for SampleCache {
    fn default() -> Self {
        Self::with_capacity(MAX_SAMPLES)
    }
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache keeping at most `capacity` samples per topic (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `sample` as the newest entry of `topic`, evicting the oldest
    /// entries beyond capacity.
    pub fn store(&self, topic: &str, label: SampleLabel, sample: Arc<Sample>) {
        self.store_with(topic, sample, || label);
    }

    /// Like [`store`](Self::store), with the label built under the cache
    /// lock. Concurrent producers numbering their samples in `label` keep
    /// the history ordered by label.
    pub fn store_with(
        &self,
        topic: &str,
        sample: Arc<Sample>,
        label: impl FnOnce() -> SampleLabel,
    ) -> SampleLabel {
        let mut topics = self.topics.lock();
        let label = label();
        let history = topics.entry(topic.to_string()).or_default();
        history.push_front((label, sample));
        history.truncate(self.capacity);
        label
    }

    /// Sample at `index` (0 = newest).
    pub fn get(&self, topic: &str, index: usize) -> Option<Arc<Sample>> {
        let topics = self.topics.lock();
        topics
            .get(topic)
            .and_then(|history| history.get(index))
            .map(|(_, sample)| Arc::clone(sample))
    }

    /// Labels of `topic`, newest first.
    pub fn list_labels(&self, topic: &str) -> Vec<SampleLabel> {
        let topics = self.topics.lock();
        topics
            .get(topic)
            .map(|history| history.iter().map(|(label, _)| *label).collect())
            .unwrap_or_default()
    }

    /// Drop every sample of `topic`. The topic stays known with an empty
    /// history.
    pub fn clear(&self, topic: &str) {
        self.topics
            .lock()
            .entry(topic.to_string())
            .or_default()
            .clear();
    }

    /// Same as [`clear`](Self::clear).
    pub fn flush(&self, topic: &str) {
        self.clear(topic);
    }

    /// Number of samples cached for `topic`.
    pub fn len(&self, topic: &str) -> usize {
        self.topics.lock().get(topic).map_or(0, VecDeque::len)
    }

    /// Topics with a history (possibly empty), sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every topic.
    pub fn reset(&self) {
        self.topics.lock().clear();
    }

    /// Extract member `member` of the sample at `index`.
    pub fn read_value(&self, topic: &str, member: &str, index: usize) -> FieldValue {
        let topics = self.topics.lock();
        topics
            .get(topic)
            .and_then(|history| history.get(index))
            .map_or(FieldValue::Null, |(_, sample)| extract(sample, member))
    }
}
