// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-topic boundary between the transport and the monitor stores.
//!
//! The transport hands a [`TopicFeed`] raw samples and discovery events for
//! one topic. Samples are decoded with the type learned from user data and
//! pushed into the [`SampleCache`]; discovery events update the
//! [`TopicMetadataStore`].
//!
//! ```text
//!            +-----------+   on_discovery   +--------------------+
//! transport -| TopicFeed |----------------->| TopicMetadataStore |
//!            |           |   on_sample      +--------------------+
//!            |           |----------------->| SampleCache        |
//!            +-----------+                  +--------------------+
//! ```

use crate::cache::{SampleCache, SampleLabel};
use crate::cdr::Endianness;
use crate::dynamic::{decode_sample_with_depth, SampleDecodeError};
use crate::error::{Error, Result};
use crate::metadata::{Readiness, TopicMetadataStore};
use crate::qos::QoS;
use crate::typecode::{DescriptorCodec, DEFAULT_MAX_DEPTH, MAX_TYPE_DEPTH_LIMIT};
use crate::user_data::DecodeOutcome;
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// A serialized sample as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    /// CDR body, without the encapsulation header
    pub payload: Vec<u8>,
    /// Byte order announced by the encapsulation header
    pub endianness: Endianness,
    /// Reception timestamp (local time)
    pub reception_timestamp: SystemTime,
    /// Writer sequence number (if available)
    pub sequence_number: Option<u64>,
}

impl RawSample {
    /// Sample received now.
    pub fn new(payload: Vec<u8>, endianness: Endianness) -> Self {
        Self {
            payload,
            endianness,
            reception_timestamp: SystemTime::now(),
            sequence_number: None,
        }
    }
}

/// Direction of a match notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Matched,
    Unmatched,
}

/// A remote endpoint (un)matched on this topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    pub kind: MatchKind,
    /// Endpoint QoS, when the transport reports it
    pub qos: Option<QoS>,
    pub partitions: Vec<String>,
    pub user_data: Vec<u8>,
}

impl DiscoveryEvent {
    pub fn matched(user_data: Vec<u8>) -> Self {
        Self {
            kind: MatchKind::Matched,
            qos: None,
            partitions: Vec::new(),
            user_data,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            kind: MatchKind::Unmatched,
            qos: None,
            partitions: Vec::new(),
            user_data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = Some(qos);
        self
    }

    #[must_use]
    pub fn with_partitions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Feed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Active,
    Paused,
}

/// What happened to a raw sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleDisposition {
    /// Decoded and cached under this label.
    Stored(SampleLabel),
    /// Dropped: the feed is paused.
    Paused,
    /// Dropped: the feed is closed.
    Closed,
    /// Dropped: the topic type is not known yet.
    Unresolved,
    /// Dropped: the payload does not match the topic type.
    Rejected(SampleDecodeError),
}

/// Receives the traffic of one topic.
pub struct TopicFeed {
    topic: String,
    metadata: Arc<TopicMetadataStore>,
    cache: Arc<SampleCache>,
    codec: Arc<dyn DescriptorCodec>,
    max_depth: usize,
    paused: AtomicBool,
    // Held shared while storing, exclusively while closing
    closed: RwLock<bool>,
    filter: ArcSwap<String>,
    next_sequence: AtomicU64,
    matched: AtomicUsize,
}

impl std::fmt::Debug for TopicFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicFeed")
            .field("topic", &self.topic)
            .field("state", &self.state())
            .field("closed", &self.is_closed())
            .field("matched", &self.matched_count())
            .finish_non_exhaustive()
    }
}

impl TopicFeed {
    pub fn new(
        topic: impl Into<String>,
        metadata: Arc<TopicMetadataStore>,
        cache: Arc<SampleCache>,
        codec: Arc<dyn DescriptorCodec>,
    ) -> Self {
        Self {
            topic: topic.into(),
            metadata,
            cache,
            codec,
            max_depth: DEFAULT_MAX_DEPTH,
            paused: AtomicBool::new(false),
            closed: RwLock::new(false),
            filter: ArcSwap::from_pointee(String::new()),
            next_sequence: AtomicU64::new(0),
            matched: AtomicUsize::new(0),
        }
    }

    /// Nesting limit for sample decoding, clamped to [`MAX_TYPE_DEPTH_LIMIT`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_TYPE_DEPTH_LIMIT);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn unpause(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn state(&self) -> FeedState {
        if self.paused.load(Ordering::Acquire) {
            FeedState::Paused
        } else {
            FeedState::Active
        }
    }

    /// Decode and cache a raw sample.
    pub fn on_sample(&self, raw: &RawSample) -> SampleDisposition {
        let closed = self.closed.read();
        if *closed {
            return SampleDisposition::Closed;
        }
        if self.state() == FeedState::Paused {
            return SampleDisposition::Paused;
        }

        let Some(info) = self.metadata.get(&self.topic) else {
            return SampleDisposition::Unresolved;
        };
        let Some(descriptor) = info.descriptor() else {
            return SampleDisposition::Unresolved;
        };

        let sample = match decode_sample_with_depth(
            &raw.payload,
            descriptor,
            info.extensibility(),
            raw.endianness,
            self.max_depth,
        ) {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!(
                    "[monitor] topic '{}': dropping sample (writer seq {:?}): {}",
                    self.topic,
                    raw.sequence_number,
                    e
                );
                return SampleDisposition::Rejected(e);
            }
        };

        // Numbered under the cache lock so labels follow insertion order
        let label = self.cache.store_with(&self.topic, Arc::new(sample), || {
            let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
            SampleLabel::new(sequence, raw.reception_timestamp)
        });
        SampleDisposition::Stored(label)
    }

    /// Track endpoint matches and merge the event into the metadata store.
    /// A closed feed ignores the event.
    pub fn on_discovery(&self, event: &DiscoveryEvent) -> DecodeOutcome {
        let closed = self.closed.read();
        if *closed {
            return DecodeOutcome::NotApplicable;
        }
        match event.kind {
            MatchKind::Matched => {
                self.matched.fetch_add(1, Ordering::AcqRel);
            }
            MatchKind::Unmatched => {
                let _ = self
                    .matched
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
            }
        }
        self.metadata
            .merge_discovery(&self.topic, event, self.codec.as_ref())
    }

    /// Store a content-filter expression. The feed does not interpret it.
    pub fn set_filter(&self, expression: impl Into<String>) {
        self.filter.store(Arc::new(expression.into()));
    }

    pub fn filter(&self) -> Arc<String> {
        self.filter.load_full()
    }

    /// `Ok(())` once samples of this topic can be decoded.
    pub fn readiness_check(&self) -> Result<()> {
        match self.metadata.ready(&self.topic) {
            Readiness::Unknown => Err(Error::NotFound(self.topic.clone())),
            Readiness::MetadataOnly => Err(Error::NotReady(self.topic.clone())),
            Readiness::Ready => Ok(()),
        }
    }

    /// Stop accepting samples. Returns false if already closed.
    pub fn close(&self) -> bool {
        let mut closed = self.closed.write();
        if *closed {
            return false;
        }
        *closed = true;
        log::debug!("[monitor] feed for topic '{}' closed", self.topic);
        true
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Remote endpoints currently matched.
    pub fn matched_count(&self) -> usize {
        self.matched.load(Ordering::Acquire)
    }
}
