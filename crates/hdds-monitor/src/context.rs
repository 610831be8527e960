// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Monitor context: owns the stores, the descriptor codec and the open feeds.

use crate::cache::SampleCache;
use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::extract::FieldValue;
use crate::feed::{DiscoveryEvent, RawSample, SampleDisposition, TopicFeed};
use crate::metadata::{Readiness, TopicMetadataStore};
use crate::typecode::{DescriptorCodec, TypeCodeCodec};
use crate::user_data::DecodeOutcome;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Entry point of the monitor.
///
/// One context per inspected domain. All state lives here; dropping the
/// context drops it.
pub struct MonitorContext {
    config: MonitorConfig,
    metadata: Arc<TopicMetadataStore>,
    cache: Arc<SampleCache>,
    codec: Arc<dyn DescriptorCodec>,
    feeds: DashMap<String, Arc<TopicFeed>>,
    shut_down: AtomicBool,
}

impl std::fmt::Debug for MonitorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorContext")
            .field("config", &self.config)
            .field("topics", &self.metadata.len())
            .field("feeds", &self.feeds.len())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

impl Default for MonitorContext {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl MonitorContext {
    /// Context using the TypeCode codec configured in `config`.
    pub fn new(config: MonitorConfig) -> Self {
        let codec = Arc::new(TypeCodeCodec::from_config(&config));
        Self::with_codec(config, codec)
    }

    /// Context using a custom descriptor codec.
    pub fn with_codec(config: MonitorConfig, codec: Arc<dyn DescriptorCodec>) -> Self {
        log::debug!(
            "[monitor] context created (max_samples={})",
            config.max_samples
        );
        Self {
            metadata: Arc::new(TopicMetadataStore::new()),
            cache: Arc::new(SampleCache::with_capacity(config.max_samples)),
            codec,
            feeds: DashMap::new(),
            shut_down: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn metadata(&self) -> &Arc<TopicMetadataStore> {
        &self.metadata
    }

    pub fn cache(&self) -> &Arc<SampleCache> {
        &self.cache
    }

    pub fn codec(&self) -> &Arc<dyn DescriptorCodec> {
        &self.codec
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Route a discovery event to the open feed of `topic`, or straight to
    /// the metadata store.
    pub fn on_discovery(&self, topic: &str, event: &DiscoveryEvent) -> DecodeOutcome {
        if self.is_shut_down() {
            return DecodeOutcome::NotApplicable;
        }
        match self.feed(topic) {
            Some(feed) => feed.on_discovery(event),
            None => self
                .metadata
                .merge_discovery(topic, event, self.codec.as_ref()),
        }
    }

    /// Offer a user-data blob for `topic`.
    pub fn decode(&self, topic: &str, blob: &[u8]) -> DecodeOutcome {
        if self.is_shut_down() {
            return DecodeOutcome::NotApplicable;
        }
        self.metadata
            .store_user_data(topic, blob, self.codec.as_ref())
    }

    pub fn readiness_check(&self, topic: &str) -> Result<()> {
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        match self.metadata.ready(topic) {
            Readiness::Unknown => Err(Error::NotFound(topic.to_string())),
            Readiness::MetadataOnly => Err(Error::NotReady(topic.to_string())),
            Readiness::Ready => Ok(()),
        }
    }

    /// Open (or return the already open) feed of a ready topic.
    pub fn open_feed(&self, topic: &str) -> Result<Arc<TopicFeed>> {
        self.readiness_check(topic)?;

        let feed = {
            let entry = self.feeds.entry(topic.to_string()).or_insert_with(|| {
                log::debug!("[monitor] opening feed for topic '{}'", topic);
                Arc::new(
                    TopicFeed::new(
                        topic,
                        Arc::clone(&self.metadata),
                        Arc::clone(&self.cache),
                        Arc::clone(&self.codec),
                    )
                    .with_max_depth(self.config.max_type_depth),
                )
            });
            Arc::clone(entry.value())
        };

        // Lost a race with shutdown()
        if self.is_shut_down() {
            self.close_feed(topic);
            return Err(Error::ShutDown);
        }
        Ok(feed)
    }

    pub fn feed(&self, topic: &str) -> Option<Arc<TopicFeed>> {
        self.feeds.get(topic).map(|feed| Arc::clone(feed.value()))
    }

    /// Close and forget the feed of `topic`. Returns false if none was open.
    pub fn close_feed(&self, topic: &str) -> bool {
        match self.feeds.remove(topic) {
            Some((_, feed)) => {
                feed.close();
                true
            }
            None => false,
        }
    }

    /// Hand a raw sample to the open feed of `topic`.
    pub fn on_sample(&self, topic: &str, raw: &RawSample) -> Result<SampleDisposition> {
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        let feed = self
            .feed(topic)
            .ok_or_else(|| Error::Closed(topic.to_string()))?;
        Ok(feed.on_sample(raw))
    }

    /// Member `member` of the cached sample `index` of `topic`.
    pub fn read_value(&self, topic: &str, member: &str, index: usize) -> FieldValue {
        self.cache.read_value(topic, member, index)
    }

    /// Close every feed and empty both stores. Later calls do nothing.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let topics: Vec<String> = self.feeds.iter().map(|e| e.key().clone()).collect();
        for topic in &topics {
            self.close_feed(topic);
        }
        self.metadata.reset();
        self.cache.reset();
        log::debug!("[monitor] shut down ({} feeds closed)", topics.len());
    }
}
