// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-topic metadata record.

use crate::dynamic::{Extensibility, TypeDescriptor};
use crate::qos::{
    Deadline, DestinationOrder, Durability, DurabilityService, LatencyBudget, Lifespan,
    Liveliness, Ownership, Presentation, QoS, QosBundle, Reliability,
};
use crate::user_data::UserDataType;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything the monitor knows about one topic.
///
/// The type descriptor and its flags are written at most once. QoS and
/// partitions keep evolving as endpoints are discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicInfo {
    name: String,
    has_key: bool,
    extensibility: Extensibility,
    descriptor: Option<Arc<TypeDescriptor>>,
    descriptor_len: usize,
    qos: QosBundle,
    partitions: BTreeSet<String>,
}

impl TopicInfo {
    /// Unresolved topic with best-effort QoS.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_key: true,
            extensibility: Extensibility::Appendable,
            descriptor: None,
            descriptor_len: 0,
            qos: QosBundle::best_effort(),
            partitions: BTreeSet::new(),
        }
    }

    /// Attach a locally known type.
    #[must_use]
    pub fn with_type(
        mut self,
        descriptor: Arc<TypeDescriptor>,
        has_key: bool,
        extensibility: Extensibility,
    ) -> Self {
        self.descriptor = Some(descriptor);
        self.has_key = has_key;
        self.extensibility = extensibility;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn extensibility(&self) -> Extensibility {
        self.extensibility
    }

    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        self.descriptor.as_ref()
    }

    /// Byte length of the encoded descriptor, 0 when not learned from user data.
    pub fn descriptor_len(&self) -> usize {
        self.descriptor_len
    }

    /// True once a type descriptor is known.
    pub fn is_resolved(&self) -> bool {
        self.descriptor.is_some()
    }

    pub fn qos(&self) -> &QosBundle {
        &self.qos
    }

    /// Partitions seen for this topic, sorted and deduplicated.
    pub fn partitions(&self) -> &BTreeSet<String> {
        &self.partitions
    }

    pub fn set_topic_qos(&mut self, qos: QoS) {
        self.qos.topic = qos;
    }

    pub fn set_writer_qos(&mut self, qos: QoS) {
        self.qos.writer = qos;
    }

    pub fn set_reader_qos(&mut self, qos: QoS) {
        self.qos.reader = qos;
    }

    pub fn set_publisher_qos(&mut self, qos: QoS) {
        self.qos.publisher = qos;
    }

    pub fn set_subscriber_qos(&mut self, qos: QoS) {
        self.qos.subscriber = qos;
    }

    pub(crate) fn replace_qos(&mut self, qos: QosBundle) {
        self.qos = qos;
    }

    // Policy setters. Each policy lands on the entities it applies to.

    pub fn set_durability(&mut self, policy: Durability) {
        self.qos.topic.durability = policy;
        self.qos.writer.durability = policy;
        self.qos.reader.durability = policy;
    }

    pub fn set_durability_service(&mut self, policy: DurabilityService) {
        self.qos.topic.durability_service = policy;
        self.qos.writer.durability_service = policy;
    }

    pub fn set_deadline(&mut self, policy: Deadline) {
        self.qos.topic.deadline = policy;
        self.qos.writer.deadline = policy;
        self.qos.reader.deadline = policy;
    }

    pub fn set_latency_budget(&mut self, policy: LatencyBudget) {
        self.qos.topic.latency_budget = policy;
        self.qos.writer.latency_budget = policy;
        self.qos.reader.latency_budget = policy;
    }

    pub fn set_lifespan(&mut self, policy: Lifespan) {
        self.qos.topic.lifespan = policy;
        self.qos.writer.lifespan = policy;
    }

    pub fn set_liveliness(&mut self, policy: Liveliness) {
        self.qos.topic.liveliness = policy;
        self.qos.writer.liveliness = policy;
        self.qos.reader.liveliness = policy;
    }

    pub fn set_reliability(&mut self, policy: Reliability) {
        self.qos.topic.reliability = policy;
        self.qos.writer.reliability = policy;
        self.qos.reader.reliability = policy;
    }

    pub fn set_ownership(&mut self, policy: Ownership) {
        self.qos.topic.ownership = policy;
        self.qos.writer.ownership = policy;
        self.qos.reader.ownership = policy;
    }

    pub fn set_destination_order(&mut self, policy: DestinationOrder) {
        self.qos.topic.destination_order = policy;
        self.qos.writer.destination_order = policy;
        self.qos.reader.destination_order = policy;
    }

    pub fn set_presentation(&mut self, policy: Presentation) {
        self.qos.publisher.presentation = policy;
        self.qos.subscriber.presentation = policy;
    }

    /// Force KEEP_ALL on the topic, reader and writer QoS that are
    /// VOLATILE + RELIABLE.
    pub fn fix_history(&mut self) {
        self.qos.topic.fix_history();
        self.qos.reader.fix_history();
        self.qos.writer.fix_history();
    }

    /// Merge partition names into the sorted set.
    pub fn add_partitions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions.extend(names.into_iter().map(Into::into));
    }

    /// Adopt the QoS a discovered endpoint reports.
    pub fn apply_endpoint_qos(&mut self, qos: &QoS) {
        self.set_durability(qos.durability);
        self.set_durability_service(qos.durability_service);
        self.set_deadline(qos.deadline);
        self.set_latency_budget(qos.latency_budget);
        self.set_lifespan(qos.lifespan);
        self.set_liveliness(qos.liveliness);
        self.set_reliability(qos.reliability);
        self.set_ownership(qos.ownership);
        self.set_destination_order(qos.destination_order);
        self.set_presentation(qos.presentation);
        self.add_partitions(qos.partition.names.iter().cloned());
        self.fix_history();
    }

    /// Record a decoded user-data type. Returns false, leaving the record
    /// untouched, when a descriptor is already present.
    pub(crate) fn resolve(&mut self, user_data: UserDataType) -> bool {
        if self.descriptor.is_some() {
            return false;
        }
        self.has_key = user_data.header.has_key;
        self.extensibility = user_data.header.extensibility;
        self.descriptor_len = user_data.descriptor_len;
        self.descriptor = Some(Arc::new(user_data.descriptor));
        true
    }

    /// Overwrite the type fields with those of `other`.
    pub(crate) fn restore_type(&mut self, other: &TopicInfo) {
        self.descriptor = other.descriptor.clone();
        self.descriptor_len = other.descriptor_len;
        self.has_key = other.has_key;
        self.extensibility = other.extensibility;
    }

    /// Take the type from `other` if this record has none.
    pub(crate) fn adopt_type(&mut self, other: &TopicInfo) {
        if self.descriptor.is_none() && other.descriptor.is_some() {
            self.restore_type(other);
        }
    }
}
