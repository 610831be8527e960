// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Quality of Service as seen by the monitor.
//!
//! Discovery reports the QoS of remote endpoints. The monitor keeps one
//! [`QosBundle`] per topic, seeded with best-effort values and updated from
//! every matched endpoint, so that a reader created later for inspection is
//! compatible with the writers it observes.
//!
//! # Example
//!
//! ```
//! use hdds_monitor::qos::{History, QoS, Reliability};
//!
//! let qos = QoS::best_effort().reliable().keep_last(10).partition(["telemetry"]);
//! assert_eq!(qos.reliability, Reliability::Reliable);
//! assert_eq!(qos.history, History::KeepLast(10));
//! ```

mod policies;

pub use policies::{
    Deadline, DestinationOrder, Durability, DurabilityService, History, LatencyBudget, Lifespan,
    Liveliness, LivelinessKind, Ownership, Partition, Presentation, PresentationAccessScope,
    Reliability, DURATION_INFINITE,
};

use std::time::Duration;

/// Aggregated QoS of one entity.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct QoS {
    pub reliability: Reliability,
    pub history: History,
    pub durability: Durability,
    pub durability_service: DurabilityService,
    pub deadline: Deadline,
    pub latency_budget: LatencyBudget,
    pub lifespan: Lifespan,
    pub liveliness: Liveliness,
    pub ownership: Ownership,
    pub destination_order: DestinationOrder,
    pub presentation: Presentation,
    pub partition: Partition,
}

impl QoS {
    /// Best-effort, volatile, keep-last(1).
    pub fn best_effort() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reliable(mut self) -> Self {
        self.reliability = Reliability::Reliable;
        self
    }

    #[must_use]
    pub fn keep_last(mut self, depth: u32) -> Self {
        self.history = History::KeepLast(depth);
        self
    }

    #[must_use]
    pub fn keep_all(mut self) -> Self {
        self.history = History::KeepAll;
        self
    }

    #[must_use]
    pub fn volatile(mut self) -> Self {
        self.durability = Durability::Volatile;
        self
    }

    #[must_use]
    pub fn transient_local(mut self) -> Self {
        self.durability = Durability::TransientLocal;
        self
    }

    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.durability = Durability::Persistent;
        self
    }

    #[must_use]
    pub fn deadline(mut self, period: Duration) -> Self {
        self.deadline = Deadline::new(period);
        self
    }

    #[must_use]
    pub fn lifespan(mut self, duration: Duration) -> Self {
        self.lifespan = Lifespan { duration };
        self
    }

    #[must_use]
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    #[must_use]
    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    #[must_use]
    pub fn partition<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition = Partition::new(names);
        self
    }

    /// Force KEEP_ALL history for VOLATILE + RELIABLE.
    pub fn fix_history(&mut self) {
        if self.durability == Durability::Volatile && self.reliability == Reliability::Reliable {
            self.history = History::KeepAll;
        }
    }
}

/// QoS of every entity involved with a topic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct QosBundle {
    pub topic: QoS,
    pub writer: QoS,
    pub reader: QoS,
    pub publisher: QoS,
    pub subscriber: QoS,
}

impl QosBundle {
    pub fn best_effort() -> Self {
        Self::default()
    }
}
