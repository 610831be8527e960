// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Individual QoS policies as reported by discovery.
//!
//! These are plain values: the monitor records and propagates them, it does
//! not enforce them.

use std::collections::BTreeSet;
use std::time::Duration;

/// Duration used for "infinite" periods.
pub const DURATION_INFINITE: Duration = Duration::from_secs(u64::MAX);

/// Reliability policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Fire-and-forget
    #[default]
    BestEffort,
    /// ACK/NACK-driven delivery
    Reliable,
}

/// History policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum History {
    /// Keep last N samples
    KeepLast(u32),
    /// Keep all samples within resource limits
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        Self::KeepLast(1)
    }
}

/// Durability policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Durability {
    #[default]
    Volatile,
    TransientLocal,
    Transient,
    Persistent,
}

/// DURABILITY_SERVICE policy
///
/// Only meaningful with TRANSIENT or PERSISTENT durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurabilityService {
    pub service_cleanup_delay: Duration,
    pub history: History,
    /// `-1` = unlimited
    pub max_samples: i32,
    /// `-1` = unlimited
    pub max_instances: i32,
    /// `-1` = unlimited
    pub max_samples_per_instance: i32,
}

impl Default for DurabilityService {
    fn default() -> Self {
        Self {
            service_cleanup_delay: Duration::ZERO,
            history: History::KeepLast(1),
            max_samples: -1,
            max_instances: -1,
            max_samples_per_instance: -1,
        }
    }
}

/// DEADLINE policy. Default: infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub period: Duration,
}

impl Default for Deadline {
    fn default() -> Self {
        Self {
            period: DURATION_INFINITE,
        }
    }
}

impl Deadline {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn is_infinite(&self) -> bool {
        self.period == DURATION_INFINITE
    }
}

/// LATENCY_BUDGET policy. Default: zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyBudget {
    pub duration: Duration,
}

/// LIFESPAN policy. Default: infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifespan {
    pub duration: Duration,
}

impl Default for Lifespan {
    fn default() -> Self {
        Self {
            duration: DURATION_INFINITE,
        }
    }
}

/// LIVELINESS kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LivelinessKind {
    #[default]
    Automatic,
    ManualByParticipant,
    ManualByTopic,
}

/// LIVELINESS policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Liveliness {
    pub kind: LivelinessKind,
    pub lease_duration: Duration,
}

impl Default for Liveliness {
    fn default() -> Self {
        Self {
            kind: LivelinessKind::Automatic,
            lease_duration: DURATION_INFINITE,
        }
    }
}

/// OWNERSHIP kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ownership {
    #[default]
    Shared,
    Exclusive,
}

/// DESTINATION_ORDER kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestinationOrder {
    #[default]
    ByReceptionTimestamp,
    BySourceTimestamp,
}

/// Presentation access scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PresentationAccessScope {
    #[default]
    Instance,
    Topic,
    Group,
}

/// PRESENTATION policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Presentation {
    pub access_scope: PresentationAccessScope,
    pub coherent_access: bool,
    pub ordered_access: bool,
}

/// PARTITION policy
///
/// An empty partition list is the default partition.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Partition {
    pub names: Vec<String>,
}

impl Partition {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.names.is_empty()
    }

    /// Distinct names in sorted order.
    pub fn sorted_names(&self) -> BTreeSet<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}
