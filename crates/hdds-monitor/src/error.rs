// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.
//!
//! Decoding problems (user data, TypeCode, sample payloads) have their own
//! error enums next to the code that produces them. They are reported through
//! return values and logs, never through [`Error`]. This type only covers the
//! conditions a caller is expected to act on: readiness failures, use after
//! shutdown and configuration loading.

use thiserror::Error;

/// Errors returned by monitor operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The topic has never been seen (no discovery event, no user data).
    #[error("topic not found: {0}")]
    NotFound(String),
    /// The topic is known but its type descriptor is not resolved yet.
    ///
    /// Callers typically wait for the next discovery event and retry.
    #[error("topic '{0}' has no resolved type descriptor yet")]
    NotReady(String),
    /// The feed for this topic was closed.
    #[error("feed for topic '{0}' is closed")]
    Closed(String),
    /// The monitor context was shut down.
    #[error("monitor context is shut down")]
    ShutDown,
    /// Configuration value rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed YAML configuration.
    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Result alias for monitor operations.
pub type Result<T> = std::result::Result<T, Error>;
