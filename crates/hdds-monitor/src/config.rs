// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Monitor configuration
//!
//! Sources, in the order callers usually layer them: [`Default`], a YAML
//! file (`config-loaders` feature), `HDDS_MONITOR_*` environment variables,
//! then explicit builder calls.
//!
//! ```yaml
//! max_samples: 500
//! typecode_endianness: big
//! max_type_depth: 16
//! ```

use crate::cache::MAX_SAMPLES;
use crate::cdr::Endianness;
use crate::error::{Error, Result};
use crate::typecode::{DEFAULT_MAX_DEPTH, MAX_TYPE_DEPTH_LIMIT};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable: samples kept per topic.
pub const ENV_MAX_SAMPLES: &str = "HDDS_MONITOR_MAX_SAMPLES";
/// Environment variable: TypeCode byte order (`little` / `big`).
pub const ENV_TYPECODE_ENDIANNESS: &str = "HDDS_MONITOR_TYPECODE_ENDIANNESS";
/// Environment variable: TypeCode nesting limit.
pub const ENV_MAX_TYPE_DEPTH: &str = "HDDS_MONITOR_MAX_TYPE_DEPTH";

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Samples kept per topic before the oldest is evicted
    pub max_samples: usize,

    /// Byte order of TypeCodes carried in user data
    pub typecode_endianness: Endianness,

    /// Maximum nesting accepted when decoding TypeCodes and samples
    /// (at most [`MAX_TYPE_DEPTH_LIMIT`])
    pub max_type_depth: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_samples: MAX_SAMPLES,
            typecode_endianness: Endianness::Little,
            max_type_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MonitorConfig {
    /// Create a new config builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    /// Defaults overridden by `HDDS_MONITOR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` (keyed by environment variable name).
    ///
    /// Empty values are ignored; unparsable values are an error.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_MAX_SAMPLES) {
            self.max_samples = parse_usize(ENV_MAX_SAMPLES, &value)?;
        }
        if let Some(value) = get(ENV_TYPECODE_ENDIANNESS) {
            self.typecode_endianness = parse_endianness(&value)?;
        }
        if let Some(value) = get(ENV_MAX_TYPE_DEPTH) {
            self.max_type_depth = parse_usize(ENV_MAX_TYPE_DEPTH, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Parse a YAML document. Missing keys take their default.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Yaml(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!(
            "[monitor] loading configuration from {}",
            path.as_ref().display()
        );
        Self::from_yaml_str(&content)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_samples == 0 {
            return Err(Error::InvalidConfig(
                "max_samples must be at least 1".to_string(),
            ));
        }
        if self.max_type_depth == 0 || self.max_type_depth > MAX_TYPE_DEPTH_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_type_depth must be between 1 and {}",
                MAX_TYPE_DEPTH_LIMIT
            )));
        }
        Ok(())
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{}: '{}' is not a count", key, value)))
}

fn parse_endianness(value: &str) -> Result<Endianness> {
    match value.trim().to_ascii_lowercase().as_str() {
        "little" | "le" => Ok(Endianness::Little),
        "big" | "be" => Ok(Endianness::Big),
        _ => Err(Error::InvalidConfig(format!(
            "{}: '{}' is neither 'little' nor 'big'",
            ENV_TYPECODE_ENDIANNESS, value
        ))),
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    max_samples: Option<usize>,
    typecode_endianness: Option<Endianness>,
    max_type_depth: Option<usize>,
}

impl MonitorConfigBuilder {
    /// Set samples kept per topic
    pub fn max_samples(mut self, count: usize) -> Self {
        self.max_samples = Some(count);
        self
    }

    /// Set TypeCode byte order
    pub fn typecode_endianness(mut self, endianness: Endianness) -> Self {
        self.typecode_endianness = Some(endianness);
        self
    }

    /// Set TypeCode nesting limit
    pub fn max_type_depth(mut self, depth: usize) -> Self {
        self.max_type_depth = Some(depth);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MonitorConfig> {
        let defaults = MonitorConfig::default();

        let config = MonitorConfig {
            max_samples: self.max_samples.unwrap_or(defaults.max_samples),
            typecode_endianness: self
                .typecode_endianness
                .unwrap_or(defaults.typecode_endianness),
            max_type_depth: self.max_type_depth.unwrap_or(defaults.max_type_depth),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.max_samples, MAX_SAMPLES);
        assert_eq!(config.typecode_endianness, Endianness::Little);
        assert_eq!(config.max_type_depth, DEFAULT_MAX_DEPTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MonitorConfig::builder()
            .max_samples(10)
            .typecode_endianness(Endianness::Big)
            .build()
            .unwrap();
        assert_eq!(config.max_samples, 10);
        assert_eq!(config.typecode_endianness, Endianness::Big);
        assert_eq!(config.max_type_depth, DEFAULT_MAX_DEPTH);

        assert!(matches!(
            MonitorConfig::builder().max_samples(0).build(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MAX_SAMPLES, "25"),
            (ENV_TYPECODE_ENDIANNESS, "BE"),
            (ENV_MAX_TYPE_DEPTH, ""),
        ]
        .into_iter()
        .collect();
        let config = MonitorConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.max_samples, 25);
        assert_eq!(config.typecode_endianness, Endianness::Big);
        assert_eq!(config.max_type_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_override_errors() {
        let err = MonitorConfig::default()
            .with_overrides(|key| (key == ENV_MAX_SAMPLES).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = MonitorConfig::default()
            .with_overrides(|key| (key == ENV_TYPECODE_ENDIANNESS).then(|| "middle".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = MonitorConfig::default()
            .with_overrides(|key| (key == ENV_MAX_TYPE_DEPTH).then(|| "1000000".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_yaml() {
        let config = MonitorConfig::from_yaml_str("max_samples: 5\ntypecode_endianness: big\n")
            .unwrap();
        assert_eq!(config.max_samples, 5);
        assert_eq!(config.typecode_endianness, Endianness::Big);
        assert_eq!(config.max_type_depth, DEFAULT_MAX_DEPTH);

        assert!(matches!(
            MonitorConfig::from_yaml_str("max_samples: [1, 2]"),
            Err(Error::Yaml(_))
        ));
        assert!(matches!(
            MonitorConfig::from_yaml_str("max_type_depth: 0"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
